use std::{collections::HashMap, io::Write};

use miette::{Diagnostic, Error, IntoDiagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::{
    Parser,
    lex::{Token, position},
    parse::{Actions, Op},
};

#[derive(Error, Debug, Diagnostic)]
#[error("undefined variable `{name}`")]
#[diagnostic(help("assign `{name}` before reading it"))]
pub struct UndefinedVariableError {
    #[source_code]
    src: NamedSource<String>,

    #[label("never assigned")]
    bad_bit: SourceSpan,

    pub name: String,
}

impl UndefinedVariableError {
    pub fn line(&self) -> usize {
        position(self.src.inner(), self.bad_bit.offset()).0
    }

    pub fn column(&self) -> usize {
        position(self.src.inner(), self.bad_bit.offset()).1
    }
}

/// The symbol table: one global scope living for a single run.
#[derive(Debug, Default)]
pub struct Environment<'de> {
    values: HashMap<&'de str, bool>,
}

impl<'de> Environment<'de> {
    pub fn get(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    /// Creates or overwrites `name`.
    pub fn define(&mut self, name: &'de str, value: bool) {
        self.values.insert(name, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'de str, bool)> + '_ {
        self.values.iter().map(|(name, value)| (*name, *value))
    }
}

/// Evaluates each production as it is recognized.
pub struct Evaluator<'env, 'de, W> {
    filename: Option<&'de str>,
    whole: &'de str,
    environment: &'env mut Environment<'de>,
    out: W,
}

impl<'env, 'de, W: Write> Evaluator<'env, 'de, W> {
    pub fn new(
        filename: Option<&'de str>,
        whole: &'de str,
        environment: &'env mut Environment<'de>,
        out: W,
    ) -> Self {
        Evaluator {
            filename,
            whole,
            environment,
            out,
        }
    }
}

impl<'de, W: Write> Actions<'de> for Evaluator<'_, 'de, W> {
    type Value = bool;

    fn literal(&mut self, _token: Token<'de>, value: bool) -> Result<bool, Error> {
        Ok(value)
    }

    fn variable(&mut self, token: Token<'de>) -> Result<bool, Error> {
        let Some(value) = self.environment.get(token.literal) else {
            return Err(UndefinedVariableError {
                src: NamedSource::new(self.filename.unwrap_or("<input>"), self.whole.to_string()),
                bad_bit: SourceSpan::from(token.offset..token.offset + token.literal.len()),
                name: token.literal.to_string(),
            }
            .into());
        };
        Ok(value)
    }

    fn not(&mut self, operand: bool) -> Result<bool, Error> {
        Ok(!operand)
    }

    fn binary(&mut self, op: Op, lhs: bool, rhs: bool) -> Result<bool, Error> {
        Ok(match op {
            Op::And => lhs & rhs,
            Op::Or => lhs | rhs,
        })
    }

    fn assign(&mut self, name: Token<'de>, value: bool) -> Result<(), Error> {
        self.environment.define(name.literal, value);
        Ok(())
    }

    fn print(&mut self, value: bool) -> Result<(), Error> {
        writeln!(self.out, "{value}").into_diagnostic()
    }
}

pub struct Interpreter<'de> {
    filename: Option<&'de str>,
    whole: &'de str,
    environment: Environment<'de>,
}

impl<'de> Interpreter<'de> {
    pub fn new(filename: Option<&'de str>, whole: &'de str) -> Self {
        Self {
            filename,
            whole,
            environment: Environment::default(),
        }
    }

    /// Runs the program, writing one line per `print` to `out`.
    ///
    /// Statements before an error keep their effects; nothing after it runs.
    /// Each run starts from an empty environment.
    pub fn run(&mut self, out: impl Write) -> Result<(), Error> {
        self.environment = Environment::default();
        let evaluator = Evaluator::new(self.filename, self.whole, &mut self.environment, out);
        Parser::new(self.filename, self.whole, evaluator)?.parse()?;
        Ok(())
    }

    pub fn environment(&self) -> &Environment<'de> {
        &self.environment
    }
}

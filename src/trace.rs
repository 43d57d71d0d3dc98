use std::io::Write;

use miette::{Error, IntoDiagnostic};

use crate::{
    lex::Token,
    parse::{Actions, Op},
};

/// Echoes every terminal the parser consumes, one per line, without evaluating.
pub struct Tracer<W> {
    out: W,
}

impl<W: Write> Tracer<W> {
    pub fn new(out: W) -> Self {
        Tracer { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<'de, W: Write> Actions<'de> for Tracer<W> {
    type Value = ();

    fn matched(&mut self, token: &Token<'de>) -> Result<(), Error> {
        writeln!(self.out, "{token}").into_diagnostic()
    }

    fn literal(&mut self, _token: Token<'de>, _value: bool) -> Result<(), Error> {
        Ok(())
    }

    fn variable(&mut self, _token: Token<'de>) -> Result<(), Error> {
        Ok(())
    }

    fn not(&mut self, _operand: ()) -> Result<(), Error> {
        Ok(())
    }

    fn binary(&mut self, _op: Op, _lhs: (), _rhs: ()) -> Result<(), Error> {
        Ok(())
    }

    fn assign(&mut self, _name: Token<'de>, _value: ()) -> Result<(), Error> {
        Ok(())
    }

    fn print(&mut self, _value: ()) -> Result<(), Error> {
        Ok(())
    }
}

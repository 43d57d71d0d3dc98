use std::fmt::Display;

use miette::Error;

use crate::{
    lex::Token,
    parse::{Actions, Op},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'de> {
    Literal(bool),
    Variable(&'de str),
    Not(Box<Expr<'de>>),
    Binary(Op, Box<Expr<'de>>, Box<Expr<'de>>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'de> {
    Assign { name: &'de str, value: Expr<'de> },
    Print(Expr<'de>),
}

impl Display for Expr<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{value}"),
            Expr::Variable(name) => write!(f, "{name}"),
            Expr::Not(operand) => write!(f, "(not {operand})"),
            Expr::Binary(op, lhs, rhs) => write!(f, "({op} {lhs} {rhs})"),
        }
    }
}

impl Display for Statement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Assign { name, value } => write!(f, "(= {name} {value})"),
            Statement::Print(value) => write!(f, "(print {value})"),
        }
    }
}

/// Collects the program as a list of statement trees instead of running it.
#[derive(Debug, Default)]
pub struct TreeBuilder<'de> {
    statements: Vec<Statement<'de>>,
}

impl<'de> TreeBuilder<'de> {
    pub fn into_statements(self) -> Vec<Statement<'de>> {
        self.statements
    }
}

impl<'de> Actions<'de> for TreeBuilder<'de> {
    type Value = Expr<'de>;

    fn literal(&mut self, _token: Token<'de>, value: bool) -> Result<Expr<'de>, Error> {
        Ok(Expr::Literal(value))
    }

    fn variable(&mut self, token: Token<'de>) -> Result<Expr<'de>, Error> {
        Ok(Expr::Variable(token.literal))
    }

    fn not(&mut self, operand: Expr<'de>) -> Result<Expr<'de>, Error> {
        Ok(Expr::Not(Box::new(operand)))
    }

    fn binary(&mut self, op: Op, lhs: Expr<'de>, rhs: Expr<'de>) -> Result<Expr<'de>, Error> {
        Ok(Expr::Binary(op, Box::new(lhs), Box::new(rhs)))
    }

    fn assign(&mut self, name: Token<'de>, value: Expr<'de>) -> Result<(), Error> {
        self.statements.push(Statement::Assign {
            name: name.literal,
            value,
        });
        Ok(())
    }

    fn print(&mut self, value: Expr<'de>) -> Result<(), Error> {
        self.statements.push(Statement::Print(value));
        Ok(())
    }
}

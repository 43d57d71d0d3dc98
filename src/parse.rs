//! LL(1) recursive descent over the grammar
//!
//! ```text
//! StmtList    -> Stmt StmtList | ε
//! Stmt        -> id '=' Expr | 'print' Expr
//! Expr        -> Term OropChain
//! OropChain   -> 'or' Term OropChain | ε
//! Term        -> Factor2 AndopChain
//! AndopChain  -> 'and' Factor2 AndopChain | ε
//! Factor2     -> Factor | 'not' Factor
//! Factor      -> '(' Expr ')' | id | BoolLit
//! ```
//!
//! Every production is dispatched on the single lookahead token. What happens
//! when a production is recognized is decided by the [`Actions`] the parser
//! was built with.

use std::fmt::Display;

use miette::{Diagnostic, Error, NamedSource, SourceSpan};
use thiserror::Error;

use crate::{
    cursor::Cursor,
    lex::{Lexer, Token, TokenKind, position},
};

#[derive(Error, Debug, Diagnostic)]
#[error("in {context}: expected {expected}, found {found}")]
#[diagnostic(help("use {expected} here instead"))]
pub struct SyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    bad_bit: SourceSpan,

    /// The grammar procedure that rejected the lookahead.
    pub context: &'static str,
    pub expected: String,
    pub found: String,
}

impl SyntaxError {
    pub fn line(&self) -> usize {
        position(self.src.inner(), self.bad_bit.offset()).0
    }

    pub fn column(&self) -> usize {
        position(self.src.inner(), self.bad_bit.offset()).1
    }
}

#[derive(Error, Debug, Diagnostic)]
#[error("parentheses nested deeper than {limit} levels")]
#[diagnostic(help("split the expression over several assignments"))]
pub struct NestingTooDeep {
    #[source_code]
    src: NamedSource<String>,

    #[label("this one is too deep")]
    bad_bit: SourceSpan,

    pub limit: usize,
}

impl NestingTooDeep {
    pub fn line(&self) -> usize {
        position(self.src.inner(), self.bad_bit.offset()).0
    }

    pub fn column(&self) -> usize {
        position(self.src.inner(), self.bad_bit.offset()).1
    }
}

/// How many `(` may be open at once; each level costs several stack frames.
pub const MAX_NESTING: usize = 256;

// The boolean value is ignored when testing membership.
const BOOL: TokenKind = TokenKind::Bool(true);

pub const FIRST_STMT: &[TokenKind] = &[TokenKind::Ident, TokenKind::Print];
pub const FOLLOW_STMT_LIST: &[TokenKind] = &[TokenKind::Eof];
pub const FIRST_EXPR: &[TokenKind] = &[
    TokenKind::LeftParen,
    TokenKind::Ident,
    BOOL,
    TokenKind::Not,
];
pub const FIRST_FACTOR: &[TokenKind] = &[TokenKind::LeftParen, TokenKind::Ident, BOOL];

const OR_OP: &[TokenKind] = &[TokenKind::Or];
const AND_OP: &[TokenKind] = &[TokenKind::And];
pub const FOLLOW_OROP_CHAIN: &[TokenKind] = &[
    TokenKind::And,
    TokenKind::Not,
    TokenKind::RightParen,
    TokenKind::Ident,
    TokenKind::Print,
    TokenKind::Eof,
];
pub const FOLLOW_ANDOP_CHAIN: &[TokenKind] = &[
    TokenKind::Or,
    TokenKind::Not,
    TokenKind::RightParen,
    TokenKind::Ident,
    TokenKind::Print,
    TokenKind::Eof,
];

fn in_set(kind: TokenKind, set: &[TokenKind]) -> bool {
    set.iter().any(|member| member.same_category(&kind))
}

/// Renders a list of token categories as `a, b or c`.
fn describe(sets: &[&[TokenKind]]) -> String {
    let mut names: Vec<&'static str> = Vec::new();
    for kind in sets.iter().flat_map(|set| set.iter()) {
        if !names.contains(&kind.describe()) {
            names.push(kind.describe());
        }
    }
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.to_string(),
        Some((last, init)) => format!("{} or {last}", init.join(", ")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    And,
    Or,
}

impl Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Op::And => write!(f, "and"),
            Op::Or => write!(f, "or"),
        }
    }
}

/// What the parser does as it recognizes each production.
pub trait Actions<'de> {
    /// The semantic value of an expression-level non-terminal.
    type Value;

    /// Called for every terminal, in source order, just before it is consumed.
    fn matched(&mut self, _token: &Token<'de>) -> Result<(), Error> {
        Ok(())
    }

    fn literal(&mut self, token: Token<'de>, value: bool) -> Result<Self::Value, Error>;

    fn variable(&mut self, token: Token<'de>) -> Result<Self::Value, Error>;

    fn not(&mut self, operand: Self::Value) -> Result<Self::Value, Error>;

    fn binary(&mut self, op: Op, lhs: Self::Value, rhs: Self::Value)
    -> Result<Self::Value, Error>;

    fn assign(&mut self, name: Token<'de>, value: Self::Value) -> Result<(), Error>;

    fn print(&mut self, value: Self::Value) -> Result<(), Error>;
}

/// Combines an operator chain left to right: `((first op a) op b) ...`.
///
/// Every operand is already evaluated by the time it gets here; there is no
/// short-circuiting.
pub fn fold_chain<'de, A: Actions<'de>>(
    actions: &mut A,
    first: A::Value,
    rest: Vec<(Op, A::Value)>,
) -> Result<A::Value, Error> {
    let mut acc = first;
    for (op, operand) in rest {
        acc = actions.binary(op, acc, operand)?;
    }
    Ok(acc)
}

pub struct Parser<'de, A> {
    cursor: Cursor<'de>,
    actions: A,
    depth: usize,
}

impl<'de, A: Actions<'de>> Parser<'de, A> {
    pub fn new(filename: Option<&'de str>, whole: &'de str, actions: A) -> Result<Self, Error> {
        Ok(Parser {
            cursor: Cursor::new(Lexer::new(filename, whole))?,
            actions,
            depth: 0,
        })
    }

    /// Parses the whole program and hands the action set back.
    pub fn parse(mut self) -> Result<A, Error> {
        self.stmt_list()?;
        Ok(self.actions)
    }

    fn unexpected(&self, context: &'static str, sets: &[&[TokenKind]]) -> Error {
        let found = match self.cursor.kind() {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("`{}`", self.cursor.lexeme()),
        };
        SyntaxError {
            src: self.cursor.named_source(),
            bad_bit: self.cursor.span(),
            context,
            expected: describe(sets),
            found,
        }
        .into()
    }

    fn eat(&mut self, expected: TokenKind, context: &'static str) -> Result<Token<'de>, Error> {
        if !self.cursor.kind().same_category(&expected) {
            return Err(self.unexpected(context, &[std::slice::from_ref(&expected)]));
        }
        let token = *self.cursor.peek();
        self.actions.matched(&token)?;
        self.cursor.advance()?;
        Ok(token)
    }

    fn require(&self, context: &'static str, first: &[TokenKind]) -> Result<(), Error> {
        if in_set(self.cursor.kind(), first) {
            Ok(())
        } else {
            Err(self.unexpected(context, &[first]))
        }
    }

    // StmtList -> Stmt StmtList | ε, iterated instead of recursed
    fn stmt_list(&mut self) -> Result<(), Error> {
        loop {
            let kind = self.cursor.kind();
            if in_set(kind, FIRST_STMT) {
                self.stmt()?;
            } else if in_set(kind, FOLLOW_STMT_LIST) {
                return Ok(());
            } else {
                return Err(self.unexpected("stmt_list", &[FIRST_STMT, FOLLOW_STMT_LIST]));
            }
        }
    }

    fn stmt(&mut self) -> Result<(), Error> {
        match self.cursor.kind() {
            TokenKind::Ident => {
                let name = self.eat(TokenKind::Ident, "stmt")?;
                self.eat(TokenKind::Equal, "stmt")?;
                let value = self.expr()?;
                self.actions.assign(name, value)
            }
            TokenKind::Print => {
                self.eat(TokenKind::Print, "stmt")?;
                let value = self.expr()?;
                self.actions.print(value)
            }
            _ => Err(self.unexpected("stmt", &[FIRST_STMT])),
        }
    }

    fn expr(&mut self) -> Result<A::Value, Error> {
        self.require("expr", FIRST_EXPR)?;
        let first = self.term()?;
        let rest = self.orop_chain()?;
        fold_chain(&mut self.actions, first, rest)
    }

    fn orop_chain(&mut self) -> Result<Vec<(Op, A::Value)>, Error> {
        let mut chain = Vec::new();
        loop {
            let kind = self.cursor.kind();
            if kind == TokenKind::Or {
                self.eat(TokenKind::Or, "orop_chain")?;
                chain.push((Op::Or, self.term()?));
            } else if in_set(kind, FOLLOW_OROP_CHAIN) {
                return Ok(chain);
            } else {
                return Err(self.unexpected("orop_chain", &[OR_OP, FOLLOW_OROP_CHAIN]));
            }
        }
    }

    fn term(&mut self) -> Result<A::Value, Error> {
        self.require("term", FIRST_EXPR)?;
        let first = self.factor2()?;
        let rest = self.andop_chain()?;
        fold_chain(&mut self.actions, first, rest)
    }

    fn andop_chain(&mut self) -> Result<Vec<(Op, A::Value)>, Error> {
        let mut chain = Vec::new();
        loop {
            let kind = self.cursor.kind();
            if kind == TokenKind::And {
                self.eat(TokenKind::And, "andop_chain")?;
                chain.push((Op::And, self.factor2()?));
            } else if in_set(kind, FOLLOW_ANDOP_CHAIN) {
                return Ok(chain);
            } else {
                return Err(self.unexpected("andop_chain", &[AND_OP, FOLLOW_ANDOP_CHAIN]));
            }
        }
    }

    fn factor2(&mut self) -> Result<A::Value, Error> {
        let kind = self.cursor.kind();
        if in_set(kind, FIRST_FACTOR) {
            self.factor()
        } else if kind == TokenKind::Not {
            self.eat(TokenKind::Not, "factor2")?;
            let operand = self.factor()?;
            self.actions.not(operand)
        } else {
            Err(self.unexpected("factor2", &[FIRST_EXPR]))
        }
    }

    fn factor(&mut self) -> Result<A::Value, Error> {
        match self.cursor.kind() {
            TokenKind::LeftParen => {
                if self.depth >= MAX_NESTING {
                    return Err(NestingTooDeep {
                        src: self.cursor.named_source(),
                        bad_bit: self.cursor.span(),
                        limit: MAX_NESTING,
                    }
                    .into());
                }
                self.eat(TokenKind::LeftParen, "factor")?;
                self.depth += 1;
                let value = self.expr()?;
                self.eat(TokenKind::RightParen, "factor")?;
                self.depth -= 1;
                Ok(value)
            }
            TokenKind::Ident => {
                let token = self.eat(TokenKind::Ident, "factor")?;
                self.actions.variable(token)
            }
            TokenKind::Bool(value) => {
                let token = self.eat(BOOL, "factor")?;
                self.actions.literal(token, value)
            }
            _ => Err(self.unexpected("factor", &[FIRST_FACTOR])),
        }
    }
}

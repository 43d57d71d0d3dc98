use std::fmt::Display;

use miette::{Diagnostic, Error, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
#[error("Unexpected character '{token}'")]
#[diagnostic(help("remove or correct the character: `{token}`"))]
pub struct LexicalError {
    #[source_code]
    src: NamedSource<String>,

    #[label("this character")]
    bad_bit: SourceSpan,

    pub token: char,
}

impl LexicalError {
    pub fn line(&self) -> usize {
        position(self.src.inner(), self.bad_bit.offset()).0
    }

    pub fn column(&self) -> usize {
        position(self.src.inner(), self.bad_bit.offset()).1
    }
}

/// 1-based (line, column) of the byte `offset` in `whole`, columns counted in chars.
pub fn position(whole: &str, offset: usize) -> (usize, usize) {
    let before = &whole[..offset.min(whole.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |nl| nl + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'de> {
    pub kind: TokenKind,
    pub literal: &'de str,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Bool(bool),
    Print,
    Equal,
    LeftParen,
    RightParen,
    And,
    Or,
    Not,
    Eof,
}

impl TokenKind {
    /// How the parser names this kind in "expected ..." messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Bool(_) => "boolean",
            TokenKind::Print => "`print`",
            TokenKind::Equal => "`=`",
            TokenKind::LeftParen => "`(`",
            TokenKind::RightParen => "`)`",
            TokenKind::And => "`and`",
            TokenKind::Or => "`or`",
            TokenKind::Not => "`not`",
            TokenKind::Eof => "end of input",
        }
    }

    /// Kind equality that ignores the value carried by boolean literals.
    pub fn same_category(&self, other: &TokenKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Maps a boolean literal spelling to its value.
///
/// The numerals are inverted on purpose: `0` is true and `1` is false.
pub fn literal_value(literal: &str) -> Option<bool> {
    match literal {
        "true" | "TRUE" | "True" | "t" | "T" | "0" => Some(true),
        "false" | "FALSE" | "False" | "f" | "F" | "1" => Some(false),
        _ => None,
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.literal;
        match self.kind {
            TokenKind::Ident => write!(f, "IDENTIFIER {lit} null"),
            TokenKind::Bool(b) => write!(f, "BOOLEAN {lit} {b}"),
            TokenKind::Print => write!(f, "PRINT {lit} null"),
            TokenKind::Equal => write!(f, "EQUAL {lit} null"),
            TokenKind::LeftParen => write!(f, "LEFT_PAREN {lit} null"),
            TokenKind::RightParen => write!(f, "RIGHT_PAREN {lit} null"),
            TokenKind::And => write!(f, "AND {lit} null"),
            TokenKind::Or => write!(f, "OR {lit} null"),
            TokenKind::Not => write!(f, "NOT {lit} null"),
            TokenKind::Eof => write!(f, "EOF {lit} null"),
        }
    }
}

pub struct Lexer<'de> {
    filename: Option<&'de str>,
    whole: &'de str,
    rest: &'de str,
    byte: usize,
}

impl<'de> Lexer<'de> {
    pub fn new(filename: Option<&'de str>, input: &'de str) -> Self {
        Lexer {
            filename,
            whole: input,
            rest: input,
            byte: 0,
        }
    }

    pub fn whole(&self) -> &'de str {
        self.whole
    }

    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.filename.unwrap_or("<input>"), self.whole.to_string())
    }

    /// The token every exhausted lexer keeps producing.
    pub fn eof(&self) -> Token<'de> {
        Token {
            kind: TokenKind::Eof,
            literal: "",
            offset: self.whole.len(),
        }
    }
}

impl<'de> Iterator for Lexer<'de> {
    type Item = Result<Token<'de>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut chars = self.rest.chars();
            let c = chars.next()?;
            let literal = &self.rest[..c.len_utf8()];
            let cur = self.rest;
            let offset = self.byte;
            self.rest = chars.as_str();
            self.byte += c.len_utf8();

            let process = |kind: TokenKind| {
                Some(Ok(Token {
                    kind,
                    literal,
                    offset,
                }))
            };

            match c {
                '(' => return process(TokenKind::LeftParen),
                ')' => return process(TokenKind::RightParen),
                '=' => return process(TokenKind::Equal),
                '0' => return process(TokenKind::Bool(true)),
                '1' => return process(TokenKind::Bool(false)),
                ' ' | '\t' | '\n' => continue,
                '\r' if self.rest.starts_with('\n') => continue,
                'a'..='z' | 'A'..='Z' => {
                    // longest match: the whole alphanumeric run is one token,
                    // its exact text decides between keyword, literal and identifier
                    let end = cur
                        .find(|c: char| !c.is_ascii_alphanumeric())
                        .unwrap_or(cur.len());
                    let literal = &cur[..end];

                    let extra_bytes = literal.len() - c.len_utf8();
                    self.byte += extra_bytes;
                    self.rest = &self.rest[extra_bytes..];

                    let kind = match literal {
                        "not" => TokenKind::Not,
                        "and" => TokenKind::And,
                        "or" => TokenKind::Or,
                        "print" => TokenKind::Print,
                        _ => match literal_value(literal) {
                            Some(value) => TokenKind::Bool(value),
                            None => TokenKind::Ident,
                        },
                    };

                    return Some(Ok(Token {
                        kind,
                        literal,
                        offset,
                    }));
                }
                c => {
                    return Some(Err(LexicalError {
                        src: self.named_source(),
                        bad_bit: SourceSpan::from(offset..self.byte),
                        token: c,
                    }
                    .into()));
                }
            }
        }
    }
}

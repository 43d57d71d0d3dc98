use miette::{Error, NamedSource, SourceSpan};

use crate::lex::{Lexer, Token, TokenKind, position};

/// One token of lookahead over a [`Lexer`].
///
/// Once the lexer is exhausted the lookahead is the end-of-input token and
/// stays so on every further [`Cursor::advance`].
pub struct Cursor<'de> {
    lexer: Lexer<'de>,
    lookahead: Token<'de>,
}

impl<'de> Cursor<'de> {
    pub fn new(mut lexer: Lexer<'de>) -> Result<Self, Error> {
        let lookahead = Self::pull(&mut lexer)?;
        Ok(Cursor { lexer, lookahead })
    }

    fn pull(lexer: &mut Lexer<'de>) -> Result<Token<'de>, Error> {
        match lexer.next() {
            Some(token) => token,
            None => Ok(lexer.eof()),
        }
    }

    pub fn peek(&self) -> &Token<'de> {
        &self.lookahead
    }

    pub fn kind(&self) -> TokenKind {
        self.lookahead.kind
    }

    pub fn lexeme(&self) -> &'de str {
        self.lookahead.literal
    }

    /// Replaces the lookahead with the next token and returns the one consumed.
    pub fn advance(&mut self) -> Result<Token<'de>, Error> {
        let next = Self::pull(&mut self.lexer)?;
        Ok(std::mem::replace(&mut self.lookahead, next))
    }

    /// 1-based (line, column) where the lookahead starts.
    pub fn position(&self) -> (usize, usize) {
        position(self.lexer.whole(), self.lookahead.offset)
    }

    pub fn span(&self) -> SourceSpan {
        SourceSpan::from(self.lookahead.offset..self.lookahead.offset + self.lookahead.literal.len())
    }

    pub fn named_source(&self) -> NamedSource<String> {
        self.lexer.named_source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::LexicalError;

    #[test]
    fn primes_one_token() {
        let cursor = Cursor::new(Lexer::new(None, "print x")).expect("lexes");
        assert_eq!(cursor.kind(), TokenKind::Print);
        assert_eq!(cursor.lexeme(), "print");
        assert_eq!(cursor.position(), (1, 1));
    }

    #[test]
    fn advance_returns_consumed_token() {
        let mut cursor = Cursor::new(Lexer::new(None, "print x")).expect("lexes");
        let consumed = cursor.advance().expect("lexes");
        assert_eq!(consumed.kind, TokenKind::Print);
        assert_eq!(cursor.kind(), TokenKind::Ident);
        assert_eq!(cursor.position(), (1, 7));
    }

    #[test]
    fn end_of_input_is_sticky() {
        let mut cursor = Cursor::new(Lexer::new(None, "x")).expect("lexes");
        cursor.advance().expect("lexes");
        assert_eq!(cursor.kind(), TokenKind::Eof);
        cursor.advance().expect("lexes");
        cursor.advance().expect("lexes");
        assert_eq!(cursor.kind(), TokenKind::Eof);
        assert_eq!(cursor.lexeme(), "");
    }

    #[test]
    fn empty_input_starts_at_end() {
        let cursor = Cursor::new(Lexer::new(None, "")).expect("lexes");
        assert_eq!(cursor.kind(), TokenKind::Eof);
    }

    #[test]
    fn advance_surfaces_lexical_errors() {
        let mut cursor = Cursor::new(Lexer::new(None, "x #")).expect("lexes");
        let err = cursor.advance().expect_err("fails on #");
        let err = err.downcast_ref::<LexicalError>().expect("lexical error");
        assert_eq!((err.line(), err.column()), (1, 3));
    }

    #[test]
    fn priming_surfaces_lexical_errors() {
        assert!(Cursor::new(Lexer::new(None, "$")).is_err());
    }
}

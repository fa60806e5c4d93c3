use crate::error::{InterpretError, Result};
use crate::token::{Token, TokenKind};

/// Forward-only position over a borrowed token window.
#[derive(Debug, Clone)]
pub struct Cursor<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> Cursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Cursor {
            tokens,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.position)
    }

    /// Tokens consumed since `start`.
    pub fn slice_from(&self, start: usize) -> &'t [Token] {
        &self.tokens[start.min(self.position)..self.position]
    }

    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.position)
    }

    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    pub fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// Consumes the next token if it has `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: TokenKind, err: InterpretError) -> Result<&'t Token> {
        match self.peek() {
            Some(token) if token.is(kind) => {
                self.position += 1;
                Ok(token)
            }
            _ => Err(err),
        }
    }

    /// Tokens from the current position up to the first `;`, which is
    /// consumed but not returned. `None` leaves the cursor untouched.
    pub fn until_semicolon(&mut self) -> Option<&'t [Token]> {
        let rest = &self.tokens[self.position..];
        let end = rest.iter().position(|token| token.is(TokenKind::Semicolon))?;
        self.position += end + 1;
        Some(&rest[..end])
    }

    /// Expects `open` at the current position and returns the tokens between
    /// it and its balancing `close`, consuming both delimiters.
    pub fn delimited(&mut self, open: TokenKind, close: TokenKind) -> Option<&'t [Token]> {
        let rest = &self.tokens[self.position..];
        let end = matching_close(rest, open, close)?;
        self.position += end + 1;
        Some(&rest[1..end])
    }
}

/// Index of the token closing `tokens[0]`, which must be `open`.
pub fn matching_close(tokens: &[Token], open: TokenKind, close: TokenKind) -> Option<usize> {
    if !tokens.first()?.is(open) {
        return None;
    }
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate() {
        if token.is(open) {
            depth += 1;
        } else if token.is(close) {
            depth -= 1;
            if depth == 0 {
                return Some(index);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use pretty_assertions::assert_eq;

    fn lexemes(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.lexeme.as_str()).collect()
    }

    #[test]
    fn test_until_semicolon() {
        let tokens = Lexer::tokenize("1 + 2; print").tokens;
        let mut cursor = Cursor::new(&tokens);

        assert_eq!(lexemes(cursor.until_semicolon().unwrap()), vec!["1", "+", "2"]);
        assert_eq!(cursor.position(), 4);
        assert!(cursor.until_semicolon().is_none());
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.remaining(), 1);
        assert_eq!(lexemes(cursor.slice_from(1)), vec!["+", "2", ";"]);
    }

    #[test]
    fn test_delimited_nested() {
        let tokens = Lexer::tokenize("{ a { b } } c").tokens;
        let mut cursor = Cursor::new(&tokens);

        let inner = cursor
            .delimited(TokenKind::LeftBrace, TokenKind::RightBrace)
            .unwrap();
        assert_eq!(lexemes(inner), vec!["a", "{", "b", "}"]);
        assert!(cursor.check(TokenKind::Identifier));
    }

    #[test]
    fn test_delimited_unbalanced() {
        let tokens = Lexer::tokenize("( ( a )").tokens;
        let mut cursor = Cursor::new(&tokens);

        assert!(cursor.delimited(TokenKind::LeftParen, TokenKind::RightParen).is_none());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_expect() {
        let tokens = Lexer::tokenize("= x").tokens;
        let mut cursor = Cursor::new(&tokens);

        assert!(cursor.expect(TokenKind::Equal, InterpretError::IncompletePrint).is_ok());
        assert!(matches!(
            cursor.expect(TokenKind::Equal, InterpretError::IncompletePrint),
            Err(InterpretError::IncompletePrint)
        ));
        assert!(cursor.eat(TokenKind::Identifier));
        assert_eq!(cursor.remaining(), 0);
    }
}

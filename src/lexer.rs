use std::fmt;

use crate::token::{Token, TokenKind};

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum LexError {
    #[error("[line {line}] Error: Unexpected character: {ch}")]
    UnexpectedCharacter { line: usize, ch: char },
    #[error("[line {line}] Error: Unterminated string.")]
    UnterminatedString { line: usize },
}

/// Result of scanning a whole source: tokens are kept even when some
/// characters could not be classified.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl Tokenized {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl fmt::Display for Tokenized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            writeln!(f, "{token}")?;
        }
        write!(f, "EOF  null")
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    read_position: usize,
    ch: u8,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer {
            input,
            position: 0,
            read_position: 0,
            ch: 0,
            line: 1,
        };
        lexer.read_char();
        lexer
    }

    pub fn tokenize(input: &'a str) -> Tokenized {
        let mut lexer = Lexer::new(input);
        let mut scanned = Tokenized::default();
        while let Some(next) = lexer.next_token() {
            match next {
                Ok(token) => scanned.tokens.push(token),
                Err(err) => scanned.errors.push(err),
            }
        }
        tracing::debug!(
            tokens = scanned.tokens.len(),
            errors = scanned.errors.len(),
            "scanned source"
        );
        scanned
    }

    /// Returns `None` once the input is exhausted.
    pub fn next_token(&mut self) -> Option<Result<Token, LexError>> {
        self.skip_whitespace();
        if self.at_end() {
            return None;
        }

        let start = self.position;
        let kind = match self.ch {
            b'(' => TokenKind::LeftParen,
            b')' => TokenKind::RightParen,
            b'{' => TokenKind::LeftBrace,
            b'}' => TokenKind::RightBrace,
            b',' => TokenKind::Comma,
            b'.' => TokenKind::Dot,
            b';' => TokenKind::Semicolon,
            b'-' => TokenKind::Minus,
            b'+' => TokenKind::Plus,
            b'*' => TokenKind::Star,
            b'/' => {
                if self.peek_char() == b'/' {
                    self.skip_comment();
                    return self.next_token();
                }
                TokenKind::Slash
            }
            b'!' => self.one_or_two(TokenKind::Bang, TokenKind::BangEqual),
            b'=' => self.one_or_two(TokenKind::Equal, TokenKind::EqualEqual),
            b'<' => self.one_or_two(TokenKind::Less, TokenKind::LessEqual),
            b'>' => self.one_or_two(TokenKind::Greater, TokenKind::GreaterEqual),
            b'"' => return Some(self.read_string()),
            b'0'..=b'9' => return Some(Ok(self.read_number())),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => return Some(Ok(self.read_identifier())),
            _ => {
                let ch = self.input[self.position..].chars().next().unwrap_or('\u{fffd}');
                for _ in 0..ch.len_utf8() {
                    self.read_char();
                }
                return Some(Err(LexError::UnexpectedCharacter {
                    line: self.line,
                    ch,
                }));
            }
        };

        self.read_char();
        Some(Ok(Token::new(
            kind,
            &self.input[start..self.position],
            self.line,
        )))
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn read_char(&mut self) {
        if self.read_position >= self.input.len() {
            // 0 marks the end of input
            self.ch = 0;
        } else {
            self.ch = self.input.as_bytes()[self.read_position];
        }
        self.position = self.read_position;
        self.read_position += 1;
    }

    fn peek_char(&self) -> u8 {
        if self.read_position >= self.input.len() {
            0
        } else {
            self.input.as_bytes()[self.read_position]
        }
    }

    fn one_or_two(&mut self, single: TokenKind, with_equal: TokenKind) -> TokenKind {
        if self.peek_char() == b'=' {
            self.read_char();
            with_equal
        } else {
            single
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.at_end() && self.ch.is_ascii_whitespace() {
            if self.ch == b'\n' {
                self.line += 1;
            }
            self.read_char();
        }
    }

    fn skip_comment(&mut self) {
        while self.ch != b'\n' && !self.at_end() {
            self.read_char();
        }
    }

    fn read_identifier(&mut self) -> Token {
        let position = self.position;
        while !self.at_end() && (self.ch.is_ascii_alphanumeric() || self.ch == b'_') {
            self.read_char();
        }
        let word = &self.input[position..self.position];
        let kind = TokenKind::keyword(word).unwrap_or(TokenKind::Identifier);
        Token::new(kind, word, self.line)
    }

    fn read_number(&mut self) -> Token {
        let position = self.position;
        while !self.at_end() && self.ch.is_ascii_digit() {
            self.read_char();
        }

        // A trailing dot is not part of the number
        if self.ch == b'.' && self.peek_char().is_ascii_digit() {
            self.read_char();
            while !self.at_end() && self.ch.is_ascii_digit() {
                self.read_char();
            }
        }
        Token::new(TokenKind::Number, &self.input[position..self.position], self.line)
    }

    fn read_string(&mut self) -> Result<Token, LexError> {
        let position = self.position;
        let start_line = self.line;
        loop {
            self.read_char();
            if self.at_end() {
                return Err(LexError::UnterminatedString { line: self.line });
            }
            if self.ch == b'\n' {
                self.line += 1;
            }
            if self.ch == b'"' {
                break;
            }
        }
        // Consume closing "
        self.read_char();
        Ok(Token::new(
            TokenKind::String,
            &self.input[position..self.position],
            start_line,
        ))
    }
}

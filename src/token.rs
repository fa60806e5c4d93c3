use std::fmt;
use std::str::FromStr;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    // Punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Semicolon,

    // Operators
    Minus,
    Plus,
    Star,
    Slash,
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Literals
    Identifier,
    String,
    Number,

    // Keywords
    And,
    Class,
    Else,
    False,
    For,
    Fun,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::LeftParen => "LEFT_PAREN",
            TokenKind::RightParen => "RIGHT_PAREN",
            TokenKind::LeftBrace => "LEFT_BRACE",
            TokenKind::RightBrace => "RIGHT_BRACE",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Minus => "MINUS",
            TokenKind::Plus => "PLUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Bang => "BANG",
            TokenKind::BangEqual => "BANG_EQUAL",
            TokenKind::Equal => "EQUAL",
            TokenKind::EqualEqual => "EQUAL_EQUAL",
            TokenKind::Less => "LESS",
            TokenKind::LessEqual => "LESS_EQUAL",
            TokenKind::Greater => "GREATER",
            TokenKind::GreaterEqual => "GREATER_EQUAL",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::And => "AND",
            TokenKind::Class => "CLASS",
            TokenKind::Else => "ELSE",
            TokenKind::False => "FALSE",
            TokenKind::For => "FOR",
            TokenKind::Fun => "FUN",
            TokenKind::If => "IF",
            TokenKind::Nil => "NIL",
            TokenKind::Or => "OR",
            TokenKind::Print => "PRINT",
            TokenKind::Return => "RETURN",
            TokenKind::Super => "SUPER",
            TokenKind::This => "THIS",
            TokenKind::True => "TRUE",
            TokenKind::Var => "VAR",
            TokenKind::While => "WHILE",
        }
    }

    /// Keyword lookup for an identifier-shaped word.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "and" => TokenKind::And,
            "class" => TokenKind::Class,
            "else" => TokenKind::Else,
            "false" => TokenKind::False,
            "for" => TokenKind::For,
            "fun" => TokenKind::Fun,
            "if" => TokenKind::If,
            "nil" => TokenKind::Nil,
            "or" => TokenKind::Or,
            "print" => TokenKind::Print,
            "return" => TokenKind::Return,
            "super" => TokenKind::Super,
            "this" => TokenKind::This,
            "true" => TokenKind::True,
            "var" => TokenKind::Var,
            "while" => TokenKind::While,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TokenKind {
    type Err = TokenDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "LEFT_PAREN" => TokenKind::LeftParen,
            "RIGHT_PAREN" => TokenKind::RightParen,
            "LEFT_BRACE" => TokenKind::LeftBrace,
            "RIGHT_BRACE" => TokenKind::RightBrace,
            "COMMA" => TokenKind::Comma,
            "DOT" => TokenKind::Dot,
            "SEMICOLON" => TokenKind::Semicolon,
            "MINUS" => TokenKind::Minus,
            "PLUS" => TokenKind::Plus,
            "STAR" => TokenKind::Star,
            "SLASH" => TokenKind::Slash,
            "BANG" => TokenKind::Bang,
            "BANG_EQUAL" => TokenKind::BangEqual,
            "EQUAL" => TokenKind::Equal,
            "EQUAL_EQUAL" => TokenKind::EqualEqual,
            "LESS" => TokenKind::Less,
            "LESS_EQUAL" => TokenKind::LessEqual,
            "GREATER" => TokenKind::Greater,
            "GREATER_EQUAL" => TokenKind::GreaterEqual,
            "IDENTIFIER" => TokenKind::Identifier,
            "STRING" => TokenKind::String,
            "NUMBER" => TokenKind::Number,
            other => {
                return TokenKind::keyword(&other.to_ascii_lowercase())
                    .filter(|kind| kind.name() == other)
                    .ok_or_else(|| TokenDecodeError::UnknownKind(other.to_string()));
            }
        };
        Ok(kind)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// The literal column of the `tokenize` output.
    fn literal(&self) -> String {
        match self.kind {
            TokenKind::String => self.lexeme.trim_matches('"').to_string(),
            TokenKind::Number => match self.lexeme.parse::<f64>() {
                Ok(n) if n.fract() == 0.0 => format!("{n:.1}"),
                Ok(n) => n.to_string(),
                Err(_) => "null".to_string(),
            },
            _ => "null".to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.lexeme, self.literal())
    }
}

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum TokenDecodeError {
    #[error("empty token encoding")]
    Empty,
    #[error("unknown token kind `{0}`")]
    UnknownKind(String),
}

/// Decodes the `"<KIND> <lexeme...>"` form: the first word is the kind and the
/// remaining words, space-joined, are the lexeme.
impl FromStr for Token {
    type Err = TokenDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split(' ');
        let kind = match words.next() {
            Some(word) if !word.is_empty() => word.parse::<TokenKind>()?,
            _ => return Err(TokenDecodeError::Empty),
        };
        let lexeme = words.collect::<Vec<_>>().join(" ");
        Ok(Token::new(kind, lexeme, 0))
    }
}

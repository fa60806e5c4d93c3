use std::fmt;

use crate::token::TokenKind;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOp {
    Negate,
    Not,
}

impl UnaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Minus => Some(UnaryOp::Negate),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Subtract,
            TokenKind::Star => BinaryOp::Multiply,
            TokenKind::Slash => BinaryOp::Divide,
            TokenKind::EqualEqual => BinaryOp::Equal,
            TokenKind::BangEqual => BinaryOp::NotEqual,
            TokenKind::Less => BinaryOp::Less,
            TokenKind::LessEqual => BinaryOp::LessEqual,
            TokenKind::Greater => BinaryOp::Greater,
            TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
            TokenKind::And => BinaryOp::And,
            TokenKind::Or => BinaryOp::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

/// Expression tree built for a single statement and evaluated once.
///
/// A parenthesized group never appears here as its own variant: the parser
/// materializes it as a `StringLiteral` holding `(group <inner>)`, so the
/// runtime value of a group is that text.
#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    NumberLiteral(f32),
    StringLiteral(String),
    BoolLiteral(bool),
    NilLiteral,
    Identifier(String),
    // <op> <operand>
    Prefix(UnaryOp, Box<Expression>),
    // <left> <op> <right>
    Infix(Box<Expression>, BinaryOp, Box<Expression>),
}

impl Expression {
    pub fn prefix(op: UnaryOp, operand: Expression) -> Self {
        Expression::Prefix(op, Box::new(operand))
    }

    pub fn infix(left: Expression, op: BinaryOp, right: Expression) -> Self {
        Expression::Infix(Box::new(left), op, Box::new(right))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Expression::NilLiteral)
    }
}

/// Canonical text form: literals print their value, operators print in
/// prefix form, e.g. `(+ 1 (- 2))`.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::NumberLiteral(n) => write!(f, "{n}"),
            Expression::StringLiteral(s) => f.write_str(s),
            Expression::BoolLiteral(b) => write!(f, "{b}"),
            Expression::NilLiteral => f.write_str("nil"),
            Expression::Identifier(name) => f.write_str(name),
            Expression::Prefix(op, operand) => write!(f, "({} {operand})", op.symbol()),
            Expression::Infix(left, op, right) => {
                write!(f, "({} {left} {right})", op.symbol())
            }
        }
    }
}

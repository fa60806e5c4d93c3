use crate::ast::{BinaryOp, Expression, UnaryOp};
use crate::config::DEFAULT_MAX_DEPTH;
use crate::cursor::matching_close;
use crate::environment::Environment;
use crate::evaluator::evaluate;
use crate::token::{Token, TokenKind};

/// Turns one bounded token window into an expression tree.
///
/// The window is classified, first match wins, as:
/// 1. a single token, parsed as a literal or identifier;
/// 2. a parenthesized group spanning the whole window;
/// 3. a chain of operands and binary operators, folded strictly left to right
///    (`1 + 2 * 3` is `(1 + 2) * 3`);
/// 4. a unary operator applied to one operand.
///
/// Anything else becomes `NilLiteral`. Failures at this layer are silent and
/// only show up later when the nil value is used.
pub struct Parser<'a> {
    env: &'a Environment,
    max_depth: usize,
}

/// Operand windows of a binary chain and the operators between them.
struct Chain<'t> {
    first: &'t [Token],
    rest: Vec<(BinaryOp, &'t [Token])>,
}

impl<'a> Parser<'a> {
    pub fn new(env: &'a Environment) -> Self {
        Parser {
            env,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn parse_expression(&self, tokens: &[Token]) -> Expression {
        self.parse_window(tokens, 0)
    }

    fn parse_window(&self, tokens: &[Token], depth: usize) -> Expression {
        if depth > self.max_depth {
            tracing::debug!(limit = self.max_depth, "expression nested too deeply");
            return Expression::NilLiteral;
        }

        if let [token] = tokens {
            return parse_value(token);
        }
        if is_grouping(tokens) {
            return self.parse_grouping(tokens, depth);
        }
        if let Some(chain) = split_chain(tokens) {
            return self.parse_infix_chain(chain, depth);
        }
        if is_prefix(tokens) {
            return self.parse_prefix(tokens, depth);
        }

        tracing::debug!(
            tokens = tokens.len(),
            first = ?tokens.first().map(|t| t.kind),
            "unrecognized expression shape"
        );
        Expression::NilLiteral
    }

    /// A group becomes the text `(group <inner>)`.
    fn parse_grouping(&self, tokens: &[Token], depth: usize) -> Expression {
        let inner = self.parse_window(&tokens[1..tokens.len() - 1], depth + 1);
        Expression::StringLiteral(format!("(group {inner})"))
    }

    /// Every operator adds one level to the left-nested tree, so a chain
    /// longer than the remaining depth budget falls back to nil.
    fn parse_infix_chain(&self, chain: Chain<'_>, depth: usize) -> Expression {
        if depth + chain.rest.len() > self.max_depth {
            tracing::debug!(
                operators = chain.rest.len(),
                limit = self.max_depth,
                "operator chain too long"
            );
            return Expression::NilLiteral;
        }

        let mut left = self.parse_window(chain.first, depth + 1);
        for (op, operand) in chain.rest {
            let right = self.parse_window(operand, depth + 1);
            left = Expression::infix(left, op, right);
        }
        left
    }

    fn parse_prefix(&self, tokens: &[Token], depth: usize) -> Expression {
        let Some(op) = tokens.first().and_then(|t| UnaryOp::from_token(t.kind)) else {
            return Expression::NilLiteral;
        };
        let rest = &tokens[1..];

        let operand = if depth >= self.max_depth {
            Expression::NilLiteral
        } else if is_prefix(rest) {
            self.parse_prefix(rest, depth + 1)
        } else if is_grouping(rest) {
            self.parse_grouping(rest, depth + 1)
        } else if let [token] = rest {
            parse_value(token)
        } else {
            return Expression::NilLiteral;
        };

        // A nil operand takes the whole unary expression down with it
        if operand.is_nil() || operand.to_string() == "nil" || evaluate(&operand, self.env).is_nil()
        {
            return Expression::NilLiteral;
        }
        Expression::prefix(op, operand)
    }
}

fn parse_value(token: &Token) -> Expression {
    match token.kind {
        TokenKind::Number => match token.lexeme.parse::<f32>() {
            Ok(n) => Expression::NumberLiteral(n),
            Err(_) => Expression::NilLiteral,
        },
        TokenKind::True => Expression::BoolLiteral(true),
        TokenKind::False => Expression::BoolLiteral(false),
        TokenKind::Nil => Expression::NilLiteral,
        TokenKind::String => {
            let text = token.lexeme.split('"').nth(1).unwrap_or_default();
            Expression::StringLiteral(text.to_string())
        }
        TokenKind::Identifier => Expression::Identifier(token.lexeme.clone()),
        _ => Expression::NilLiteral,
    }
}

fn is_grouping(tokens: &[Token]) -> bool {
    tokens.len() >= 2
        && matching_close(tokens, TokenKind::LeftParen, TokenKind::RightParen)
            == Some(tokens.len() - 1)
}

fn is_prefix(tokens: &[Token]) -> bool {
    tokens.len() >= 2 && UnaryOp::from_token(tokens[0].kind).is_some()
}

fn is_atom(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Number
            | TokenKind::String
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Nil
            | TokenKind::Identifier
    )
}

/// End (exclusive) of the operand starting at `start`: any number of unary
/// operators followed by an atom or a balanced group.
fn operand_end(tokens: &[Token], start: usize) -> Option<usize> {
    let mut pos = start;
    while pos < tokens.len() && UnaryOp::from_token(tokens[pos].kind).is_some() {
        pos += 1;
    }
    let token = tokens.get(pos)?;
    if token.is(TokenKind::LeftParen) {
        let close = matching_close(&tokens[pos..], TokenKind::LeftParen, TokenKind::RightParen)?;
        Some(pos + close + 1)
    } else if is_atom(token.kind) {
        Some(pos + 1)
    } else {
        None
    }
}

/// Splits `operand (op operand)+`; `None` when the window has any other shape.
fn split_chain(tokens: &[Token]) -> Option<Chain<'_>> {
    let first_end = operand_end(tokens, 0)?;
    let mut chain = Chain {
        first: &tokens[..first_end],
        rest: Vec::new(),
    };

    let mut pos = first_end;
    while pos < tokens.len() {
        let op = BinaryOp::from_token(tokens[pos].kind)?;
        let end = operand_end(tokens, pos + 1)?;
        chain.rest.push((op, &tokens[pos + 1..end]));
        pos = end;
    }

    if chain.rest.is_empty() {
        return None;
    }
    Some(chain)
}

use crate::ast::{BinaryOp, Expression, UnaryOp};
use crate::environment::Environment;
use crate::value::Value;

/// Evaluates an expression tree. Any operator applied to operands of the
/// wrong kind yields `Value::Nil` instead of an error.
pub fn evaluate(expr: &Expression, env: &Environment) -> Value {
    match expr {
        Expression::NumberLiteral(n) => Value::Number(*n),
        Expression::StringLiteral(s) => Value::Str(s.clone()),
        Expression::BoolLiteral(b) => Value::Bool(*b),
        Expression::NilLiteral => Value::Nil,
        Expression::Identifier(name) => match env.get(name) {
            Some(value) => value.clone(),
            None => {
                tracing::debug!(%name, "undefined variable evaluates to nil");
                Value::Nil
            }
        },
        Expression::Prefix(op, operand) => {
            let operand = evaluate(operand, env);
            unary(*op, operand)
        }
        Expression::Infix(left, op, right) => {
            let left = evaluate(left, env);
            let right = evaluate(right, env);
            binary(left, *op, right)
        }
    }
}

fn unary(op: UnaryOp, operand: Value) -> Value {
    match (op, operand) {
        (UnaryOp::Negate, Value::Number(n)) => Value::Number(-n),
        (UnaryOp::Not, Value::Bool(b)) => Value::Bool(!b),
        (op, operand) => mismatch(op.symbol(), &[&operand]),
    }
}

fn binary(left: Value, op: BinaryOp, right: Value) -> Value {
    use Value::{Bool, Number, Str};

    match (op, left, right) {
        (BinaryOp::Equal, l, r) => Bool(equals(&l, &r)),
        (BinaryOp::NotEqual, l, r) => Bool(!equals(&l, &r)),

        (BinaryOp::Add, Number(l), Number(r)) => Number(l + r),
        (BinaryOp::Add, Str(l), Str(r)) => Str(l + &r),
        (BinaryOp::Subtract, Number(l), Number(r)) => Number(l - r),
        (BinaryOp::Multiply, Number(l), Number(r)) => Number(l * r),
        (BinaryOp::Divide, Number(l), Number(r)) => Number(l / r),

        (BinaryOp::Less, Number(l), Number(r)) => Bool(l < r),
        (BinaryOp::LessEqual, Number(l), Number(r)) => Bool(l <= r),
        (BinaryOp::Greater, Number(l), Number(r)) => Bool(l > r),
        (BinaryOp::GreaterEqual, Number(l), Number(r)) => Bool(l >= r),

        (BinaryOp::And, Bool(l), Bool(r)) => Bool(l && r),
        (BinaryOp::Or, Bool(l), Bool(r)) => Bool(l || r),

        (op, l, r) => mismatch(op.symbol(), &[&l, &r]),
    }
}

/// Values of different kinds are never equal.
fn equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l == r,
        (Value::Bool(l), Value::Bool(r)) => l == r,
        (Value::Str(l), Value::Str(r)) => l == r,
        (Value::Nil, Value::Nil) => true,
        _ => false,
    }
}

fn mismatch(symbol: &str, operands: &[&Value]) -> Value {
    let kinds: Vec<&str> = operands.iter().map(|v| v.kind_name()).collect();
    tracing::debug!(operator = symbol, ?kinds, "operand mismatch evaluates to nil");
    Value::Nil
}

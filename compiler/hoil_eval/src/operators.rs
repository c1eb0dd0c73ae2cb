//! Operator semantics.
//!
//! Numbers follow IEEE `f64` arithmetic: division by zero yields an infinity
//! or NaN rather than an error. `%` is floored modulo, so the result takes the
//! sign of the divisor. `+` concatenates as soon as either side is a string.
//! Logical operators coerce by truthiness and always evaluate both operands,
//! because both are already on the stack.

use hoil_ir::{Op, Value};

use crate::EvalError;

/// Apply a binary operator. `left` is the operand pushed first.
pub fn apply_binary(op: Op, left: Value, right: Value) -> Result<Value, EvalError> {
    match op {
        Op::Add => match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::string(format!("{left}{right}"))),
            _ => Err(mismatch(op, &left, &right)),
        },
        Op::Sub | Op::Mul | Op::Div | Op::Mod => {
            let (Value::Number(a), Value::Number(b)) = (&left, &right) else {
                return Err(mismatch(op, &left, &right));
            };
            let (a, b) = (*a, *b);
            Ok(Value::Number(match op {
                Op::Sub => a - b,
                Op::Mul => a * b,
                Op::Div => a / b,
                _ => floored_mod(a, b),
            }))
        }
        Op::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
        Op::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
        Op::Eq => Ok(Value::Bool(left == right)),
        Op::NotEq => Ok(Value::Bool(left != right)),
        Op::Gt | Op::GtEq | Op::Lt | Op::LtEq => compare(op, &left, &right).map(Value::Bool),
        Op::Not | Op::Neg => Err(EvalError::InvalidOperand {
            op,
            operand: left.type_name(),
        }),
    }
}

/// Apply a unary operator.
pub fn apply_unary(op: Op, operand: Value) -> Result<Value, EvalError> {
    match (op, &operand) {
        (Op::Not, _) => Ok(Value::Bool(!operand.is_truthy())),
        (Op::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
        _ => Err(EvalError::InvalidOperand {
            op,
            operand: operand.type_name(),
        }),
    }
}

fn floored_mod(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

/// Ordering on two numbers or two strings. Comparisons with NaN are false.
fn compare(op: Op, left: &Value, right: &Value) -> Result<bool, EvalError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(ordered(op, a, b)),
        (Value::Str(a), Value::Str(b)) => Ok(ordered(op, &**a, &**b)),
        _ => Err(mismatch(op, left, right)),
    }
}

fn ordered<T: PartialOrd + ?Sized>(op: Op, a: &T, b: &T) -> bool {
    match op {
        Op::Gt => a > b,
        Op::GtEq => a >= b,
        Op::Lt => a < b,
        _ => a <= b,
    }
}

fn mismatch(op: Op, left: &Value, right: &Value) -> EvalError {
    EvalError::TypeMismatch {
        op,
        left: left.type_name(),
        right: right.type_name(),
    }
}

#[cfg(test)]
mod tests;

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use pretty_assertions::assert_eq;

fn num(n: f64) -> Value {
    Value::Number(n)
}

// === Arithmetic ===

#[test]
fn test_arithmetic() {
    assert_eq!(apply_binary(Op::Add, num(2.0), num(3.0)), Ok(num(5.0)));
    assert_eq!(apply_binary(Op::Sub, num(2.0), num(3.0)), Ok(num(-1.0)));
    assert_eq!(apply_binary(Op::Mul, num(2.0), num(3.0)), Ok(num(6.0)));
    assert_eq!(apply_binary(Op::Div, num(3.0), num(2.0)), Ok(num(1.5)));
}

#[test]
fn test_division_by_zero_is_ieee() {
    assert_eq!(
        apply_binary(Op::Div, num(1.0), num(0.0)),
        Ok(num(f64::INFINITY))
    );
    let Value::Number(n) = apply_binary(Op::Div, num(0.0), num(0.0)).unwrap() else {
        panic!("expected number");
    };
    assert!(n.is_nan());
}

#[test]
fn test_modulo_takes_sign_of_divisor() {
    assert_eq!(apply_binary(Op::Mod, num(7.0), num(3.0)), Ok(num(1.0)));
    assert_eq!(apply_binary(Op::Mod, num(-7.0), num(3.0)), Ok(num(2.0)));
    assert_eq!(apply_binary(Op::Mod, num(7.0), num(-3.0)), Ok(num(-2.0)));
    assert_eq!(apply_binary(Op::Mod, num(6.0), num(3.0)), Ok(num(0.0)));
}

#[test]
fn test_string_concatenation() {
    assert_eq!(
        apply_binary(Op::Add, Value::string("pos "), num(3.0)),
        Ok(Value::string("pos 3"))
    );
    assert_eq!(
        apply_binary(Op::Add, num(1.0), Value::string("st")),
        Ok(Value::string("1st"))
    );
}

#[test]
fn test_arithmetic_type_mismatch() {
    assert_eq!(
        apply_binary(Op::Sub, Value::string("a"), num(1.0)),
        Err(EvalError::TypeMismatch {
            op: Op::Sub,
            left: "string",
            right: "number"
        })
    );
    assert!(apply_binary(Op::Add, Value::Bool(true), num(1.0)).is_err());
}

// === Logic and comparison ===

#[test]
fn test_logic_coerces_truthiness() {
    assert_eq!(
        apply_binary(Op::And, num(1.0), Value::string("x")),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        apply_binary(Op::Or, num(0.0), Value::Unit),
        Ok(Value::Bool(false))
    );
    assert_eq!(apply_unary(Op::Not, num(0.0)), Ok(Value::Bool(true)));
}

#[test]
fn test_equality_is_structural_and_total() {
    assert_eq!(
        apply_binary(Op::Eq, Value::string("a"), Value::string("a")),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        apply_binary(Op::NotEq, Value::string("1"), num(1.0)),
        Ok(Value::Bool(true))
    );
}

#[test]
fn test_ordering() {
    assert_eq!(apply_binary(Op::Gt, num(2.0), num(1.0)), Ok(Value::Bool(true)));
    assert_eq!(apply_binary(Op::LtEq, num(2.0), num(2.0)), Ok(Value::Bool(true)));
    assert_eq!(
        apply_binary(Op::Lt, Value::string("apple"), Value::string("pear")),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        apply_binary(Op::Gt, num(f64::NAN), num(1.0)),
        Ok(Value::Bool(false))
    );
    assert!(apply_binary(Op::Gt, Value::string("1"), num(0.0)).is_err());
}

#[test]
fn test_negation() {
    assert_eq!(apply_unary(Op::Neg, num(4.0)), Ok(num(-4.0)));
    assert_eq!(
        apply_unary(Op::Neg, Value::string("4")),
        Err(EvalError::InvalidOperand {
            op: Op::Neg,
            operand: "string"
        })
    );
}

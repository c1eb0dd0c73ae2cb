use super::*;

#[test]
fn test_operator_spellings_round_trip() {
    for spelling in [
        "+", "-", "*", "/", "%", "&&", "||", "==", "!=", ">", ">=", "<", "<=", "!", "[",
    ] {
        let op = Op::from_spelling(spelling);
        assert_eq!(op.map(Op::as_symbol), Some(spelling));
    }
}

#[test]
fn test_unknown_operator_spelling() {
    assert_eq!(Op::from_spelling("**"), None);
    assert_eq!(Op::from_spelling("and"), None);
}

#[test]
fn test_only_not_and_negation_are_unary() {
    assert!(Op::Not.is_unary());
    assert!(Op::Neg.is_unary());
    assert!(!Op::Sub.is_unary());
    assert!(!Op::Eq.is_unary());
}

#[test]
fn test_literal_to_value() {
    assert_eq!(Literal::Number(2.5).to_value(), Value::Number(2.5));
    assert_eq!(Literal::Str("hi".into()).to_value(), Value::string("hi"));
    assert_eq!(Literal::Bool(false).to_value(), Value::Bool(false));
}

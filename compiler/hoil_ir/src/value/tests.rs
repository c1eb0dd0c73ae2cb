use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_integral_numbers_display_without_fraction() {
    assert_eq!(Value::Number(5.0).to_string(), "5");
    assert_eq!(Value::Number(-4.0).to_string(), "-4");
    assert_eq!(Value::Number(0.25).to_string(), "0.25");
}

#[test]
fn test_array_display_follows_index_order() {
    let mut items = BTreeMap::new();
    items.insert(2, Value::Number(3.0));
    items.insert(0, Value::Number(1.0));
    let value = Value::Array(Rc::new(items));
    assert_eq!(value.to_string(), "[1, 3]");
}

#[test]
fn test_array_from_is_dense() {
    let value = Value::array_from([Value::Bool(true), Value::string("a")]);
    let Value::Array(items) = value else {
        panic!("expected array");
    };
    assert_eq!(items.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
}

#[test]
fn test_truthiness() {
    assert!(Value::Number(2.0).is_truthy());
    assert!(!Value::Number(0.0).is_truthy());
    assert!(!Value::string("").is_truthy());
    assert!(Value::string("x").is_truthy());
    assert!(!Value::empty_array().is_truthy());
    assert!(Value::Opaque(HostObject::new(1, "cup")).is_truthy());
    assert!(!Value::Unit.is_truthy());
}

#[test]
fn test_structural_equality() {
    assert_eq!(
        Value::array_from([Value::Number(1.0)]),
        Value::array_from([Value::Number(1.0)])
    );
    assert_ne!(Value::string("1"), Value::Number(1.0));
}

use super::*;

#[test]
fn test_intern_is_idempotent() {
    let interner = StringInterner::new();
    let a = interner.intern("speed");
    let b = interner.intern("speed");
    assert_eq!(a, b);
    assert_eq!(interner.lookup(a), "speed");
}

#[test]
fn test_distinct_strings_get_distinct_names() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let y = interner.intern("y");
    assert_ne!(x, y);
    assert_eq!(interner.lookup(x), "x");
    assert_eq!(interner.lookup(y), "y");
}

#[test]
fn test_empty_string_is_pre_interned() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.len(), 1);
}

#[test]
fn test_get_does_not_insert() {
    let interner = StringInterner::new();
    assert_eq!(interner.get("missing"), None);
    assert_eq!(interner.len(), 1);
    let name = interner.intern("missing");
    assert_eq!(interner.get("missing"), Some(name));
}

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use hoil_ir::{StringInterner, Value};
use pretty_assertions::assert_eq;

fn kinds(source: &str, interner: &StringInterner) -> Vec<TokenKind> {
    lex_expr(source, interner)
        .unwrap()
        .tokens()
        .iter()
        .map(|t| t.kind.clone())
        .collect()
}

// === Classification ===

#[test]
fn test_binary_expression() {
    let interner = StringInterner::new();
    let a = interner.intern("a");
    let b = interner.intern("b");
    assert_eq!(
        kinds("%a%;%b%;+", &interner),
        vec![
            TokenKind::Variable(a),
            TokenKind::Variable(b),
            TokenKind::Operator(Some(Op::Add)),
        ]
    );
}

#[test]
fn test_negation_spelling_is_unary_operator() {
    let interner = StringInterner::new();
    let tokens = kinds("%a%;[", &interner);
    assert_eq!(tokens[1], TokenKind::Operator(Some(Op::Neg)));
}

#[test]
fn test_modulo_is_an_operator_not_a_variable() {
    let interner = StringInterner::new();
    assert_eq!(
        kinds("7;2;%", &interner)[2],
        TokenKind::Operator(Some(Op::Mod))
    );
}

#[test]
fn test_literals() {
    let interner = StringInterner::new();
    assert_eq!(
        kinds("1.5;-2;\"hi there\";true;false", &interner),
        vec![
            TokenKind::Literal(Literal::Number(1.5)),
            TokenKind::Literal(Literal::Number(-2.0)),
            TokenKind::Literal(Literal::Str("hi there".into())),
            TokenKind::Literal(Literal::Bool(true)),
            TokenKind::Literal(Literal::Bool(false)),
        ]
    );
}

#[test]
fn test_words_are_not_numbers_or_booleans() {
    let interner = StringInterner::new();
    assert_eq!(
        kinds("inf;nan;True;-", &interner),
        vec![
            TokenKind::Operator(None),
            TokenKind::Operator(None),
            TokenKind::Operator(None),
            TokenKind::Operator(Some(Op::Sub)),
        ]
    );
}

#[test]
fn test_separator_inside_string_does_not_split() {
    let interner = StringInterner::new();
    let expr = lex_expr("\"a;b\";\"c\";+", &interner).unwrap();
    assert_eq!(expr.tokens().len(), 3);
    assert_eq!(
        expr.tokens()[0].kind,
        TokenKind::Literal(Literal::Str("a;b".into()))
    );
}

#[test]
fn test_empty_items_are_skipped() {
    let interner = StringInterner::new();
    assert_eq!(kinds("1;;2;+;", &interner).len(), 3);
    assert!(lex_expr("", &interner).unwrap().is_empty());
}

#[test]
fn test_spelling_is_preserved() {
    let interner = StringInterner::new();
    let expr = lex_expr("%speed% ; 2 ; *", &interner).unwrap();
    let spellings: Vec<&str> = expr.tokens().iter().map(|t| &*t.spelling).collect();
    assert_eq!(spellings, vec!["%speed%", "2", "*"]);
    assert_eq!(&**expr.source(), "%speed% ; 2 ; *");
}

// === Nested regions ===

#[test]
fn test_nested_call_arguments_are_expressions() {
    let interner = StringInterner::new();
    let expr = lex_expr("(MoveTo,%x%;1;+,0,\"top\");%z%;+", &interner).unwrap();
    assert_eq!(expr.tokens().len(), 3);
    let TokenKind::NestedCall { callee, args } = &expr.tokens()[0].kind else {
        panic!("expected nested call");
    };
    assert_eq!(interner.lookup(*callee), "MoveTo");
    assert_eq!(args.len(), 3);
    assert_eq!(args[0].tokens().len(), 3);
    assert_eq!(
        args[2].tokens()[0].kind,
        TokenKind::Literal(Literal::Str("top".into()))
    );
}

#[test]
fn test_nested_call_without_arguments() {
    let interner = StringInterner::new();
    let tokens = kinds("(OpenGripper)", &interner);
    let TokenKind::NestedCall { args, .. } = &tokens[0] else {
        panic!("expected nested call");
    };
    assert!(args.is_empty());
}

#[test]
fn test_call_inside_call() {
    let interner = StringInterner::new();
    let tokens = kinds("(HeightOf,(FindObject,\"cup\"))", &interner);
    let TokenKind::NestedCall { args, .. } = &tokens[0] else {
        panic!("expected nested call");
    };
    assert!(matches!(
        args[0].tokens()[0].kind,
        TokenKind::NestedCall { .. }
    ));
}

#[test]
fn test_array_index() {
    let interner = StringInterner::new();
    let pos = interner.intern("pos");
    let tokens = kinds("#[%pos%,%i%;1;+]", &interner);
    let TokenKind::ArrayIndex { array, index } = &tokens[0] else {
        panic!("expected array index");
    };
    assert_eq!(*array, pos);
    assert_eq!(index.tokens().len(), 3);

    // Bare array names are accepted too
    let bare = kinds("#[pos,0]", &interner);
    assert!(matches!(&bare[0], TokenKind::ArrayIndex { array, .. } if *array == pos));
}

#[test]
fn test_negation_inside_index_does_not_close_region() {
    let interner = StringInterner::new();
    let tokens = kinds("#[a,2;[;3;+]", &interner);
    let TokenKind::ArrayIndex { index, .. } = &tokens[0] else {
        panic!("expected array index");
    };
    assert_eq!(index.tokens()[1].kind, TokenKind::Operator(Some(Op::Neg)));
}

// === Errors ===

#[test]
fn test_malformed_inputs() {
    let interner = StringInterner::new();
    assert!(matches!(
        lex_expr("%x", &interner),
        Err(LexError::MalformedVariable { .. })
    ));
    assert!(matches!(
        lex_expr("(,1)", &interner),
        Err(LexError::MalformedCall { .. })
    ));
    assert!(matches!(
        lex_expr("(f,1,)", &interner),
        Err(LexError::MalformedCall { .. })
    ));
    assert!(matches!(
        lex_expr("#[a]", &interner),
        Err(LexError::MalformedIndex { .. })
    ));
    assert!(matches!(
        lex_expr("(f,1", &interner),
        Err(LexError::UnterminatedCall { .. })
    ));
    assert!(matches!(
        lex_expr("\"open", &interner),
        Err(LexError::UnterminatedString { .. })
    ));
}

#[test]
fn test_lexer_stops_after_error() {
    let interner = StringInterner::new();
    let mut lexer = Lexer::new("1;%bad;2", &interner);
    assert!(matches!(lexer.next_token(), Some(Ok(_))));
    assert!(matches!(lexer.next_token(), Some(Err(_))));
    assert!(lexer.next_token().is_none());
}

#[test]
fn test_tokens_are_produced_lazily() {
    let interner = StringInterner::new();
    let mut lexer = Lexer::new("1;2;(f", &interner);
    // The unterminated call is only reported when it is reached
    assert!(matches!(lexer.next_token(), Some(Ok(_))));
    assert!(matches!(lexer.next_token(), Some(Ok(_))));
    assert!(matches!(
        lexer.next_token(),
        Some(Err(LexError::UnterminatedCall { .. }))
    ));
}

// === Property tests ===

mod proptest_numbers {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn finite_numbers_lex_to_themselves(n in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
            let interner = StringInterner::new();
            let spelling = n.to_string();
            let expr = lex_expr(&spelling, &interner).unwrap();
            prop_assert_eq!(expr.tokens().len(), 1);
            let TokenKind::Literal(literal) = &expr.tokens()[0].kind else {
                return Err(TestCaseError::fail("expected a literal"));
            };
            prop_assert_eq!(literal.to_value(), Value::Number(n));
        }

        #[test]
        fn joined_items_produce_one_token_each(items in proptest::collection::vec(0u32..1000, 1..20)) {
            let interner = StringInterner::new();
            let source = items.iter().map(u32::to_string).collect::<Vec<_>>().join(";");
            let expr = lex_expr(&source, &interner).unwrap();
            prop_assert_eq!(expr.tokens().len(), items.len());
        }
    }
}

// === Assignment targets ===

#[test]
fn test_lex_target_variable() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    assert_eq!(lex_target("%x%", &interner).unwrap(), Target::Variable(x));
    assert_eq!(lex_target("x", &interner).unwrap(), Target::Variable(x));
}

#[test]
fn test_lex_target_element() {
    let interner = StringInterner::new();
    let target = lex_target("#[%pos%,2]", &interner).unwrap();
    let Target::Element { array, index } = target else {
        panic!("expected element target");
    };
    assert_eq!(interner.lookup(array), "pos");
    assert_eq!(index.tokens()[0].kind, TokenKind::Literal(Literal::Number(2.0)));
}

#[test]
fn test_lex_target_rejects_expressions() {
    let interner = StringInterner::new();
    assert!(lex_target("%x%;1;+", &interner).is_err());
    assert!(lex_target("", &interner).is_err());
}

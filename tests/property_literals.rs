/// Property-based tests for literal rendering
///
/// These tests use proptest to generate arbitrary literal trees and verify
/// that rendering is deterministic, valid JSON, and reversible.

use bindery::Literal;
use proptest::prelude::*;

/// Strategy producing renderable literal trees (no opaque nodes, finite
/// floats only).
fn renderable_literal() -> impl Strategy<Value = Literal> {
    let leaf = prop_oneof![
        Just(Literal::Null),
        any::<bool>().prop_map(Literal::Bool),
        any::<i64>().prop_map(Literal::Int),
        // Finite values only; non-finite floats are unrenderable.
        (-1e9f64..1e9f64).prop_map(Literal::Float),
        "[a-zA-Z0-9 _\\-\\n\"\\\\]{0,12}".prop_map(Literal::Str),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Literal::Seq),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..4).prop_map(Literal::Map),
        ]
    })
}

proptest! {
    #[test]
    fn rendering_never_panics(literal in renderable_literal()) {
        prop_assert!(literal.render().is_ok());
    }
}

proptest! {
    #[test]
    fn rendering_is_deterministic(literal in renderable_literal()) {
        let first = literal.render().unwrap();
        let second = literal.render().unwrap();
        prop_assert_eq!(first, second);
    }
}

proptest! {
    #[test]
    fn rendered_text_parses_back(literal in renderable_literal()) {
        let text = literal.render().unwrap();
        let parsed = Literal::from_text(&text);
        prop_assert!(parsed.is_ok(), "failed to parse {:?}", text);
        prop_assert_eq!(parsed.unwrap(), literal);
    }
}

proptest! {
    #[test]
    fn rendered_text_is_valid_json(literal in renderable_literal()) {
        let text = literal.render().unwrap();
        let value: Result<serde_json::Value, _> = serde_json::from_str(&text);
        prop_assert!(value.is_ok(), "invalid JSON: {:?}", text);
    }
}

proptest! {
    #[test]
    fn integers_round_trip_exactly(n in any::<i64>()) {
        let text = Literal::Int(n).render().unwrap();
        prop_assert_eq!(text, n.to_string());
        prop_assert_eq!(Literal::from_text(&n.to_string()).unwrap(), Literal::Int(n));
    }
}

proptest! {
    #[test]
    fn string_escaping_round_trips(s in "\\PC{0,24}") {
        let literal = Literal::Str(s.clone());
        let text = literal.render().unwrap();
        prop_assert_eq!(Literal::from_text(&text).unwrap(), Literal::Str(s));
    }
}

proptest! {
    #[test]
    fn map_key_order_survives_the_round_trip(
        entries in prop::collection::vec(("[a-z]{1,8}", any::<i64>()), 0..6)
    ) {
        // Deduplicate keys while keeping first-seen order; duplicate keys
        // legitimately collapse during parsing.
        let mut seen = Vec::new();
        let mut unique = Vec::new();
        for (key, value) in entries {
            if !seen.contains(&key) {
                seen.push(key.clone());
                unique.push((key, Literal::Int(value)));
            }
        }

        let literal = Literal::Map(unique.clone());
        let text = literal.render().unwrap();
        match Literal::from_text(&text).unwrap() {
            Literal::Map(parsed) => prop_assert_eq!(parsed, unique),
            other => prop_assert!(false, "expected map, got {:?}", other),
        }
    }
}

use bindery::{ContainerError, Literal};

#[test]
fn test_scalar_rendering() {
    assert_eq!(Literal::Null.render().unwrap(), "null");
    assert_eq!(Literal::Bool(true).render().unwrap(), "true");
    assert_eq!(Literal::Bool(false).render().unwrap(), "false");
    assert_eq!(Literal::Int(-42).render().unwrap(), "-42");
    assert_eq!(Literal::Float(2.5).render().unwrap(), "2.5");
    assert_eq!(Literal::Str("hello".to_string()).render().unwrap(), "\"hello\"");
}

#[test]
fn test_sequence_rendering() {
    let seq = Literal::Seq(vec![
        Literal::Int(1),
        Literal::Str("a".to_string()),
        Literal::Null,
    ]);
    assert_eq!(seq.render().unwrap(), r#"[1,"a",null]"#);
}

#[test]
fn test_map_preserves_insertion_order() {
    let map = Literal::Map(vec![
        ("b".to_string(), Literal::Int(1)),
        ("a".to_string(), Literal::Int(2)),
    ]);
    // Insertion order wins over alphabetical order.
    assert_eq!(map.render().unwrap(), r#"{"b":1,"a":2}"#);
}

#[test]
fn test_nested_structures() {
    let value = Literal::Map(vec![
        (
            "servers".to_string(),
            Literal::Seq(vec![
                Literal::Str("alpha".to_string()),
                Literal::Str("beta".to_string()),
            ]),
        ),
        ("retries".to_string(), Literal::Int(3)),
        ("debug".to_string(), Literal::Bool(false)),
    ]);
    assert_eq!(
        value.render().unwrap(),
        r#"{"servers":["alpha","beta"],"retries":3,"debug":false}"#
    );
}

#[test]
fn test_string_escaping() {
    let text = Literal::Str("line\nquote\"back\\slash\ttab".to_string());
    assert_eq!(
        text.render().unwrap(),
        r#""line\nquote\"back\\slash\ttab""#
    );

    // Control characters render as unicode escapes.
    let control = Literal::Str("\u{0001}".to_string());
    assert_eq!(control.render().unwrap(), r#""\u0001""#);
}

#[test]
fn test_rendering_is_deterministic() {
    let value = Literal::Map(vec![
        ("z".to_string(), Literal::Seq(vec![Literal::Float(0.1), Literal::Null])),
        ("y".to_string(), Literal::Str("x".to_string())),
    ]);
    let first = value.render().unwrap();
    for _ in 0..10 {
        assert_eq!(value.render().unwrap(), first);
    }
}

#[test]
fn test_opaque_values_cannot_render() {
    let err = Literal::Opaque("FileHandle").render().unwrap_err();
    match err {
        ContainerError::UnrenderableLiteral(kind) => assert_eq!(kind, "FileHandle"),
        other => panic!("expected UnrenderableLiteral, got {:?}", other),
    }

    // An opaque value buried in a tree aborts the whole rendering.
    let nested = Literal::Seq(vec![Literal::Int(1), Literal::Opaque("Socket")]);
    assert!(matches!(
        nested.render(),
        Err(ContainerError::UnrenderableLiteral("Socket"))
    ));
}

#[test]
fn test_non_finite_floats_cannot_render() {
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = Literal::Float(bad).render().unwrap_err();
        assert!(matches!(err, ContainerError::UnrenderableLiteral(_)));
    }
}

#[test]
fn test_parse_round_trip() {
    let cases = [
        Literal::Null,
        Literal::Bool(true),
        Literal::Int(i64::MAX),
        Literal::Int(i64::MIN),
        Literal::Float(1e300),
        Literal::Str("snowman \u{2603}".to_string()),
        Literal::Seq(vec![Literal::Int(1), Literal::Str("a".to_string()), Literal::Null]),
        Literal::Map(vec![
            ("b".to_string(), Literal::Int(1)),
            ("a".to_string(), Literal::Int(2)),
        ]),
    ];

    for original in cases {
        let text = original.render().unwrap();
        let parsed = Literal::from_text(&text).unwrap();
        assert_eq!(parsed, original, "round trip failed for {}", text);
    }
}

#[test]
fn test_parse_keeps_document_key_order() {
    let parsed = Literal::from_text(r#"{"zeta":1,"alpha":2,"mid":3}"#).unwrap();
    match parsed {
        Literal::Map(entries) => {
            let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
            assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        }
        other => panic!("expected Map, got {:?}", other),
    }
}

#[test]
fn test_malformed_text_is_a_payload_error() {
    for bad in ["", "{", "[1,", "trueX", "'single'", "1e999"] {
        let err = Literal::from_text(bad).unwrap_err();
        assert!(
            matches!(err, ContainerError::Payload(_)),
            "input {:?} gave {:?}",
            bad,
            err
        );
    }
}

#[test]
fn test_from_conversions() {
    assert_eq!(Literal::from(true), Literal::Bool(true));
    assert_eq!(Literal::from(7i32), Literal::Int(7));
    assert_eq!(Literal::from(7i64), Literal::Int(7));
    assert_eq!(Literal::from(0.5f64), Literal::Float(0.5));
    assert_eq!(Literal::from("s"), Literal::Str("s".to_string()));
    assert_eq!(Literal::from(String::from("s")), Literal::Str("s".to_string()));
}

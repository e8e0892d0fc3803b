//! Literal values and their deterministic textual encoding.
//!
//! Literals carry default values in rendered signatures and field values in
//! persistence payloads. The textual form is JSON grammar: stable to render,
//! re-parseable with `serde_json`, and embeddable in generated source.

use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ContainerError, ContainerResult};

/// A renderable literal value.
///
/// Covers the JSON data model plus [`Opaque`](Literal::Opaque), a stand-in
/// for live values (connections, handles) that must never be rendered.
/// Mappings keep their entries in insertion order; rendering never resorts
/// keys.
///
/// # Examples
///
/// ```rust
/// use bindery::signature::Literal;
///
/// let value = Literal::Seq(vec![
///     Literal::Int(1),
///     Literal::from("a"),
///     Literal::Null,
/// ]);
/// assert_eq!(value.render()?, r#"[1,"a",null]"#);
/// assert_eq!(Literal::from_text(r#"[1,"a",null]"#)?, value);
/// # Ok::<(), bindery::ContainerError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Absent value; renders as `null`.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point; only finite values render.
    Float(f64),
    /// String; rendered with full JSON escaping.
    Str(String),
    /// Ordered sequence.
    Seq(Vec<Literal>),
    /// Key-value mapping; entries render in insertion order.
    Map(Vec<(String, Literal)>),
    /// Live value stand-in naming its kind; never renderable.
    Opaque(&'static str),
}

impl Literal {
    /// Renders the literal as JSON text.
    ///
    /// The output is deterministic: the same literal always renders to
    /// byte-identical text, and re-parsing with [`from_text`](Literal::from_text)
    /// reconstructs an equal value. Non-finite floats and
    /// [`Opaque`](Literal::Opaque) values fail with
    /// [`ContainerError::UnrenderableLiteral`] instead of emitting corrupt
    /// text.
    pub fn render(&self) -> ContainerResult<String> {
        let mut out = String::new();
        self.render_into(&mut out)?;
        Ok(out)
    }

    fn render_into(&self, out: &mut String) -> ContainerResult<()> {
        match self {
            Literal::Null => out.push_str("null"),
            Literal::Bool(true) => out.push_str("true"),
            Literal::Bool(false) => out.push_str("false"),
            Literal::Int(value) => out.push_str(&value.to_string()),
            Literal::Float(value) => {
                if !value.is_finite() {
                    return Err(ContainerError::UnrenderableLiteral("non-finite float"));
                }
                // {:?} prints the shortest text that round-trips to the
                // same f64, and it is valid JSON for finite values.
                out.push_str(&format!("{:?}", value));
            }
            Literal::Str(value) => escape_into(value, out),
            Literal::Seq(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.render_into(out)?;
                }
                out.push(']');
            }
            Literal::Map(entries) => {
                out.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    escape_into(key, out);
                    out.push(':');
                    value.render_into(out)?;
                }
                out.push('}');
            }
            Literal::Opaque(kind) => {
                return Err(ContainerError::UnrenderableLiteral(kind));
            }
        }
        Ok(())
    }

    /// Parses JSON text back into a literal.
    ///
    /// Mapping entries keep the document's key order. Malformed text fails
    /// with [`ContainerError::Payload`].
    pub fn from_text(text: &str) -> ContainerResult<Literal> {
        serde_json::from_str(text).map_err(|err| ContainerError::Payload(err.to_string()))
    }
}

/// JSON string escaping: quotes, backslashes, and all control characters.
fn escape_into(value: &str, out: &mut String) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(value as i64)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Str(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Str(value)
    }
}

impl Serialize for Literal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Literal::Null => serializer.serialize_unit(),
            Literal::Bool(value) => serializer.serialize_bool(*value),
            Literal::Int(value) => serializer.serialize_i64(*value),
            Literal::Float(value) => serializer.serialize_f64(*value),
            Literal::Str(value) => serializer.serialize_str(value),
            Literal::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Literal::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Literal::Opaque(kind) => Err(serde::ser::Error::custom(format!(
                "cannot serialize opaque literal: {}",
                kind
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Literal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LiteralVisitor;

        impl<'de> Visitor<'de> for LiteralVisitor {
            type Value = Literal;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a JSON-compatible literal")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Literal::Null)
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Literal::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Literal::Int(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                i64::try_from(value)
                    .map(Literal::Int)
                    .map_err(|_| E::custom("integer literal out of range"))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                // serde_json saturates overflowing literals like 1e999 to
                // infinity; a parsed literal must stay renderable.
                if !value.is_finite() {
                    return Err(E::custom("non-finite number literal"));
                }
                Ok(Literal::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Literal::Str(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Literal::Str(value))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(Literal::Seq(items))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, Literal>()? {
                    entries.push((key, value));
                }
                Ok(Literal::Map(entries))
            }
        }

        deserializer.deserialize_any(LiteralVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(literal: Literal) {
        let text = literal.render().unwrap();
        assert_eq!(Literal::from_text(&text).unwrap(), literal);
    }

    #[test]
    fn scalars_round_trip() {
        round_trip(Literal::Null);
        round_trip(Literal::Bool(true));
        round_trip(Literal::Bool(false));
        round_trip(Literal::Int(0));
        round_trip(Literal::Int(-17));
        round_trip(Literal::Int(i64::MAX));
        round_trip(Literal::Float(0.5));
        round_trip(Literal::Float(-2.25));
        round_trip(Literal::Float(1e300));
    }

    #[test]
    fn strings_escape_fully() {
        let tricky = Literal::Str("say \"hi\"\\\npath\tend\u{1}".to_string());
        let text = tricky.render().unwrap();
        assert_eq!(text, "\"say \\\"hi\\\"\\\\\\npath\\tend\\u0001\"");
        assert_eq!(Literal::from_text(&text).unwrap(), tricky);
    }

    #[test]
    fn sequence_renders_in_order() {
        let seq = Literal::Seq(vec![Literal::Int(1), Literal::from("a"), Literal::Null]);
        assert_eq!(seq.render().unwrap(), r#"[1,"a",null]"#);
    }

    #[test]
    fn map_keeps_insertion_order() {
        let map = Literal::Map(vec![
            ("b".to_string(), Literal::Int(1)),
            ("a".to_string(), Literal::Int(2)),
        ]);
        let text = map.render().unwrap();
        assert_eq!(text, r#"{"b":1,"a":2}"#);

        // Parsing keeps the document order, so the round trip is exact.
        assert_eq!(Literal::from_text(&text).unwrap(), map);
    }

    #[test]
    fn rendering_is_deterministic() {
        let value = Literal::Map(vec![
            ("ids".to_string(), Literal::Seq(vec![Literal::Int(3), Literal::Int(1)])),
            ("label".to_string(), Literal::from("z")),
        ]);
        assert_eq!(value.render().unwrap(), value.render().unwrap());
    }

    #[test]
    fn opaque_is_unrenderable() {
        let err = Literal::Opaque("connection handle").render().unwrap_err();
        match err {
            ContainerError::UnrenderableLiteral(kind) => {
                assert_eq!(kind, "connection handle");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn non_finite_floats_are_unrenderable() {
        assert!(Literal::Float(f64::NAN).render().is_err());
        assert!(Literal::Float(f64::INFINITY).render().is_err());
        assert!(Literal::Float(f64::NEG_INFINITY).render().is_err());
    }

    #[test]
    fn nested_opaque_aborts_rendering() {
        let nested = Literal::Seq(vec![Literal::Int(1), Literal::Opaque("socket")]);
        assert!(matches!(
            nested.render(),
            Err(ContainerError::UnrenderableLiteral("socket"))
        ));
    }

    #[test]
    fn malformed_text_is_a_payload_error() {
        assert!(matches!(
            Literal::from_text("{\"open\":"),
            Err(ContainerError::Payload(_))
        ));
    }

    #[test]
    fn overflowing_float_text_is_rejected() {
        // 1e999 saturates to infinity during parsing and could never
        // render back.
        assert!(matches!(
            Literal::from_text("1e999"),
            Err(ContainerError::Payload(_))
        ));
    }
}

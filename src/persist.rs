//! Selective-field persistence for scoped instances.
//!
//! Application-scoped instances sometimes need to survive a lifecycle
//! boundary (process restart, cross-request continuity) without dragging
//! along transient state like open connections or caches. This module
//! provides that contract: a type declares exactly which fields are
//! eligible for persistence, and the [`SerializationAdapter`] captures
//! those fields into an ordered [`Payload`] handed to an external
//! [`PayloadStore`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{BoxError, ContainerError, ContainerResult};
use crate::signature::Literal;

/// Persistence contract for a scoped instance.
///
/// A type either declares a field selection
/// ([`selected_fields`](Persist::selected_fields) plus
/// [`capture_field`](Persist::capture_field) /
/// [`restore_field`](Persist::restore_field)) or supplies a full custom
/// serialize/deserialize pair that bypasses field selection entirely. When
/// the custom pair is supplied it always wins.
///
/// # Examples
///
/// ```rust
/// use bindery::persist::{Persist, SerializationAdapter};
/// use bindery::signature::Literal;
///
/// #[derive(Default)]
/// struct Profile {
///     name: String,
///     visits: i64,
///     // Never persisted: rebuilt from the name on restore.
///     greeting_cache: Option<String>,
/// }
///
/// impl Persist for Profile {
///     fn selected_fields(&self) -> &'static [&'static str] {
///         &["name", "visits"]
///     }
///
///     fn capture_field(&self, field: &str) -> Option<Literal> {
///         match field {
///             "name" => Some(Literal::from(self.name.clone())),
///             "visits" => Some(Literal::Int(self.visits)),
///             _ => None,
///         }
///     }
///
///     fn restore_field(&mut self, field: &str, value: &Literal) {
///         match (field, value) {
///             ("name", Literal::Str(name)) => self.name = name.clone(),
///             ("visits", Literal::Int(visits)) => self.visits = *visits,
///             _ => {}
///         }
///     }
/// }
///
/// let adapter = SerializationAdapter::new();
/// let profile = Profile {
///     name: "ada".to_string(),
///     visits: 3,
///     greeting_cache: Some("hello ada".to_string()),
/// };
///
/// let payload = adapter.serialize(&profile)?;
/// assert!(payload.get("greeting_cache").is_none());
///
/// let mut restored = Profile::default();
/// let drift = adapter.deserialize(&payload, &mut restored)?;
/// assert!(drift.is_clean());
/// assert_eq!(restored.name, "ada");
/// assert_eq!(restored.visits, 3);
/// assert_eq!(restored.greeting_cache, None);
/// # Ok::<(), bindery::ContainerError>(())
/// ```
pub trait Persist {
    /// Names of the fields eligible for persistence.
    ///
    /// Fields outside this list are never captured and never restored.
    fn selected_fields(&self) -> &'static [&'static str];

    /// Captures the named field's current value.
    ///
    /// Returning `None` omits the field from the payload entirely; it is
    /// not encoded as null.
    fn capture_field(&self, field: &str) -> Option<Literal>;

    /// Restores the named field from a payload value.
    ///
    /// Called only for selected fields present in the payload. Fields
    /// absent from the payload keep the target's current value.
    fn restore_field(&mut self, field: &str, value: &Literal);

    /// Full custom serialization, bypassing field selection.
    ///
    /// Return `Some` to take over the whole encode step.
    fn custom_serialize(&self) -> Option<ContainerResult<Payload>> {
        None
    }

    /// Full custom deserialization, bypassing field selection.
    ///
    /// Return `Some` to take over the whole decode step. An error aborts
    /// only this call; the live instance is whatever the decoder left it.
    fn custom_deserialize(&mut self, payload: &Payload) -> Option<ContainerResult<()>> {
        let _ = payload;
        None
    }
}

/// Ordered field-to-literal mapping emitted by serialization.
///
/// Entries keep their insertion order through encoding, text rendering, and
/// parsing, so payload text is deterministic for a given capture sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Payload {
    entries: Vec<(String, Literal)>,
}

impl Payload {
    /// An empty payload.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Sets a field value, replacing in place when the field already
    /// exists.
    pub fn insert(&mut self, field: impl Into<String>, value: Literal) {
        let field = field.into();
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == field) {
            entry.1 = value;
        } else {
            self.entries.push((field, value));
        }
    }

    /// Looks up a field value.
    pub fn get(&self, field: &str) -> Option<&Literal> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// True when the field is present.
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Literal)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no fields are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the payload as JSON text, fields in insertion order.
    pub fn to_text(&self) -> ContainerResult<String> {
        Literal::Map(self.entries.clone()).render()
    }

    /// Parses payload text produced by [`to_text`](Payload::to_text).
    ///
    /// The text must be a JSON mapping; anything else fails with
    /// [`ContainerError::Payload`].
    pub fn from_text(text: &str) -> ContainerResult<Payload> {
        match Literal::from_text(text)? {
            Literal::Map(entries) => Ok(Payload { entries }),
            _ => Err(ContainerError::Payload(
                "payload text must be a mapping".to_string(),
            )),
        }
    }
}

impl Serialize for Payload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PayloadVisitor;

        impl<'de> Visitor<'de> for PayloadVisitor {
            type Value = Payload;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a field-to-literal mapping")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some((field, value)) = map.next_entry::<String, Literal>()? {
                    entries.push((field, value));
                }
                Ok(Payload { entries })
            }
        }

        deserializer.deserialize_map(PayloadVisitor)
    }
}

/// Non-fatal report of unknown payload fields dropped during restore.
///
/// Schema drift favors compatibility: an unknown field in the payload is
/// ignored rather than failing the restore, and this report says what was
/// skipped so callers can log it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDrift {
    ignored: Vec<String>,
}

impl SchemaDrift {
    /// True when every payload field was recognized.
    pub fn is_clean(&self) -> bool {
        self.ignored.is_empty()
    }

    /// The unknown fields that were dropped, in payload order.
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }

    fn note(&mut self, field: &str) {
        self.ignored.push(field.to_string());
    }
}

impl fmt::Display for SchemaDrift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ignored.is_empty() {
            write!(f, "no schema drift")
        } else {
            write!(f, "ignored unknown fields: {}", self.ignored.join(", "))
        }
    }
}

/// Captures and restores [`Persist`] instances through [`Payload`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerializationAdapter;

impl SerializationAdapter {
    /// Creates an adapter.
    pub fn new() -> Self {
        Self
    }

    /// Captures the instance into a payload.
    ///
    /// Uses the custom encoder when the type supplies one; otherwise emits
    /// only the selected fields that capture to a value.
    pub fn serialize<T: Persist>(&self, instance: &T) -> ContainerResult<Payload> {
        if let Some(custom) = instance.custom_serialize() {
            return custom;
        }
        let mut payload = Payload::new();
        for field in instance.selected_fields() {
            if let Some(value) = instance.capture_field(field) {
                payload.insert(*field, value);
            }
        }
        Ok(payload)
    }

    /// Restores selected fields from the payload into the target.
    ///
    /// Uses the custom decoder when the type supplies one (its error aborts
    /// only this call and never invalidates the live instance beyond what
    /// the decoder itself did). Otherwise restores each selected field
    /// present in the payload; unknown payload fields are dropped silently
    /// and reported in the returned [`SchemaDrift`]; absent fields keep the
    /// target's current values.
    pub fn deserialize<T: Persist>(
        &self,
        payload: &Payload,
        target: &mut T,
    ) -> ContainerResult<SchemaDrift> {
        if let Some(custom) = target.custom_deserialize(payload) {
            custom?;
            return Ok(SchemaDrift::default());
        }
        let mut drift = SchemaDrift::default();
        let selected = target.selected_fields();
        for (field, value) in payload.iter() {
            if selected.iter().any(|name| *name == field) {
                target.restore_field(field, value);
            } else {
                drift.note(field);
            }
        }
        Ok(drift)
    }
}

/// External persistence boundary.
///
/// The adapter produces payloads; a store owns durability, retry, and
/// expiry. Keys are caller-supplied scope or session identifiers, typically
/// a [`ContextId`](crate::ContextId)'s string form.
pub trait PayloadStore: Send + Sync {
    /// Persists a payload under the given key, replacing any prior value.
    fn save(&self, key: &str, payload: &Payload) -> Result<(), BoxError>;

    /// Loads the payload stored under the key, if any.
    fn load(&self, key: &str) -> Result<Option<Payload>, BoxError>;

    /// Removes the payload stored under the key.
    fn remove(&self, key: &str) -> Result<(), BoxError>;
}

/// In-memory [`PayloadStore`] used by tests and demos.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Payload>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored payloads.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl PayloadStore for MemoryStore {
    fn save(&self, key: &str, payload: &Payload) -> Result<(), BoxError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), payload.clone());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Payload>, BoxError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), BoxError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        label: String,
        count: i64,
        scratch: Vec<u8>,
    }

    impl Persist for Counter {
        fn selected_fields(&self) -> &'static [&'static str] {
            &["label", "count"]
        }

        fn capture_field(&self, field: &str) -> Option<Literal> {
            match field {
                "label" => Some(Literal::from(self.label.clone())),
                "count" => Some(Literal::Int(self.count)),
                _ => None,
            }
        }

        fn restore_field(&mut self, field: &str, value: &Literal) {
            match (field, value) {
                ("label", Literal::Str(label)) => self.label = label.clone(),
                ("count", Literal::Int(count)) => self.count = *count,
                _ => {}
            }
        }
    }

    struct Custom {
        blob: String,
    }

    impl Persist for Custom {
        fn selected_fields(&self) -> &'static [&'static str] {
            &["never used"]
        }

        fn capture_field(&self, _field: &str) -> Option<Literal> {
            panic!("custom pair must bypass field selection");
        }

        fn restore_field(&mut self, _field: &str, _value: &Literal) {
            panic!("custom pair must bypass field selection");
        }

        fn custom_serialize(&self) -> Option<ContainerResult<Payload>> {
            let mut payload = Payload::new();
            payload.insert("blob", Literal::from(self.blob.clone()));
            Some(Ok(payload))
        }

        fn custom_deserialize(&mut self, payload: &Payload) -> Option<ContainerResult<()>> {
            Some(match payload.get("blob") {
                Some(Literal::Str(blob)) => {
                    self.blob = blob.clone();
                    Ok(())
                }
                _ => Err(ContainerError::Payload("missing blob".to_string())),
            })
        }
    }

    #[test]
    fn serialize_emits_only_selected_fields() {
        let counter = Counter {
            label: "hits".to_string(),
            count: 4,
            scratch: vec![1, 2, 3],
        };
        let payload = SerializationAdapter::new().serialize(&counter).unwrap();

        assert_eq!(payload.len(), 2);
        assert_eq!(payload.get("label"), Some(&Literal::from("hits")));
        assert_eq!(payload.get("count"), Some(&Literal::Int(4)));
        assert!(!payload.contains("scratch"));
    }

    #[test]
    fn deserialize_restores_selected_fields_exactly() {
        let adapter = SerializationAdapter::new();
        let source = Counter {
            label: "hits".to_string(),
            count: 4,
            scratch: vec![9],
        };
        let payload = adapter.serialize(&source).unwrap();

        let mut restored = Counter::default();
        let drift = adapter.deserialize(&payload, &mut restored).unwrap();

        assert!(drift.is_clean());
        assert_eq!(restored.label, "hits");
        assert_eq!(restored.count, 4);
        assert!(restored.scratch.is_empty());
    }

    #[test]
    fn unknown_payload_fields_drop_silently() {
        let adapter = SerializationAdapter::new();
        let mut payload = Payload::new();
        payload.insert("count", Literal::Int(7));
        payload.insert("retired_field", Literal::from("old"));

        let mut target = Counter::default();
        let drift = adapter.deserialize(&payload, &mut target).unwrap();

        assert_eq!(target.count, 7);
        assert_eq!(drift.ignored(), ["retired_field".to_string()]);
        assert_eq!(drift.to_string(), "ignored unknown fields: retired_field");
    }

    #[test]
    fn absent_fields_keep_target_defaults() {
        let adapter = SerializationAdapter::new();
        let mut payload = Payload::new();
        payload.insert("label", Literal::from("only label"));

        let mut target = Counter::default();
        adapter.deserialize(&payload, &mut target).unwrap();

        assert_eq!(target.label, "only label");
        assert_eq!(target.count, 0);
    }

    #[test]
    fn custom_pair_bypasses_field_selection() {
        let adapter = SerializationAdapter::new();
        let custom = Custom { blob: "opaque state".to_string() };
        let payload = adapter.serialize(&custom).unwrap();
        assert_eq!(payload.get("blob"), Some(&Literal::from("opaque state")));

        let mut restored = Custom { blob: String::new() };
        let drift = adapter.deserialize(&payload, &mut restored).unwrap();
        assert!(drift.is_clean());
        assert_eq!(restored.blob, "opaque state");
    }

    #[test]
    fn custom_decoder_error_aborts_only_the_call() {
        let adapter = SerializationAdapter::new();
        let mut restored = Custom { blob: "untouched".to_string() };
        let err = adapter
            .deserialize(&Payload::new(), &mut restored)
            .unwrap_err();

        assert!(matches!(err, ContainerError::Payload(_)));
        assert_eq!(restored.blob, "untouched");
    }

    #[test]
    fn payload_text_round_trips_in_order() {
        let mut payload = Payload::new();
        payload.insert("b", Literal::Int(1));
        payload.insert("a", Literal::Int(2));

        let text = payload.to_text().unwrap();
        assert_eq!(text, r#"{"b":1,"a":2}"#);
        assert_eq!(Payload::from_text(&text).unwrap(), payload);
    }

    #[test]
    fn memory_store_saves_and_loads() {
        let store = MemoryStore::new();
        let mut payload = Payload::new();
        payload.insert("count", Literal::Int(1));

        store.save("session-9", &payload).unwrap();
        assert_eq!(store.load("session-9").unwrap(), Some(payload));
        assert_eq!(store.load("session-other").unwrap(), None);

        store.remove("session-9").unwrap();
        assert!(store.is_empty());
    }
}

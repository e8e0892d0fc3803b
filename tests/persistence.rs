use bindery::{
    ContainerBuilder, ContextId, Literal, MemoryStore, Payload, PayloadStore, Persist, Resolver,
    Scope, SerializationAdapter,
};
use std::sync::{Arc, Mutex};

/// Per-context shopping cart whose contents survive context eviction.
#[derive(Default)]
struct Cart {
    items: Mutex<Vec<String>>,
    discount: Mutex<i64>,
}

impl Cart {
    fn add(&self, item: &str) {
        self.items.lock().unwrap().push(item.to_string());
    }

    fn items(&self) -> Vec<String> {
        self.items.lock().unwrap().clone()
    }
}

impl Persist for Cart {
    fn selected_fields(&self) -> &'static [&'static str] {
        &["items", "discount"]
    }

    fn capture_field(&self, field: &str) -> Option<Literal> {
        match field {
            "items" => Some(Literal::Seq(
                self.items().into_iter().map(Literal::Str).collect(),
            )),
            "discount" => Some(Literal::Int(*self.discount.lock().unwrap())),
            _ => None,
        }
    }

    fn restore_field(&mut self, field: &str, value: &Literal) {
        match (field, value) {
            ("items", Literal::Seq(values)) => {
                let mut items = self.items.lock().unwrap();
                items.clear();
                for value in values {
                    if let Literal::Str(item) = value {
                        items.push(item.clone());
                    }
                }
            }
            ("discount", Literal::Int(percent)) => *self.discount.lock().unwrap() = *percent,
            _ => {}
        }
    }
}

#[test]
fn test_selected_fields_round_trip() {
    let adapter = SerializationAdapter::new();

    let cart = Cart::default();
    cart.add("keyboard");
    cart.add("mouse");
    *cart.discount.lock().unwrap() = 10;

    let payload = adapter.serialize(&cart).unwrap();
    assert_eq!(payload.len(), 2);

    let mut restored = Cart::default();
    let drift = adapter.deserialize(&payload, &mut restored).unwrap();

    assert!(drift.is_clean());
    assert_eq!(restored.items(), vec!["keyboard", "mouse"]);
    assert_eq!(*restored.discount.lock().unwrap(), 10);
}

#[test]
fn test_unknown_payload_fields_drop_silently() {
    let adapter = SerializationAdapter::new();

    let mut payload = Payload::new();
    payload.insert("items", Literal::Seq(vec![Literal::Str("pen".to_string())]));
    // Fields from a newer schema revision.
    payload.insert("loyalty_tier", Literal::Str("gold".to_string()));
    payload.insert("gift_wrap", Literal::Bool(true));

    let mut cart = Cart::default();
    let drift = adapter.deserialize(&payload, &mut cart).unwrap();

    // The known field restored; the unknown ones were reported, not fatal.
    assert_eq!(cart.items(), vec!["pen"]);
    assert!(!drift.is_clean());
    assert_eq!(drift.ignored(), ["loyalty_tier", "gift_wrap"]);
    assert_eq!(
        drift.to_string(),
        "ignored unknown fields: loyalty_tier, gift_wrap"
    );
}

#[test]
fn test_absent_fields_keep_current_values() {
    let adapter = SerializationAdapter::new();

    let mut cart = Cart::default();
    *cart.discount.lock().unwrap() = 25;

    // Payload only mentions items.
    let mut payload = Payload::new();
    payload.insert("items", Literal::Seq(vec![]));

    adapter.deserialize(&payload, &mut cart).unwrap();
    assert_eq!(*cart.discount.lock().unwrap(), 25);
}

#[test]
fn test_payload_text_round_trip_through_a_store() {
    let adapter = SerializationAdapter::new();
    let store = MemoryStore::new();

    let cart = Cart::default();
    cart.add("monitor");
    *cart.discount.lock().unwrap() = 5;

    let payload = adapter.serialize(&cart).unwrap();
    store.save("visitor-7", &payload).unwrap();

    let loaded = store.load("visitor-7").unwrap().expect("payload missing");
    assert_eq!(loaded, payload);
    assert!(store.load("visitor-8").unwrap().is_none());

    store.remove("visitor-7").unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_payload_text_form_is_ordered_json() {
    let mut payload = Payload::new();
    payload.insert("items", Literal::Seq(vec![Literal::Str("pen".to_string())]));
    payload.insert("discount", Literal::Int(10));

    let text = payload.to_text().unwrap();
    assert_eq!(text, r#"{"items":["pen"],"discount":10}"#);

    let parsed = Payload::from_text(&text).unwrap();
    assert_eq!(parsed, payload);
}

#[test]
fn test_scoped_state_survives_context_eviction() {
    let mut builder = ContainerBuilder::new();
    builder
        .bind::<Cart>()
        .scoped(Scope::Application)
        .to_provider(|_| Ok(Arc::new(Cart::default())))
        .register()
        .unwrap();

    let container = builder.build().unwrap();
    let adapter = SerializationAdapter::new();
    let store = MemoryStore::new();

    // A request fills its cart, then its context ends.
    {
        let ctx = container.context("visitor-7");
        let cart = ctx.get::<Cart>().unwrap();
        cart.add("keyboard");
        cart.add("monitor");

        let payload = adapter.serialize(cart.as_ref()).unwrap();
        store.save(ctx.id().as_str(), &payload).unwrap();
    }
    container.reset_scope(&ContextId::new("visitor-7"));

    // The visitor returns: a fresh context starts empty, then restores.
    let ctx = container.context("visitor-7");
    let cart = ctx.get::<Cart>().unwrap();
    assert!(cart.items().is_empty());

    let payload = store.load(ctx.id().as_str()).unwrap().expect("nothing saved");
    let mut rehydrated = Cart::default();
    adapter.deserialize(&payload, &mut rehydrated).unwrap();

    assert_eq!(rehydrated.items(), vec!["keyboard", "monitor"]);
}

#[test]
fn test_custom_codec_takes_precedence() {
    struct Blob {
        bytes: Vec<u8>,
    }

    impl Persist for Blob {
        fn selected_fields(&self) -> &'static [&'static str] {
            &["bytes"]
        }

        fn capture_field(&self, _field: &str) -> Option<Literal> {
            panic!("field capture must not run when a custom encoder exists");
        }

        fn restore_field(&mut self, _field: &str, _value: &Literal) {
            panic!("field restore must not run when a custom decoder exists");
        }

        fn custom_serialize(&self) -> Option<bindery::ContainerResult<Payload>> {
            let mut payload = Payload::new();
            let encoded = self.bytes.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(",");
            payload.insert("encoded", Literal::Str(encoded));
            Some(Ok(payload))
        }

        fn custom_deserialize(
            &mut self,
            payload: &Payload,
        ) -> Option<bindery::ContainerResult<()>> {
            let encoded = match payload.get("encoded") {
                Some(Literal::Str(text)) => text,
                _ => return Some(Err(bindery::ContainerError::Payload(
                    "missing encoded field".to_string(),
                ))),
            };
            self.bytes = encoded
                .split(',')
                .filter(|part| !part.is_empty())
                .filter_map(|part| part.parse().ok())
                .collect();
            Some(Ok(()))
        }
    }

    let adapter = SerializationAdapter::new();
    let blob = Blob { bytes: vec![1, 2, 250] };

    let payload = adapter.serialize(&blob).unwrap();
    assert_eq!(payload.get("encoded"), Some(&Literal::Str("1,2,250".to_string())));

    let mut restored = Blob { bytes: Vec::new() };
    let drift = adapter.deserialize(&payload, &mut restored).unwrap();
    assert!(drift.is_clean());
    assert_eq!(restored.bytes, vec![1, 2, 250]);

    // A custom decoder error aborts the call without touching field dispatch.
    let empty = Payload::new();
    assert!(adapter.deserialize(&empty, &mut restored).is_err());
}

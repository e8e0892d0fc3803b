#![no_main]

use libfuzzer_sys::fuzz_target;
use bindery::{Literal, Payload, Persist, SerializationAdapter};

#[derive(Default)]
struct Probe {
    alpha: i64,
    beta: String,
}

impl Persist for Probe {
    fn selected_fields(&self) -> &'static [&'static str] {
        &["alpha", "beta"]
    }

    fn capture_field(&self, field: &str) -> Option<Literal> {
        match field {
            "alpha" => Some(Literal::Int(self.alpha)),
            "beta" => Some(Literal::Str(self.beta.clone())),
            _ => None,
        }
    }

    fn restore_field(&mut self, field: &str, value: &Literal) {
        match (field, value) {
            ("alpha", Literal::Int(v)) => self.alpha = *v,
            ("beta", Literal::Str(v)) => self.beta = v.clone(),
            _ => {}
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Arbitrary text must never panic the payload parser.
    let Ok(payload) = Payload::from_text(text) else {
        return;
    };

    // Parsed payloads round-trip through their text form.
    let rendered = payload.to_text().expect("parsed payloads are renderable");
    let reparsed = Payload::from_text(&rendered).expect("rendered payload is parseable");
    assert_eq!(reparsed, payload);

    // Restoring from a hostile payload must never panic, whatever keys it
    // carries; unknown fields are reported, not fatal.
    let adapter = SerializationAdapter::new();
    let mut probe = Probe::default();
    let drift = adapter.deserialize(&payload, &mut probe).expect("field dispatch is total");
    assert_eq!(
        drift.is_clean(),
        payload.iter().all(|(field, _)| field == "alpha" || field == "beta"),
    );
});

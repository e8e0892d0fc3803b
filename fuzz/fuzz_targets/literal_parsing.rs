#![no_main]

use libfuzzer_sys::fuzz_target;
use bindery::Literal;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing arbitrary text must never panic; it either yields a literal
    // or a payload error.
    let Ok(literal) = Literal::from_text(text) else {
        return;
    };

    // Anything that parsed must render, and the rendering must parse back
    // to the same value.
    let rendered = literal.render().expect("parsed literals are renderable");
    let reparsed = Literal::from_text(&rendered).expect("rendered text is parseable");
    assert_eq!(reparsed, literal);

    // Rendering is stable across calls.
    assert_eq!(literal.render().unwrap(), rendered);
});

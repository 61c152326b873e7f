use contentful_dispatch::{DecodeContext, Registry, Resolution, Source};
use contentful_types::{Error, Result};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

#[derive(Debug, PartialEq)]
enum Shape {
    Circle(u64),
    Square(u64),
}

fn circle(value: &Value, _ctx: DecodeContext) -> Result<Shape> {
    value
        .as_u64()
        .map(Shape::Circle)
        .ok_or_else(|| Error::MalformedValidator("radius".into()))
}

fn square(value: &Value, _ctx: DecodeContext) -> Result<Shape> {
    value
        .as_u64()
        .map(Shape::Square)
        .ok_or_else(|| Error::MalformedValidator("side".into()))
}

fn square_from_settings(value: &Value, _ctx: DecodeContext) -> Result<Shape> {
    Ok(Shape::Square(value["side"].as_u64().unwrap_or(0)))
}

fn shapes() -> Registry<Shape> {
    Registry::builder("shape")
        .register("circle", circle)
        .register("square", square)
        .build()
}

fn object(value: &Value) -> &serde_json::Map<String, Value> {
    value.as_object().expect("test fixture is an object")
}

// ── Construction ─────────────────────────────────────────────────

#[test]
fn registration_order_is_kept() {
    let reg = shapes();
    assert_eq!(reg.discriminators().collect::<Vec<_>>(), vec!["circle", "square"]);
    assert_eq!(reg.len(), 2);
    assert!(!reg.is_empty());
    assert_eq!(reg.site(), "shape");
}

#[test]
fn re_registration_replaces_in_place() {
    let reg = Registry::builder("shape")
        .register("circle", circle)
        .register("square", square)
        .register("circle", square)
        .build();
    assert_eq!(reg.discriminators().collect::<Vec<_>>(), vec!["circle", "square"]);
    let decode = reg.get("circle").unwrap();
    assert_eq!(decode(&json!(3), DecodeContext::default()).unwrap(), Shape::Square(3));
}

#[test]
fn lookup_of_missing_key() {
    let reg = shapes();
    assert!(reg.get("triangle").is_none());
    assert!(!reg.contains("triangle"));
    assert!(reg.contains("circle"));
}

// ── Key-presence dispatch ────────────────────────────────────────

#[test]
fn single_registered_key_matches() {
    let reg = shapes();
    let node = json!({"circle": 4});
    match reg.resolve(Source::KeyPresence(object(&node))) {
        Resolution::Matched {
            discriminator,
            decode,
            payload,
            unregistered,
        } => {
            assert_eq!(discriminator, "circle");
            assert!(unregistered.is_empty());
            assert_eq!(decode(payload, DecodeContext::default()).unwrap(), Shape::Circle(4));
        }
        other => panic!("expected match, got {other:?}"),
    }
}

#[test]
fn unregistered_siblings_are_reported() {
    let reg = shapes();
    let node = json!({"label": "x", "square": 2, "colour": "red"});
    match reg.resolve(Source::KeyPresence(object(&node))) {
        Resolution::Matched { unregistered, .. } => {
            assert_eq!(unregistered, vec!["label", "colour"]);
        }
        other => panic!("expected match, got {other:?}"),
    }
}

#[test]
fn two_registered_keys_are_ambiguous() {
    let reg = shapes();
    let node = json!({"circle": 1, "square": 2});
    match reg.resolve(Source::KeyPresence(object(&node))) {
        Resolution::Ambiguous { discriminators } => {
            assert_eq!(discriminators, vec!["circle", "square"]);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
}

#[test]
fn no_registered_key_is_unmatched() {
    let reg = shapes();
    let node = json!({"triangle": 3});
    match reg.resolve(Source::KeyPresence(object(&node))) {
        Resolution::Unmatched { discriminator } => assert_eq!(discriminator, Some("triangle")),
        other => panic!("expected no match, got {other:?}"),
    }
}

#[test]
fn empty_object_is_unmatched_without_candidate() {
    let reg = shapes();
    let node = json!({});
    assert!(matches!(
        reg.resolve(Source::KeyPresence(object(&node))),
        Resolution::Unmatched { discriminator: None }
    ));
}

// ── Field dispatch ───────────────────────────────────────────────

#[test]
fn field_source_passes_whole_payload() {
    let reg = Registry::builder("widget")
        .register("square", square_from_settings)
        .build();
    let payload = json!({"side": 9});
    match reg.resolve(Source::Field {
        value: "square",
        payload: &payload,
    }) {
        Resolution::Matched { decode, payload, .. } => {
            assert_eq!(decode(payload, DecodeContext::default()).unwrap(), Shape::Square(9));
        }
        other => panic!("expected match, got {other:?}"),
    }
}

#[test]
fn unknown_field_value_is_unmatched() {
    let reg = shapes();
    let payload = json!({});
    assert!(matches!(
        reg.resolve(Source::Field {
            value: "hexagon",
            payload: &payload,
        }),
        Resolution::Unmatched {
            discriminator: Some("hexagon")
        }
    ));
}

// ── Diagnostics ──────────────────────────────────────────────────

#[test]
fn unknown_error_names_site_and_key() {
    let err = shapes().unknown(Some("triangle"));
    match err {
        Error::UnknownDiscriminator { site, discriminator } => {
            assert_eq!(site, "shape");
            assert_eq!(discriminator, "triangle");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn registry_debug_lists_keys() {
    let text = format!("{:?}", shapes());
    assert!(text.contains("circle"));
    assert!(text.contains("square"));
}

#[test]
fn registry_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Registry<Shape>>();
}

//! Property tests for the invariants that hold over all inputs:
//! id namespacing, alignment repair, sanitizer idempotence, fill mapping.

use pd_core::change::EditorFill;
use pd_core::*;
use proptest::prelude::*;
use serde_json::{Value, json};

// ─── Strategies ──────────────────────────────────────────────────────────

fn optional_string() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        Just(Some(Value::Null)),
        ".{0,8}".prop_map(|s| Some(Value::String(s))),
        any::<i32>().prop_map(|n| Some(json!(n))),
    ]
}

fn align_value() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        prop::sample::select(vec!["start", "middle", "end", "left", "Right", "CENTER", "centre"])
            .prop_map(|s| Some(json!(s))),
        "[a-z]{0,6}".prop_map(|s| Some(json!(s))),
        Just(Some(Value::Null)),
        any::<bool>().prop_map(|b| Some(json!(b))),
    ]
}

fn raw_event() -> impl Strategy<Value = Value> {
    let tag = prop::sample::select(vec![
        "create", "update", "move", "delete", "think", "talk", "wave",
    ]);
    let shape_tag = prop::sample::select(vec!["text", "rectangle", "line", "arrow"]);
    (
        tag,
        shape_tag,
        align_value(),
        optional_string(),
        optional_string(),
        optional_string(),
    )
        .prop_map(|(tag, shape_tag, align, text, note, intent)| {
            let mut shape = json!({ "type": shape_tag, "shapeId": "s", "x": 0, "y": 0 });
            let mut event = json!({ "type": tag });
            if let Some(v) = align {
                shape["textAlign"] = v;
            }
            if let Some(v) = note {
                shape["note"] = v;
            }
            if let Some(v) = text.clone() {
                shape["text"] = v.clone();
                event["text"] = v;
            }
            if let Some(v) = intent {
                event["intent"] = v;
            }
            event["shape"] = shape;
            event
        })
}

// ─── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn namespacing_is_idempotent(raw in ".{0,24}") {
        let once = namespace_id(&raw).into_owned();
        let twice = namespace_id(&once).into_owned();
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.starts_with(SHAPE_PREFIX));
        prop_assert_eq!(ShapeId::namespace(&raw), ShapeId::namespace(&once));
    }

    #[test]
    fn prefixed_ids_are_never_double_prefixed(raw in "[a-z0-9_]{1,12}") {
        let prefixed = format!("shape:{raw}");
        let id = ShapeId::namespace(&prefixed);
        prop_assert_eq!(id.as_str(), prefixed.as_str());
    }

    #[test]
    fn text_align_repair_is_closed(raw in ".{0,16}") {
        let align = repair_text_align(&raw);
        prop_assert!(["start", "middle", "end"].contains(&align.as_str()));
    }

    #[test]
    fn sanitize_is_idempotent(event in raw_event()) {
        let mut once = event.clone();
        sanitize_event(&mut once);
        let mut twice = once.clone();
        sanitize_event(&mut twice);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn sanitized_events_always_carry_intent(event in raw_event()) {
        let mut event = event;
        sanitize_event(&mut event);
        prop_assert!(event["intent"].is_string() || event["intent"].is_number());
    }
}

#[test]
fn fill_mapping_is_total() {
    for fill in Fill::ALL {
        let mapped = EditorFill::from(fill);
        let json = serde_json::to_value(mapped).unwrap();
        assert!(json.is_string(), "{fill:?} mapped to {json}");
    }
}

//! Repair pass over raw model output, run before schema validation.
//!
//! Models emit JSON that parses but bends the schema: CSS-style alignment
//! names, `null` where a string is required, missing `intent`s. This pass
//! rewrites those in place on the untyped `serde_json::Value` so validation
//! sees a conforming document. It never rejects anything; structural
//! problems are left for the validator to report.
//!
//! Idempotent: sanitizing an already-sanitized document changes nothing.

use crate::model::{EventKind, ShapeKind, TextAlign};
use serde_json::{Map, Value};

/// Sanitize every event of a Response Envelope in place.
/// Envelopes whose `events` is missing or not an array are left untouched.
pub fn sanitize_response(envelope: &mut Value) {
    if let Some(Value::Array(events)) = envelope.get_mut("events") {
        for event in events {
            sanitize_event(event);
        }
    }
}

/// Sanitize one raw event in place.
pub fn sanitize_event(event: &mut Value) {
    let Some(obj) = event.as_object_mut() else {
        return;
    };

    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .and_then(EventKind::from_tag);

    match kind {
        Some(EventKind::Create | EventKind::Update) => {
            if let Some(Value::Object(shape)) = obj.get_mut("shape") {
                sanitize_shape(shape);
            }
        }
        Some(EventKind::Think | EventKind::Talk) => fill_missing_string(obj, "text"),
        _ => {}
    }

    fill_missing_string(obj, "intent");
}

fn sanitize_shape(shape: &mut Map<String, Value>) {
    let kind = shape
        .get("type")
        .and_then(Value::as_str)
        .and_then(ShapeKind::from_tag);
    if kind != Some(ShapeKind::Text) {
        return;
    }

    if let Some(align) = shape.get_mut("textAlign") {
        let repaired = match align.as_str() {
            Some(s) => repair_text_align(s),
            None => {
                log::warn!("textAlign {align} is not a string, using \"middle\"");
                TextAlign::Middle
            }
        };
        *align = Value::String(repaired.as_str().to_string());
    }

    fill_missing_string(shape, "text");
    fill_missing_string(shape, "note");
}

/// Collapse any alignment string onto `start`, `middle` or `end`.
///
/// Canonical values pass through. `left`, `right`, `center` and `centre`
/// (any case) map to their canonical equivalent; everything else becomes
/// `middle`. Remaps are logged, not rejected.
pub fn repair_text_align(raw: &str) -> TextAlign {
    if let Some(align) = TextAlign::from_canonical(raw) {
        return align;
    }

    let mapped = match raw.to_ascii_lowercase().as_str() {
        "left" => Some(TextAlign::Start),
        "right" => Some(TextAlign::End),
        "center" | "centre" => Some(TextAlign::Middle),
        _ => None,
    };

    match mapped {
        Some(align) => {
            log::warn!("textAlign {raw:?} remapped to {:?}", align.as_str());
            align
        }
        None => {
            log::warn!("unknown textAlign {raw:?}, using \"middle\"");
            TextAlign::Middle
        }
    }
}

/// Insert `""` for a key that is absent or `null`. Other values are kept,
/// so a wrongly-typed value still fails validation.
fn fill_missing_string(obj: &mut Map<String, Value>, key: &str) {
    if matches!(obj.get(key), None | Some(Value::Null)) {
        obj.insert(key.to_string(), Value::String(String::new()));
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn synonyms_map_to_canonical() {
        assert_eq!(repair_text_align("left"), TextAlign::Start);
        assert_eq!(repair_text_align("RIGHT"), TextAlign::End);
        assert_eq!(repair_text_align("center"), TextAlign::Middle);
        assert_eq!(repair_text_align("Centre"), TextAlign::Middle);
        assert_eq!(repair_text_align("end"), TextAlign::End);
        assert_eq!(repair_text_align("justify"), TextAlign::Middle);
    }

    #[test]
    fn text_shape_gets_align_text_and_note() {
        let mut event = json!({
            "type": "create",
            "shape": { "type": "text", "shapeId": "t", "x": 0, "y": 0, "textAlign": "left", "note": null }
        });
        sanitize_event(&mut event);
        assert_eq!(
            event,
            json!({
                "type": "create",
                "intent": "",
                "shape": {
                    "type": "text", "shapeId": "t", "x": 0, "y": 0,
                    "textAlign": "start", "note": "", "text": ""
                }
            })
        );
    }

    #[test]
    fn non_string_align_defaults_to_middle() {
        let mut event = json!({
            "type": "update",
            "shape": { "type": "text", "shapeId": "t", "x": 0, "y": 0, "textAlign": 3 }
        });
        sanitize_event(&mut event);
        assert_eq!(event["shape"]["textAlign"], json!("middle"));
    }

    #[test]
    fn absent_align_is_left_for_schema_default() {
        let mut event = json!({
            "type": "create",
            "shape": { "type": "text", "shapeId": "t", "x": 0, "y": 0 }
        });
        sanitize_event(&mut event);
        assert!(event["shape"].get("textAlign").is_none());
    }

    #[test]
    fn non_text_shapes_are_not_touched() {
        let mut event = json!({
            "type": "create",
            "shape": { "type": "rectangle", "shapeId": "r", "x": 0, "y": 0, "width": 1, "height": 1 }
        });
        sanitize_event(&mut event);
        assert!(event["shape"].get("text").is_none());
        assert!(event["shape"].get("note").is_none());
    }

    #[test]
    fn think_and_talk_get_text() {
        let mut think = json!({ "type": "think" });
        let mut talk = json!({ "type": "talk", "text": null, "intent": "greet" });
        sanitize_event(&mut think);
        sanitize_event(&mut talk);
        assert_eq!(think, json!({ "type": "think", "text": "", "intent": "" }));
        assert_eq!(talk, json!({ "type": "talk", "text": "", "intent": "greet" }));
    }

    #[test]
    fn unknown_event_still_gets_intent() {
        let mut event = json!({ "type": "explode" });
        sanitize_event(&mut event);
        assert_eq!(event, json!({ "type": "explode", "intent": "" }));
    }

    #[test]
    fn wrongly_typed_text_is_kept() {
        let mut talk = json!({ "type": "talk", "text": 42 });
        sanitize_event(&mut talk);
        assert_eq!(talk["text"], json!(42));
    }

    #[test]
    fn envelope_without_events_is_untouched() {
        let mut envelope = json!({ "long_description_of_strategy": "s" });
        let before = envelope.clone();
        sanitize_response(&mut envelope);
        assert_eq!(envelope, before);
    }
}

//! Structural validation of a Response Envelope.
//!
//! Dispatch is an exhaustive match on the `type` discriminant: an unknown or
//! missing tag is rejected outright instead of falling through to another
//! variant. Field-level checks and default filling are delegated to the
//! typed `serde` model once the tag is known. Validation is all-or-nothing:
//! one bad event rejects the whole envelope.

use crate::error::SchemaViolation;
use crate::model::{Event, EventKind, ModelResponse, ShapeKind};
use serde::Deserialize;
use serde_json::Value;

const STRATEGY_FIELD: &str = "long_description_of_strategy";

/// Validate an already-parsed (and usually already-sanitized) envelope and
/// decode it into typed events with defaults applied.
pub fn validate_response(envelope: &Value) -> Result<ModelResponse, SchemaViolation> {
    let Some(obj) = envelope.as_object() else {
        return Err(SchemaViolation::new(
            "$",
            format!("expected an object, found {}", type_name(envelope)),
        ));
    };

    let strategy = match obj.get(STRATEGY_FIELD) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            return Err(SchemaViolation::new(
                STRATEGY_FIELD,
                format!("expected a string, found {}", type_name(other)),
            ));
        }
        None => return Err(SchemaViolation::new(STRATEGY_FIELD, "missing field")),
    };

    let items = match obj.get("events") {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(SchemaViolation::new(
                "events",
                format!("expected an array, found {}", type_name(other)),
            ));
        }
        None => return Err(SchemaViolation::new("events", "missing field")),
    };

    let events = items
        .iter()
        .enumerate()
        .map(|(i, item)| validate_event(item, &format!("events[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ModelResponse {
        long_description_of_strategy: strategy,
        events,
    })
}

/// Validate and decode a single event. `path` prefixes any reported location.
pub fn validate_event(item: &Value, path: &str) -> Result<Event, SchemaViolation> {
    let kind = expect_tag(item, path, EventKind::from_tag, "event")?;

    if matches!(kind, EventKind::Create | EventKind::Update) {
        let shape_path = format!("{path}.shape");
        match item.get("shape") {
            Some(shape) => {
                expect_tag(shape, &shape_path, ShapeKind::from_tag, "shape")?;
            }
            None => return Err(SchemaViolation::new(shape_path, "missing field")),
        }
    }

    Event::deserialize(item).map_err(|e| SchemaViolation::new(path, e.to_string()))
}

/// Read the `type` discriminant of an object and resolve it with `lookup`.
fn expect_tag<K>(
    value: &Value,
    path: &str,
    lookup: fn(&str) -> Option<K>,
    what: &str,
) -> Result<K, SchemaViolation> {
    let Some(obj) = value.as_object() else {
        return Err(SchemaViolation::new(
            path,
            format!("expected {what} object, found {}", type_name(value)),
        ));
    };
    let tag_path = format!("{path}.type");
    match obj.get("type") {
        Some(Value::String(tag)) => lookup(tag)
            .ok_or_else(|| SchemaViolation::new(tag_path, format!("unknown {what} type {tag:?}"))),
        Some(other) => Err(SchemaViolation::new(
            tag_path,
            format!("expected a string, found {}", type_name(other)),
        )),
        None => Err(SchemaViolation::new(tag_path, "missing discriminant")),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

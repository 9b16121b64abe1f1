//! Typed event model for language-model output.
//!
//! The model answers a drawing request with a Response Envelope: a strategy
//! narrative plus an ordered list of events. Each event is a closed sum type
//! tagged by its `type` field; `create`/`update` events carry a `Shape`,
//! itself tagged by `type`. Optional fields are filled with their documented
//! default once, at decode time:
//!
//! | field | default |
//! |---|---|
//! | `intent` | `""` |
//! | `note` | `""` |
//! | `text` (text shape, think) | `""` |
//! | `textAlign` | `middle` |
//!
//! Unknown extra fields are ignored so newer prompts can add hints without
//! breaking older decoders.

use serde::{Deserialize, Serialize};

// ─── Style vocabulary ────────────────────────────────────────────────────

/// Named colour shared by the model vocabulary and the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Color {
    Red,
    LightRed,
    Green,
    LightGreen,
    Blue,
    LightBlue,
    Orange,
    Yellow,
    #[default]
    Black,
    Violet,
    LightViolet,
    Grey,
    White,
}

/// Fill style in the model's vocabulary. Translated to `EditorFill` by the
/// converter; the two vocabularies overlap in spelling but not in meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    #[default]
    None,
    Tint,
    Semi,
    Solid,
    Pattern,
}

impl Fill {
    pub const ALL: [Fill; 5] = [Fill::None, Fill::Tint, Fill::Semi, Fill::Solid, Fill::Pattern];
}

/// Horizontal text alignment, closed over three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Start,
    #[default]
    Middle,
    End,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Start => "start",
            TextAlign::Middle => "middle",
            TextAlign::End => "end",
        }
    }

    /// Exact match against the canonical spelling only. Synonym repair
    /// lives in `sanitize::repair_text_align`.
    pub fn from_canonical(s: &str) -> Option<Self> {
        match s {
            "start" => Some(TextAlign::Start),
            "middle" => Some(TextAlign::Middle),
            "end" => Some(TextAlign::End),
            _ => None,
        }
    }
}

// ─── Shapes ──────────────────────────────────────────────────────────────

/// Shape discriminant, used for tag dispatch during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Text,
    Rectangle,
    Ellipse,
    Line,
    Arrow,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Text,
        ShapeKind::Rectangle,
        ShapeKind::Ellipse,
        ShapeKind::Line,
        ShapeKind::Arrow,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Text => "text",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Line => "line",
            ShapeKind::Arrow => "arrow",
        }
    }
}

/// A text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShape {
    pub shape_id: String,
    #[serde(default)]
    pub note: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub text_align: TextAlign,
}

/// A rectangle or ellipse, positioned by its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxShape {
    pub shape_id: String,
    #[serde(default)]
    pub note: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub fill: Option<Fill>,
    /// Caption drawn inside the shape.
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineShape {
    pub shape_id: String,
    #[serde(default)]
    pub note: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(default)]
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowShape {
    pub shape_id: String,
    #[serde(default)]
    pub note: String,
    /// Shape the arrow leaves from, if the model bound it to one.
    #[serde(default)]
    pub from_id: Option<String>,
    /// Shape the arrow points at, if the model bound it to one.
    #[serde(default)]
    pub to_id: Option<String>,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub text: Option<String>,
}

/// The geometric payload of a `create`/`update` event, before conversion
/// into editor-native props. Ids are still model-chosen (not namespaced).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Text(TextShape),
    Rectangle(BoxShape),
    Ellipse(BoxShape),
    Line(LineShape),
    Arrow(ArrowShape),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Text(_) => ShapeKind::Text,
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Ellipse(_) => ShapeKind::Ellipse,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Arrow(_) => ShapeKind::Arrow,
        }
    }

    pub fn shape_id(&self) -> &str {
        match self {
            Shape::Text(s) => &s.shape_id,
            Shape::Rectangle(s) | Shape::Ellipse(s) => &s.shape_id,
            Shape::Line(s) => &s.shape_id,
            Shape::Arrow(s) => &s.shape_id,
        }
    }

    pub fn note(&self) -> &str {
        match self {
            Shape::Text(s) => &s.note,
            Shape::Rectangle(s) | Shape::Ellipse(s) => &s.note,
            Shape::Line(s) => &s.note,
            Shape::Arrow(s) => &s.note,
        }
    }
}

// ─── Events ──────────────────────────────────────────────────────────────

/// Event discriminant, used for tag dispatch during validation and for
/// labelling warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Create,
    Update,
    Move,
    Delete,
    Think,
    Talk,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::Create,
        EventKind::Update,
        EventKind::Move,
        EventKind::Delete,
        EventKind::Think,
        EventKind::Talk,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Create => "create",
            EventKind::Update => "update",
            EventKind::Move => "move",
            EventKind::Delete => "delete",
            EventKind::Think => "think",
            EventKind::Talk => "talk",
        }
    }
}

/// One model-emitted instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Event {
    Create {
        shape: Shape,
        #[serde(default)]
        intent: String,
    },
    Update {
        shape: Shape,
        #[serde(default)]
        intent: String,
    },
    /// Reposition an existing shape. Converted to a partial update.
    Move {
        shape_id: String,
        x: f64,
        y: f64,
        #[serde(default)]
        intent: String,
    },
    Delete {
        shape_id: String,
        #[serde(default)]
        intent: String,
    },
    /// Internal reasoning. Never reaches the canvas.
    Think {
        #[serde(default)]
        text: String,
        #[serde(default)]
        intent: String,
    },
    /// A message for the user. Never reaches the canvas.
    Talk {
        text: String,
        #[serde(default)]
        intent: String,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Create { .. } => EventKind::Create,
            Event::Update { .. } => EventKind::Update,
            Event::Move { .. } => EventKind::Move,
            Event::Delete { .. } => EventKind::Delete,
            Event::Think { .. } => EventKind::Think,
            Event::Talk { .. } => EventKind::Talk,
        }
    }

    pub fn intent(&self) -> &str {
        match self {
            Event::Create { intent, .. }
            | Event::Update { intent, .. }
            | Event::Move { intent, .. }
            | Event::Delete { intent, .. }
            | Event::Think { intent, .. }
            | Event::Talk { intent, .. } => intent,
        }
    }
}

// ─── Response Envelope ───────────────────────────────────────────────────

/// The complete structured answer of one model call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Informational only; nothing downstream consumes it.
    pub long_description_of_strategy: String,
    pub events: Vec<Event>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_shape_fills_defaults() {
        let event: Event = serde_json::from_value(json!({
            "type": "create",
            "shape": { "type": "text", "shapeId": "t1", "x": 10, "y": 20 }
        }))
        .unwrap();
        let Event::Create { shape: Shape::Text(text), intent } = event else {
            panic!("expected text create");
        };
        assert_eq!(intent, "");
        assert_eq!(text.note, "");
        assert_eq!(text.text, "");
        assert_eq!(text.text_align, TextAlign::Middle);
        assert_eq!(text.color, None);
    }

    #[test]
    fn kebab_colors_decode() {
        let c: Color = serde_json::from_value(json!("light-violet")).unwrap();
        assert_eq!(c, Color::LightViolet);
        assert!(serde_json::from_value::<Color>(json!("purple")).is_err());
    }

    #[test]
    fn move_event_uses_camel_case_id() {
        let event: Event =
            serde_json::from_value(json!({ "type": "move", "shapeId": "a", "x": 1, "y": 2 }))
                .unwrap();
        assert_eq!(
            event,
            Event::Move {
                shape_id: "a".into(),
                x: 1.0,
                y: 2.0,
                intent: String::new(),
            }
        );
    }

    #[test]
    fn extra_fields_are_ignored() {
        let event: Event = serde_json::from_value(json!({
            "type": "delete", "shapeId": "a", "confidence": 0.9
        }))
        .unwrap();
        assert_eq!(event.kind(), EventKind::Delete);
    }

    #[test]
    fn arrow_refs_accept_null() {
        let shape: Shape = serde_json::from_value(json!({
            "type": "arrow", "shapeId": "ar", "fromId": null, "toId": "b",
            "x1": 0, "y1": 0, "x2": 5, "y2": 5
        }))
        .unwrap();
        let Shape::Arrow(arrow) = shape else { panic!("expected arrow") };
        assert_eq!(arrow.from_id, None);
        assert_eq!(arrow.to_id.as_deref(), Some("b"));
    }

    #[test]
    fn kind_tags_roundtrip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_tag(kind.as_str()), Some(kind));
        }
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::from_tag("Create"), None);
    }
}

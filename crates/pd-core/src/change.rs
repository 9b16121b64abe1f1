//! Editor-ready change records.
//!
//! A `Change` is what the canvas integration consumes: one mutation of the
//! drawing surface, or a chat message. Shapes are expressed in the editor's
//! own record format (`id`, `x`, `y`, `type`, `props`) and serialize to the
//! JSON the browser editor accepts directly.

use crate::id::ShapeId;
use crate::model::{Color, Fill, TextAlign};
use serde::Serialize;

// ─── Change ──────────────────────────────────────────────────────────────

/// One editor mutation or conversational message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Change {
    CreateShape { description: String, shape: ShapeRecord },
    /// Full replacement, or a partial update when `shape.body` is `None`.
    UpdateShape { description: String, shape: ShapeRecord },
    DeleteShape { description: String, shape_id: ShapeId },
    /// Routed to the conversation surface, never to the canvas.
    Talk { description: String, text: String },
}

impl Change {
    pub fn type_name(&self) -> &'static str {
        match self {
            Change::CreateShape { .. } => "createShape",
            Change::UpdateShape { .. } => "updateShape",
            Change::DeleteShape { .. } => "deleteShape",
            Change::Talk { .. } => "talk",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Change::CreateShape { description, .. }
            | Change::UpdateShape { description, .. }
            | Change::DeleteShape { description, .. }
            | Change::Talk { description, .. } => description,
        }
    }

    /// The shape this change targets, if it targets one.
    pub fn shape_id(&self) -> Option<ShapeId> {
        match self {
            Change::CreateShape { shape, .. } | Change::UpdateShape { shape, .. } => Some(shape.id),
            Change::DeleteShape { shape_id, .. } => Some(*shape_id),
            Change::Talk { .. } => None,
        }
    }
}

// ─── Shape records ───────────────────────────────────────────────────────

/// A shape in editor-native form. Without a `body` the record is a partial
/// update that only repositions the shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeRecord {
    pub id: ShapeId,
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub body: Option<ShapeBody>,
}

/// Editor shape type plus its props.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "props", rename_all = "lowercase")]
pub enum ShapeBody {
    Text(TextProps),
    Geo(GeoProps),
    Line(LineProps),
    Arrow(ArrowProps),
}

impl ShapeBody {
    pub fn type_name(&self) -> &'static str {
        match self {
            ShapeBody::Text(_) => "text",
            ShapeBody::Geo(_) => "geo",
            ShapeBody::Line(_) => "line",
            ShapeBody::Arrow(_) => "arrow",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    pub rich_text: RichText,
    pub color: Color,
    pub text_align: TextAlign,
}

/// Geometric primitive drawn by the editor's `geo` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoKind {
    Rectangle,
    Ellipse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoProps {
    pub geo: GeoKind,
    pub w: f64,
    pub h: f64,
    pub color: Color,
    pub fill: EditorFill,
    pub rich_text: RichText,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineProps {
    pub points: LinePoints,
    pub color: Color,
}

/// The two handles of a straight line, in the line's local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoints {
    pub a1: LinePoint,
    pub a2: LinePoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub id: &'static str,
    /// Fractional ordering key; handles sort by it.
    pub index: &'static str,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowProps {
    pub start: Point,
    pub end: Point,
    pub color: Color,
    pub text: String,
}

// ─── Fill translation ────────────────────────────────────────────────────

/// Fill style in the editor's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorFill {
    None,
    Semi,
    Solid,
    Pattern,
    Fill,
}

impl From<Fill> for EditorFill {
    /// The model's `solid` is the editor's opaque `fill`; the model's `tint`
    /// is the editor's light `solid`.
    fn from(fill: Fill) -> Self {
        match fill {
            Fill::None => EditorFill::None,
            Fill::Solid => EditorFill::Fill,
            Fill::Semi => EditorFill::Semi,
            Fill::Tint => EditorFill::Solid,
            Fill::Pattern => EditorFill::Pattern,
        }
    }
}

// ─── Rich text ───────────────────────────────────────────────────────────

/// Editor rich-text document: one paragraph per line of plain text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "doc")]
pub struct RichText {
    pub content: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "paragraph")]
pub struct Paragraph {
    /// Empty for a blank line.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<TextRun>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "text")]
pub struct TextRun {
    pub text: String,
}

impl RichText {
    pub fn from_plain(text: &str) -> Self {
        let content = text
            .split('\n')
            .map(|line| Paragraph {
                content: if line.is_empty() {
                    Vec::new()
                } else {
                    vec![TextRun {
                        text: line.to_string(),
                    }]
                },
            })
            .collect();
        Self { content }
    }
}

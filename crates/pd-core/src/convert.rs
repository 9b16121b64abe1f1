//! Event → Change conversion.
//!
//! A pure mapping from validated model events to editor-ready changes. Every
//! event yields zero or one change; `think` yields none. All geometry and
//! style normalization happens here:
//!
//! - ids are namespaced with `shape:` exactly once
//! - missing colours become `black`
//! - model fills are translated through the total `EditorFill` table
//! - lines are re-origined to their bounding-box top-left corner
//! - arrows keep absolute endpoints with the shape origin pinned at (0, 0)
//!
//! A failing event is skipped with a `ConversionWarning`; the rest of the
//! batch is still converted.

use crate::change::*;
use crate::error::{ConversionError, ConversionWarning};
use crate::id::{SHAPE_PREFIX, ShapeId};
use crate::model::*;
use crate::prompt::Prompt;
use smallvec::{SmallVec, smallvec};

/// Description used for a `talk` change whose event had no intent.
pub const TALK_FALLBACK_DESCRIPTION: &str = "AI conversation";

/// Changes produced by one event. Never more than one today.
pub type EventChanges = SmallVec<[Change; 1]>;

/// Result of converting a batch of events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversion {
    /// Changes in event order.
    pub changes: Vec<Change>,
    /// One entry per skipped event.
    pub warnings: Vec<ConversionWarning>,
}

/// Convert a batch of events. Never fails as a whole: an event that cannot be
/// converted is skipped and reported in `warnings`.
#[must_use]
pub fn convert_events(prompt: &Prompt, events: &[Event]) -> Conversion {
    log::trace!(
        "converting {} events for prompt area {:?}",
        events.len(),
        prompt.prompt_bounds
    );

    let mut out = Conversion::default();
    for (index, event) in events.iter().enumerate() {
        match convert_event(event) {
            Ok(changes) => out.changes.extend(changes),
            Err(error) => {
                let warning = ConversionWarning {
                    index,
                    event_type: event.kind(),
                    error,
                };
                log::warn!("{warning}");
                out.warnings.push(warning);
            }
        }
    }
    out
}

/// Convert a single event.
pub fn convert_event(event: &Event) -> Result<EventChanges, ConversionError> {
    match event {
        Event::Create { shape, .. } => Ok(smallvec![Change::CreateShape {
            description: shape.note().to_string(),
            shape: shape_record(shape)?,
        }]),
        Event::Update { shape, .. } => Ok(smallvec![Change::UpdateShape {
            description: shape.note().to_string(),
            shape: shape_record(shape)?,
        }]),
        Event::Move { shape_id, x, y, .. } => {
            let id = checked_id(shape_id)?;
            Ok(smallvec![Change::UpdateShape {
                description: format!("Move shape {}", id.local_name()),
                shape: ShapeRecord {
                    id,
                    x: finite("x", *x)?,
                    y: finite("y", *y)?,
                    body: None,
                },
            }])
        }
        Event::Delete { shape_id, .. } => {
            let id = checked_id(shape_id)?;
            Ok(smallvec![Change::DeleteShape {
                description: format!("Delete shape {}", id.local_name()),
                shape_id: id,
            }])
        }
        Event::Think { .. } => Ok(SmallVec::new()),
        Event::Talk { text, intent } => {
            let description = if intent.is_empty() {
                TALK_FALLBACK_DESCRIPTION.to_string()
            } else {
                intent.clone()
            };
            Ok(smallvec![Change::Talk {
                description,
                text: text.clone(),
            }])
        }
    }
}

/// Build the editor record for a created or updated shape.
fn shape_record(shape: &Shape) -> Result<ShapeRecord, ConversionError> {
    let id = checked_id(shape.shape_id())?;

    let record = match shape {
        Shape::Text(s) => ShapeRecord {
            id,
            x: finite("x", s.x)?,
            y: finite("y", s.y)?,
            body: Some(ShapeBody::Text(TextProps {
                rich_text: RichText::from_plain(&s.text),
                color: s.color.unwrap_or_default(),
                text_align: s.text_align,
            })),
        },
        Shape::Rectangle(s) => geo_record(id, GeoKind::Rectangle, s)?,
        Shape::Ellipse(s) => geo_record(id, GeoKind::Ellipse, s)?,
        Shape::Line(s) => {
            let (x1, y1) = (finite("x1", s.x1)?, finite("y1", s.y1)?);
            let (x2, y2) = (finite("x2", s.x2)?, finite("y2", s.y2)?);
            let min_x = x1.min(x2);
            let min_y = y1.min(y2);
            // Finite endpoints can still overflow once made local.
            ShapeRecord {
                id,
                x: min_x,
                y: min_y,
                body: Some(ShapeBody::Line(LineProps {
                    points: LinePoints {
                        a1: LinePoint {
                            id: "a1",
                            index: "a1",
                            x: finite("x1", x1 - min_x)?,
                            y: finite("y1", y1 - min_y)?,
                        },
                        a2: LinePoint {
                            id: "a2",
                            index: "a2",
                            x: finite("x2", x2 - min_x)?,
                            y: finite("y2", y2 - min_y)?,
                        },
                    },
                    color: s.color.unwrap_or_default(),
                })),
            }
        }
        // Arrow endpoints stay in page space so they line up with the shapes
        // they point at; the record origin is pinned.
        Shape::Arrow(s) => ShapeRecord {
            id,
            x: 0.0,
            y: 0.0,
            body: Some(ShapeBody::Arrow(ArrowProps {
                start: Point {
                    x: finite("x1", s.x1)?,
                    y: finite("y1", s.y1)?,
                },
                end: Point {
                    x: finite("x2", s.x2)?,
                    y: finite("y2", s.y2)?,
                },
                color: s.color.unwrap_or_default(),
                text: s.text.clone().unwrap_or_default(),
            })),
        },
    };
    Ok(record)
}

fn geo_record(id: ShapeId, geo: GeoKind, s: &BoxShape) -> Result<ShapeRecord, ConversionError> {
    Ok(ShapeRecord {
        id,
        x: finite("x", s.x)?,
        y: finite("y", s.y)?,
        body: Some(ShapeBody::Geo(GeoProps {
            geo,
            w: size("width", s.width)?,
            h: size("height", s.height)?,
            color: s.color.unwrap_or_default(),
            fill: s.fill.unwrap_or_default().into(),
            rich_text: RichText::from_plain(s.text.as_deref().unwrap_or_default()),
        })),
    })
}

/// Namespace a model id, rejecting ids with nothing after the prefix.
fn checked_id(raw: &str) -> Result<ShapeId, ConversionError> {
    let local = raw.strip_prefix(SHAPE_PREFIX).unwrap_or(raw);
    if local.trim().is_empty() {
        return Err(ConversionError::EmptyShapeId);
    }
    Ok(ShapeId::namespace(raw))
}

fn finite(field: &'static str, v: f64) -> Result<f64, ConversionError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ConversionError::NonFiniteGeometry { field })
    }
}

fn size(field: &'static str, v: f64) -> Result<f64, ConversionError> {
    let v = finite(field, v)?;
    if v < 0.0 {
        return Err(ConversionError::NegativeSize { field });
    }
    Ok(v)
}

// ─── Tests ────────────────────────────────────────────────────────────────

//! In-memory `CanvasEditor`.
//!
//! Keeps shape records keyed by id, in creation order. Enforces the same
//! ground rules as the browser editor: ids are unique, updates and deletes
//! need an existing shape, and an update may not change a shape's type.
//! Used by the CLI's `--apply` mode and as the test double for batches.

use crate::apply::{CanvasEditor, EditorError};
use pd_core::prompt::CanvasContent;
use pd_core::{ShapeId, ShapeRecord};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryCanvas {
    shapes: HashMap<ShapeId, ShapeRecord>,
    /// Creation order, for deterministic listing.
    order: Vec<ShapeId>,
}

impl MemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ShapeId) -> Option<&ShapeRecord> {
        self.shapes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Shapes in creation order.
    pub fn shapes(&self) -> impl Iterator<Item = &ShapeRecord> {
        self.order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Serialize the canvas the way the host sends it in a `Prompt`, so a
    /// follow-up turn can see what the previous one drew.
    pub fn snapshot(&self) -> CanvasContent {
        CanvasContent {
            shapes: self
                .shapes()
                .filter_map(|shape| serde_json::to_value(shape).ok())
                .collect(),
            ..Default::default()
        }
    }
}

impl CanvasEditor for MemoryCanvas {
    fn create_shape(&mut self, shape: &ShapeRecord) -> Result<(), EditorError> {
        if self.shapes.contains_key(&shape.id) {
            return Err(EditorError::DuplicateShape(shape.id));
        }
        if shape.body.is_none() {
            return Err(EditorError::Rejected(format!(
                "cannot create {} without a shape type",
                shape.id
            )));
        }
        self.shapes.insert(shape.id, shape.clone());
        self.order.push(shape.id);
        Ok(())
    }

    fn update_shape(&mut self, shape: &ShapeRecord) -> Result<(), EditorError> {
        let existing = self
            .shapes
            .get_mut(&shape.id)
            .ok_or(EditorError::MissingShape(shape.id))?;

        if let (Some(old), Some(new)) = (&existing.body, &shape.body)
            && old.type_name() != new.type_name()
        {
            return Err(EditorError::Rejected(format!(
                "cannot change {} from {} to {}",
                shape.id,
                old.type_name(),
                new.type_name()
            )));
        }

        existing.x = shape.x;
        existing.y = shape.y;
        if let Some(body) = &shape.body {
            existing.body = Some(body.clone());
        }
        Ok(())
    }

    fn delete_shape(&mut self, id: ShapeId) -> Result<(), EditorError> {
        self.shapes.remove(&id).ok_or(EditorError::MissingShape(id))?;
        self.order.retain(|s| *s != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pd_core::change::{GeoKind, GeoProps, RichText, ShapeBody};
    use pd_core::{Color, change::EditorFill};

    fn geo(id: &str) -> ShapeRecord {
        ShapeRecord {
            id: ShapeId::namespace(id),
            x: 0.0,
            y: 0.0,
            body: Some(ShapeBody::Geo(GeoProps {
                geo: GeoKind::Rectangle,
                w: 10.0,
                h: 10.0,
                color: Color::Black,
                fill: EditorFill::None,
                rich_text: RichText::from_plain(""),
            })),
        }
    }

    #[test]
    fn create_then_move() {
        let mut canvas = MemoryCanvas::new();
        canvas.create_shape(&geo("a")).unwrap();
        canvas
            .update_shape(&ShapeRecord {
                id: ShapeId::namespace("a"),
                x: 40.0,
                y: 50.0,
                body: None,
            })
            .unwrap();
        let shape = canvas.get(ShapeId::namespace("a")).unwrap();
        assert_eq!((shape.x, shape.y), (40.0, 50.0));
        assert!(shape.body.is_some(), "move must keep the body");
    }

    #[test]
    fn duplicate_create_is_refused() {
        let mut canvas = MemoryCanvas::new();
        canvas.create_shape(&geo("a")).unwrap();
        assert_eq!(
            canvas.create_shape(&geo("a")),
            Err(EditorError::DuplicateShape(ShapeId::namespace("a")))
        );
        assert_eq!(canvas.len(), 1);
    }

    #[test]
    fn delete_missing_is_refused() {
        let mut canvas = MemoryCanvas::new();
        assert_eq!(
            canvas.delete_shape(ShapeId::namespace("ghost")),
            Err(EditorError::MissingShape(ShapeId::namespace("ghost")))
        );
    }

    #[test]
    fn snapshot_lists_in_creation_order() {
        let mut canvas = MemoryCanvas::new();
        canvas.create_shape(&geo("b")).unwrap();
        canvas.create_shape(&geo("a")).unwrap();
        let ids: Vec<_> = canvas
            .snapshot()
            .shapes
            .iter()
            .map(|s| s["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["shape:b", "shape:a"]);
    }
}

//! Applying a change batch to a canvas editor.
//!
//! The editor itself is external: anything implementing `CanvasEditor` can
//! receive a batch. Changes are applied strictly in order. A change the
//! editor refuses is logged and recorded, and the rest of the batch still
//! runs. `talk` changes never touch the canvas; their texts are collected
//! for the conversation surface.

use pd_core::{Change, ShapeId, ShapeRecord};
use thiserror::Error;

/// Mutation API of the drawing surface.
pub trait CanvasEditor {
    fn create_shape(&mut self, shape: &ShapeRecord) -> Result<(), EditorError>;

    /// `shape.body == None` means "move only".
    fn update_shape(&mut self, shape: &ShapeRecord) -> Result<(), EditorError>;

    fn delete_shape(&mut self, id: ShapeId) -> Result<(), EditorError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("shape {0} already exists")]
    DuplicateShape(ShapeId),

    #[error("shape {0} does not exist")]
    MissingShape(ShapeId),

    #[error("editor rejected the change: {0}")]
    Rejected(String),
}

/// A change the editor refused. Non-fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeApplicationWarning {
    /// Position of the change in the batch.
    pub index: usize,
    pub change_type: &'static str,
    pub error: EditorError,
}

impl std::fmt::Display for ChangeApplicationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "change {} ({}) not applied: {}",
            self.index, self.change_type, self.error
        )
    }
}

/// Outcome of `apply_changes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Canvas changes the editor accepted.
    pub applied: usize,
    pub warnings: Vec<ChangeApplicationWarning>,
    /// All non-empty talk texts joined by newlines, in emission order.
    pub talk: Option<String>,
}

/// Apply a batch in order, absorbing per-change failures.
pub fn apply_changes<E: CanvasEditor + ?Sized>(editor: &mut E, changes: &[Change]) -> ApplyReport {
    let mut report = ApplyReport::default();
    let mut talk: Vec<&str> = Vec::new();

    for (index, change) in changes.iter().enumerate() {
        let result = match change {
            Change::CreateShape { shape, .. } => editor.create_shape(shape),
            Change::UpdateShape { shape, .. } => editor.update_shape(shape),
            Change::DeleteShape { shape_id, .. } => editor.delete_shape(*shape_id),
            Change::Talk { text, .. } => {
                if !text.is_empty() {
                    talk.push(text);
                }
                continue;
            }
        };

        match result {
            Ok(()) => report.applied += 1,
            Err(error) => {
                let warning = ChangeApplicationWarning {
                    index,
                    change_type: change.type_name(),
                    error,
                };
                log::warn!("{warning}");
                report.warnings.push(warning);
            }
        }
    }

    if !talk.is_empty() {
        report.talk = Some(talk.join("\n"));
    }
    report
}

pub mod apply;
pub mod canvas;
pub mod service;

pub use apply::{ApplyReport, CanvasEditor, ChangeApplicationWarning, EditorError, apply_changes};
pub use canvas::MemoryCanvas;
pub use service::{AiResult, AiService, ChangeStream, ModelClient, ServiceConfig, ServiceError};

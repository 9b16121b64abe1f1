//! Error and warning types for the decode → convert pipeline.
//!
//! Structural failures (`SchemaViolation`, `ResponseError`) are fatal for the
//! request. Per-event failures (`ConversionError`) are recorded as
//! `ConversionWarning`s and never abort a batch.

use crate::model::EventKind;
use thiserror::Error;

/// The envelope or one of its events does not match the event schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema violation at `{path}`: {message}")]
pub struct SchemaViolation {
    /// Location of the offending value, e.g. `events[2].shape.type`.
    pub path: String,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Terminal failure decoding a model response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    /// Not JSON, or not a valid Response Envelope even after sanitization.
    /// `raw` is the unmodified model output, kept for diagnostics.
    #[error("Invalid response format: {reason}")]
    InvalidResponseFormat { reason: String, raw: String },
}

impl ResponseError {
    pub fn raw(&self) -> &str {
        match self {
            ResponseError::InvalidResponseFormat { raw, .. } => raw,
        }
    }
}

/// Why a single validated event could not become a change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("shape id is empty")]
    EmptyShapeId,

    #[error("`{field}` is not a finite number")]
    NonFiniteGeometry { field: &'static str },

    #[error("`{field}` must not be negative")]
    NegativeSize { field: &'static str },
}

/// A skipped event. Produced by `convert_events`, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionWarning {
    /// Position of the event in the batch.
    pub index: usize,
    pub event_type: EventKind,
    pub error: ConversionError,
}

impl std::fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "event {} ({}) skipped: {}",
            self.index,
            self.event_type.as_str(),
            self.error
        )
    }
}

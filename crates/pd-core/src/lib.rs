pub mod change;
pub mod convert;
pub mod error;
pub mod id;
pub mod model;
pub mod prompt;
pub mod response;
pub mod sanitize;
pub mod schema;

pub use change::{Change, ShapeBody, ShapeRecord};
pub use convert::{Conversion, convert_event, convert_events};
pub use error::{ConversionError, ConversionWarning, ResponseError, SchemaViolation};
pub use id::{SHAPE_PREFIX, ShapeId, namespace_id};
pub use model::*;
pub use prompt::{Prompt, build_messages, describe_canvas};
pub use response::decode_response;
pub use sanitize::{repair_text_align, sanitize_event, sanitize_response};
pub use schema::validate_response;

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for shape IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Marker the editor uses to recognize a canvas-entity reference.
pub const SHAPE_PREFIX: &str = "shape:";

/// Prefix a model-chosen id with `shape:` unless it already carries it.
///
/// Idempotent: `namespace_id(&namespace_id(s)) == namespace_id(s)`.
pub fn namespace_id(raw: &str) -> Cow<'_, str> {
    if raw.starts_with(SHAPE_PREFIX) {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(format!("{SHAPE_PREFIX}{raw}"))
    }
}

/// An interned, namespaced identifier for a shape on the editor canvas.
/// Always carries the `shape:` prefix exactly once.
///
/// Interned into a process-wide table that is never cleared, so every id
/// seen stays resident for the life of the process (or wasm instance).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(Spur);

impl ShapeId {
    /// Namespace and intern a raw id. Already-prefixed ids are kept as-is.
    pub fn namespace(raw: &str) -> Self {
        ShapeId(INTERNER.get_or_intern(namespace_id(raw)))
    }

    /// Resolve back to the full `shape:<id>` string.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// The model-facing part of the id, without the prefix.
    pub fn local_name(&self) -> &str {
        let full = self.as_str();
        full.strip_prefix(SHAPE_PREFIX).unwrap_or(full)
    }
}

impl fmt::Debug for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShapeId({})", self.as_str())
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ShapeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ShapeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ShapeId::namespace(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_id_gets_prefixed() {
        assert_eq!(namespace_id("box1"), "shape:box1");
        assert_eq!(ShapeId::namespace("box1").as_str(), "shape:box1");
    }

    #[test]
    fn prefixed_id_is_untouched() {
        assert!(matches!(namespace_id("shape:box1"), Cow::Borrowed(_)));
        assert_eq!(ShapeId::namespace("shape:box1"), ShapeId::namespace("box1"));
    }

    #[test]
    fn local_name_strips_prefix_once() {
        let id = ShapeId::namespace("shape:shape:odd");
        assert_eq!(id.as_str(), "shape:shape:odd");
        assert_eq!(id.local_name(), "shape:odd");
    }

    #[test]
    fn deserialize_namespaces() {
        let id: ShapeId = serde_json::from_str("\"title\"").unwrap();
        assert_eq!(id.as_str(), "shape:title");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"shape:title\"");
    }
}

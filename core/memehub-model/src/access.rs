use memehub_types::{Document, get_path};
use serde_json::Value;

/// Typed field accessors over a [`Document`], addressed by dotted path.
pub trait DocumentExt {
    /// Extract a string value (e.g. `"userDetails.name"`).
    fn get_str(&self, path: &str) -> Option<&str>;
}

impl DocumentExt for Document {
    fn get_str(&self, path: &str) -> Option<&str> {
        get_path(self, path).and_then(Value::as_str)
    }
}

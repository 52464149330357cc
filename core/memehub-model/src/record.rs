use memehub_types::{Document, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::ser::Error as _;
use serde_json::Value;

/// A typed record stored in a named collection.
pub trait Record: Serialize + DeserializeOwned {
    /// Collection the record lives in.
    const COLLECTION: &'static str;

    /// Converts the record into its stored document form.
    fn to_document(&self) -> Result<Document> {
        match serde_json::to_value(self)? {
            Value::Object(document) => Ok(document),
            other => Err(serde_json::Error::custom(format!(
                "record serialized to a non-object value: {other}"
            ))
            .into()),
        }
    }

    /// Decodes a stored document.
    fn from_document(document: Document) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(document))?)
    }
}

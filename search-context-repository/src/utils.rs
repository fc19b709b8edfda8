//! Utility functions for the search context repository.

use serde::Serialize;
use serde_json::Value;

use crate::errors::SearchContextError;

/// Field names checked, in order, when inferring a document ID.
const ID_FIELDS: [&str; 3] = ["id", "Id", "_id"];

/// Serialize a document into JSON for the search engine.
///
/// Only JSON objects can be indexed; any other shape is rejected.
///
/// # Returns
///
/// * `Ok(Value)` - The serialized document object
/// * `Err(SearchContextError::SerializationError)` - If serialization fails or
///   the document is not an object
pub fn to_document<T: Serialize + ?Sized>(document: &T) -> Result<Value, SearchContextError> {
    let value =
        serde_json::to_value(document).map_err(|e| SearchContextError::serialization(e.to_string()))?;
    if !value.is_object() {
        return Err(SearchContextError::serialization(
            "documents must serialize to a JSON object",
        ));
    }
    Ok(value)
}

/// Infer a document ID from its `id` field.
///
/// String and integer IDs are accepted; anything else means the search
/// engine assigns the ID.
///
/// # Example
///
/// ```
/// use search_context_repository::utils::document_id;
/// use serde_json::json;
///
/// assert_eq!(document_id(&json!({"id": "1", "name": "PS5"})), Some("1".to_string()));
/// assert_eq!(document_id(&json!({"id": 7})), Some("7".to_string()));
/// assert_eq!(document_id(&json!({"name": "PS5"})), None);
/// ```
pub fn document_id(document: &Value) -> Option<String> {
    ID_FIELDS
        .iter()
        .filter_map(|field| document.get(field))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
            _ => None,
        })
}

//! Reindex request type.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Copy documents from one index into another.
///
/// When `query` is set only the matching source documents are copied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReindexRequest {
    /// The index to read from.
    pub source_index: String,
    /// The index to write into.
    pub dest_index: String,
    /// Optional query restricting the copied documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
}

impl ReindexRequest {
    /// Create a reindex request copying every document.
    pub fn new(source_index: impl Into<String>, dest_index: impl Into<String>) -> Self {
        Self {
            source_index: source_index.into(),
            dest_index: dest_index.into(),
            query: None,
        }
    }

    /// Restrict the copy to documents matching `query`.
    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    /// Render the request as a `_reindex` API body.
    pub fn to_body(&self) -> Value {
        let mut source = json!({ "index": self.source_index });
        if let Some(ref query) = self.query {
            source["query"] = query.clone();
        }
        json!({
            "source": source,
            "dest": { "index": self.dest_index }
        })
    }
}

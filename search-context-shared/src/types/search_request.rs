//! Search request types.
//!
//! A `SearchRequest` carries a raw query JSON fragment plus pagination. The
//! query language itself belongs to the search engine; the helpers here only
//! build the handful of fragments repositories reach for most often.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Search request parameters.
///
/// The `query` field is sent verbatim as the `query` clause of the search
/// body. `from` and `size` are omitted from the body when not set, leaving
/// the engine defaults in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRequest {
    /// The query clause, e.g. `{"match": {"category": "books"}}`.
    pub query: Value,

    /// Offset of the first hit to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<usize>,

    /// Maximum number of hits to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

impl SearchRequest {
    /// Create a search request from a raw query clause.
    ///
    /// # Example
    ///
    /// ```
    /// use search_context_shared::SearchRequest;
    /// use serde_json::json;
    ///
    /// let request = SearchRequest::new(json!({"match": {"name": "console"}}));
    /// ```
    pub fn new(query: Value) -> Self {
        Self {
            query,
            from: None,
            size: None,
        }
    }

    /// Match every document in the index.
    pub fn match_all() -> Self {
        Self::new(json!({ "match_all": {} }))
    }

    /// Full-text match on a single field.
    pub fn match_field(field: &str, value: impl Into<Value>) -> Self {
        Self::new(json!({ "match": { field: value.into() } }))
    }

    /// Exact term match on a single field.
    pub fn term(field: &str, value: impl Into<Value>) -> Self {
        Self::new(json!({ "term": { field: value.into() } }))
    }

    /// Inclusive range on a single field. Missing bounds are left open.
    ///
    /// # Example
    ///
    /// ```
    /// use search_context_shared::SearchRequest;
    ///
    /// let request = SearchRequest::range("price", Some(10.0), Some(20.0));
    /// assert_eq!(request.query["range"]["price"]["gte"], 10.0);
    /// ```
    pub fn range(field: &str, gte: Option<f64>, lte: Option<f64>) -> Self {
        let mut bounds = Map::new();
        if let Some(gte) = gte {
            bounds.insert("gte".to_string(), json!(gte));
        }
        if let Some(lte) = lte {
            bounds.insert("lte".to_string(), json!(lte));
        }
        Self::new(json!({ "range": { field: bounds } }))
    }

    /// Set the pagination offset.
    pub fn with_from(mut self, from: usize) -> Self {
        self.from = Some(from);
        self
    }

    /// Set the maximum number of hits.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Render the request as a search API body.
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("query".to_string(), self.query.clone());
        if let Some(from) = self.from {
            body.insert("from".to_string(), json!(from));
        }
        if let Some(size) = self.size {
            body.insert("size".to_string(), json!(size));
        }
        Value::Object(body)
    }
}

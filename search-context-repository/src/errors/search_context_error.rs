//! Search context error types.
//!
//! This module defines the unified error type for all search context
//! operations, covering configuration problems, transport failures and
//! failures reported by the search engine itself.

use thiserror::Error;

/// Unified errors from search context operations.
///
/// Returned by `SearchBackend` implementations and carried inside a failed
/// `ContextResponse`. The type is `Clone` so a single failure can be both
/// logged and handed back to the caller.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchContextError {
    /// Invalid or incomplete connection configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failed to reach the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The search engine rejected the request.
    #[error("Server error ({status}): {reason}")]
    ServerError { status: u16, reason: String },

    /// Document not found.
    #[error("Document not found: index={index}, id={id}")]
    DocumentNotFound { index: String, id: String },

    /// Index not found.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// Failed to serialize a document or request body.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Failed to parse a response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// One or more items of a bulk operation failed.
    #[error("Bulk operation error: {failed} of {total} items failed: {details}")]
    BulkOperationError {
        failed: usize,
        total: usize,
        details: String,
    },

    /// No context is registered under the requested name.
    #[error("Context not registered: {0}")]
    ContextNotRegistered(String),
}

impl SearchContextError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a server error from an HTTP status and the server-reported reason.
    pub fn server(status: u16, reason: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            reason: reason.into(),
        }
    }

    /// Create a document not found error.
    pub fn document_not_found(index: &str, id: &str) -> Self {
        Self::DocumentNotFound {
            index: index.to_string(),
            id: id.to_string(),
        }
    }

    /// Create an index not found error.
    pub fn index_not_found(index: impl Into<String>) -> Self {
        Self::IndexNotFound(index.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a bulk operation error from the per-item failure messages.
    ///
    /// The item messages are joined with `"; "` so each failure stays
    /// individually visible in the rendered error.
    pub fn bulk_operation(total: usize, failures: &[String]) -> Self {
        Self::BulkOperationError {
            failed: failures.len(),
            total,
            details: failures.join("; "),
        }
    }

    /// Create a context not registered error.
    pub fn context_not_registered(name: impl Into<String>) -> Self {
        Self::ContextNotRegistered(name.into())
    }

    /// Whether this error means the target document or index does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DocumentNotFound { .. } | Self::IndexNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        let err = SearchContextError::server(400, "invalid_index_name_exception");
        assert_eq!(
            err.to_string(),
            "Server error (400): invalid_index_name_exception"
        );
    }

    #[test]
    fn test_bulk_operation_joins_failures() {
        let failures = vec![
            "item 0 (a): boom".to_string(),
            "item 2 (c): bang".to_string(),
        ];
        let err = SearchContextError::bulk_operation(3, &failures);
        let text = err.to_string();
        assert!(text.contains("2 of 3 items failed"));
        assert!(text.contains("item 0 (a): boom"));
        assert!(text.contains("item 2 (c): bang"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(SearchContextError::document_not_found("products", "1").is_not_found());
        assert!(SearchContextError::index_not_found("products").is_not_found());
        assert!(!SearchContextError::connection("refused").is_not_found());
    }
}

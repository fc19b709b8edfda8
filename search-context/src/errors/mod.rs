//! Error types for the product catalog.

use search_context_repository::SearchContextError;
use thiserror::Error;

/// Errors that can occur in catalog operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Invalid input from the caller.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The search context rejected an operation.
    #[error("Operation rejected: {0}")]
    Rejected(String),

    /// Error from the search context.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchContextError),
}

impl CatalogError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a rejected-operation error.
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}

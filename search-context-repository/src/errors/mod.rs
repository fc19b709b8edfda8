//! Error types for the search context repository.
//!
//! This module provides a unified error type for all search context operations.

mod search_context_error;

pub use search_context_error::SearchContextError;

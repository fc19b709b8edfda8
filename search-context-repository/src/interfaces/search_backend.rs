//! Search backend trait definition.
//!
//! This module defines the boundary between the context facade and the wire
//! client. Everything above it works with typed documents and
//! `ContextResponse`; everything below it speaks JSON to the search engine.

use async_trait::async_trait;
use serde_json::Value;

use search_context_shared::{AliasAction, ReindexRequest, SearchRequest};

use crate::errors::SearchContextError;

/// Abstracts the underlying search engine client (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are shared behind an `Arc` by every context of a registry,
/// so they must be safe for concurrent use. Each method issues exactly one
/// request and reports failure through `SearchContextError`; retries, if any,
/// are the caller's business.
///
/// Index names reach the backend already resolved.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Check that the cluster answers.
    async fn ping(&self) -> Result<(), SearchContextError>;

    /// Create an index with engine-default settings.
    async fn create_index(&self, index: &str) -> Result<(), SearchContextError>;

    /// Delete an index.
    ///
    /// A missing index is reported as `SearchContextError::IndexNotFound`.
    async fn delete_index(&self, index: &str) -> Result<(), SearchContextError>;

    /// Whether an index (or alias) with this name exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchContextError>;

    /// Make recent writes to the index visible to search.
    async fn refresh_index(&self, index: &str) -> Result<(), SearchContextError>;

    /// Index a document. Without an `id` the engine assigns one.
    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        document: Value,
    ) -> Result<(), SearchContextError>;

    /// Fetch a document's source. `Ok(None)` when the document doesn't exist.
    async fn get_document(&self, index: &str, id: &str)
        -> Result<Option<Value>, SearchContextError>;

    /// Delete a document.
    ///
    /// A missing document is reported as `SearchContextError::DocumentNotFound`.
    async fn delete_document(&self, index: &str, id: &str) -> Result<(), SearchContextError>;

    /// Merge `partial` into an existing document.
    async fn update_document(
        &self,
        index: &str,
        id: &str,
        partial: Value,
    ) -> Result<(), SearchContextError>;

    /// Run a search and return the `_source` of every hit, in hit order.
    ///
    /// A hit without a `_source` fails the whole search with a `ParseError`.
    async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<Vec<Value>, SearchContextError>;

    /// Copy documents between indices.
    async fn reindex(&self, request: &ReindexRequest) -> Result<(), SearchContextError>;

    /// Apply alias actions atomically.
    async fn update_aliases(&self, actions: &[AliasAction]) -> Result<(), SearchContextError>;
}

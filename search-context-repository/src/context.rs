//! Search context implementation.
//!
//! This module provides the facade application repositories compose against.
//! A context owns a shared backend handle and an index-override table; every
//! operation resolves its target index, issues one backend call (one per item
//! for the batch operations), and folds the outcome into a `ContextResponse`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use search_context_shared::{AliasAction, ReindexRequest, SearchRequest};

use crate::errors::SearchContextError;
use crate::index_name::{IndexOverrides, Operation};
use crate::interfaces::SearchBackend;
use crate::response::ContextResponse;
use crate::utils;

/// Facade over a search backend for one logical domain.
///
/// Contexts are cheap to clone and safe to share across tasks: the backend is
/// held behind an `Arc` and the override table is immutable.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use search_context_repository::{
///     ConnectionConfig, IndexOverrides, OpenSearchBackend, SearchContext,
/// };
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Product {
///     id: String,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = Arc::new(OpenSearchBackend::new(&ConnectionConfig::default())?);
/// let context = SearchContext::new("products", backend)
///     .with_overrides(IndexOverrides::all("products"));
///
/// let product = Product { id: "1".to_string(), name: "PS5 slim".to_string() };
/// let response = context.index_document("anything", &product).await;
/// assert!(response.is_success());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SearchContext {
    name: String,
    backend: Arc<dyn SearchBackend>,
    overrides: IndexOverrides,
}

impl SearchContext {
    /// Create a context with no index overrides.
    pub fn new(name: impl Into<String>, backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            name: name.into(),
            backend,
            overrides: IndexOverrides::default(),
        }
    }

    /// Replace the index-override table.
    pub fn with_overrides(mut self, overrides: IndexOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// The name this context was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn overrides(&self) -> &IndexOverrides {
        &self.overrides
    }

    /// The shared backend handle.
    pub fn backend(&self) -> &Arc<dyn SearchBackend> {
        &self.backend
    }

    /// Resolve the index `operation` targets for a caller-supplied name.
    pub fn resolve_index(&self, operation: Operation, supplied: &str) -> String {
        let resolved = self.overrides.resolve(operation, supplied);
        debug!(
            context = %self.name,
            operation = %operation,
            supplied = %supplied,
            resolved = %resolved,
            "Resolved index name"
        );
        resolved
    }

    /// Create an index.
    #[instrument(skip(self), fields(context = %self.name))]
    pub async fn create_index(&self, index_name: &str) -> ContextResponse {
        let index = self.resolve_index(Operation::CreateIndex, index_name);
        self.backend.create_index(&index).await.into()
    }

    /// Delete an index.
    #[instrument(skip(self), fields(context = %self.name))]
    pub async fn delete_index(&self, index_name: &str) -> ContextResponse {
        let index = self.resolve_index(Operation::DeleteIndex, index_name);
        self.backend.delete_index(&index).await.into()
    }

    /// Succeeds when the index exists.
    ///
    /// A missing index is a failure with a message naming the index; transport
    /// and server errors are failures carrying the error.
    #[instrument(skip(self), fields(context = %self.name))]
    pub async fn index_exists(&self, index_name: &str) -> ContextResponse {
        let index = self.resolve_index(Operation::IndexExists, index_name);
        match self.backend.index_exists(&index).await {
            Ok(true) => ContextResponse::ok(()),
            Ok(false) => ContextResponse::fail_message(format!("index '{}' does not exist", index)),
            Err(e) => ContextResponse::fail(e),
        }
    }

    /// Refresh an index so recent writes become searchable.
    #[instrument(skip(self), fields(context = %self.name))]
    pub async fn refresh_index(&self, index_name: &str) -> ContextResponse {
        let index = self.resolve_index(Operation::RefreshIndex, index_name);
        self.backend.refresh_index(&index).await.into()
    }

    /// Index a document.
    ///
    /// The document ID is taken from its `id` field when present; otherwise
    /// the search engine assigns one.
    #[instrument(skip(self, document), fields(context = %self.name))]
    pub async fn index_document<T>(&self, index_name: &str, document: &T) -> ContextResponse
    where
        T: Serialize + Sync + ?Sized,
    {
        let index = self.resolve_index(Operation::IndexDocument, index_name);
        self.index_one(&index, document).await.into()
    }

    /// Fetch a document by ID.
    ///
    /// A missing document, or a missing index, is a
    /// [`ContextResponse::not_found`] failure.
    #[instrument(skip(self), fields(context = %self.name))]
    pub async fn get_document<T>(&self, index_name: &str, id: &str) -> ContextResponse<T>
    where
        T: DeserializeOwned,
    {
        let index = self.resolve_index(Operation::GetDocument, index_name);
        match self.backend.get_document(&index, id).await {
            Ok(Some(source)) => match serde_json::from_value::<T>(source) {
                Ok(document) => ContextResponse::ok(document),
                Err(e) => ContextResponse::fail(SearchContextError::parse(e.to_string())),
            },
            Ok(None) => ContextResponse::not_found(),
            Err(e) if e.is_not_found() => ContextResponse::not_found(),
            Err(e) => ContextResponse::fail(e),
        }
    }

    /// Delete a document by ID.
    #[instrument(skip(self), fields(context = %self.name))]
    pub async fn delete_document(&self, index_name: &str, id: &str) -> ContextResponse {
        let index = self.resolve_index(Operation::DeleteDocument, index_name);
        self.backend.delete_document(&index, id).await.into()
    }

    /// Merge a partial document into an existing one.
    #[instrument(skip(self, partial), fields(context = %self.name))]
    pub async fn update_document<P>(&self, index_name: &str, id: &str, partial: &P) -> ContextResponse
    where
        P: Serialize + Sync + ?Sized,
    {
        let index = self.resolve_index(Operation::UpdateDocument, index_name);
        let partial = match utils::to_document(partial) {
            Ok(partial) => partial,
            Err(e) => return ContextResponse::fail(e),
        };
        self.backend.update_document(&index, id, partial).await.into()
    }

    /// Search an index and return the matched documents in hit order.
    ///
    /// Unlike the other operations the documents are returned unwrapped; a
    /// failed query, or a hit that doesn't deserialize into `T`, is an `Err`.
    #[instrument(skip(self, request), fields(context = %self.name))]
    pub async fn search<T>(
        &self,
        index_name: &str,
        request: &SearchRequest,
    ) -> Result<Vec<T>, SearchContextError>
    where
        T: DeserializeOwned,
    {
        let index = self.resolve_index(Operation::Search, index_name);
        let sources = self.backend.search(&index, request).await?;
        sources
            .into_iter()
            .map(|source| {
                serde_json::from_value::<T>(source).map_err(|e| SearchContextError::parse(e.to_string()))
            })
            .collect()
    }

    /// Index a batch of documents, one request per document.
    ///
    /// Every document is attempted. The response fails if any document failed,
    /// naming each failed item; documents indexed before a failure stay indexed.
    #[instrument(skip(self, documents), fields(context = %self.name, count = documents.len()))]
    pub async fn bulk_index<T>(&self, index_name: &str, documents: &[T]) -> ContextResponse
    where
        T: Serialize + Sync,
    {
        let index = self.resolve_index(Operation::BulkIndex, index_name);
        self.index_batch(&index, documents).await
    }

    /// Index a range of documents, one request per document.
    ///
    /// Same semantics as [`SearchContext::bulk_index`]; resolved through the
    /// `IndexRange` override.
    #[instrument(skip(self, documents), fields(context = %self.name, count = documents.len()))]
    pub async fn index_range<T>(&self, index_name: &str, documents: &[T]) -> ContextResponse
    where
        T: Serialize + Sync,
    {
        let index = self.resolve_index(Operation::IndexRange, index_name);
        self.index_batch(&index, documents).await
    }

    /// Delete a range of documents by ID, one request per ID.
    #[instrument(skip(self, ids), fields(context = %self.name, count = ids.len()))]
    pub async fn delete_range<S>(&self, index_name: &str, ids: &[S]) -> ContextResponse
    where
        S: AsRef<str> + Sync,
    {
        let index = self.resolve_index(Operation::DeleteRange, index_name);

        let mut failures = Vec::new();
        for (position, id) in ids.iter().enumerate() {
            let id = id.as_ref();
            if let Err(e) = self.backend.delete_document(&index, id).await {
                failures.push(format!("item {} ({}): {}", position, id, e));
            }
        }

        Self::batch_response(ids.len(), failures)
    }

    /// Copy documents from one index into another.
    ///
    /// The destination resolves through the `Reindex` override; the source
    /// index is only lower-cased.
    #[instrument(skip(self), fields(context = %self.name))]
    pub async fn reindex(&self, request: &ReindexRequest) -> ContextResponse {
        let mut request = request.clone();
        request.source_index = request.source_index.to_lowercase();
        request.dest_index = self.resolve_index(Operation::Reindex, &request.dest_index);
        self.backend.reindex(&request).await.into()
    }

    /// Point an alias at an index.
    #[instrument(skip(self), fields(context = %self.name))]
    pub async fn add_alias(&self, alias: &str, index_name: &str) -> ContextResponse {
        let index = self.resolve_index(Operation::AddAlias, index_name);
        self.backend
            .update_aliases(&[AliasAction::add(alias.to_lowercase(), index)])
            .await
            .into()
    }

    /// Detach an alias from an index.
    #[instrument(skip(self), fields(context = %self.name))]
    pub async fn remove_alias(&self, alias: &str, index_name: &str) -> ContextResponse {
        let index = self.resolve_index(Operation::RemoveAlias, index_name);
        self.backend
            .update_aliases(&[AliasAction::remove(alias.to_lowercase(), index)])
            .await
            .into()
    }

    async fn index_one<T>(&self, index: &str, document: &T) -> Result<(), SearchContextError>
    where
        T: Serialize + Sync + ?Sized,
    {
        let document = utils::to_document(document)?;
        let id = utils::document_id(&document);
        self.backend
            .index_document(index, id.as_deref(), document)
            .await
    }

    async fn index_batch<T>(&self, index: &str, documents: &[T]) -> ContextResponse
    where
        T: Serialize + Sync,
    {
        let mut failures = Vec::new();
        for (position, document) in documents.iter().enumerate() {
            if let Err(e) = self.index_one(index, document).await {
                let label = utils::to_document(document)
                    .ok()
                    .and_then(|value| utils::document_id(&value))
                    .unwrap_or_else(|| "no id".to_string());
                failures.push(format!("item {} ({}): {}", position, label, e));
            }
        }

        Self::batch_response(documents.len(), failures)
    }

    fn batch_response(total: usize, failures: Vec<String>) -> ContextResponse {
        if failures.is_empty() {
            return ContextResponse::ok(());
        }
        warn!(total, failed = failures.len(), "Batch operation had failures");
        ContextResponse::fail(SearchContextError::bulk_operation(total, &failures))
    }
}

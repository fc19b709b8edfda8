//! OpenSearch backend implementation.
//!
//! This module provides the concrete implementation of `SearchBackend`
//! using the OpenSearch Rust crate. The same wire protocol is spoken by
//! Elasticsearch 7.x clusters.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    http::{
        headers::{HeaderValue, AUTHORIZATION},
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesRefreshParts},
    DeleteParts, GetParts, IndexParts, OpenSearch, SearchParts, UpdateParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use search_context_shared::{AliasAction, ReindexRequest, SearchRequest};

use crate::config::{AuthMethod, ConnectionConfig};
use crate::errors::SearchContextError;
use crate::interfaces::SearchBackend;

/// OpenSearch backend implementation.
///
/// Holds a single `OpenSearch` client. The client is cheap to share and safe
/// for concurrent use, so one backend normally serves every context of a
/// registry.
///
/// # Example
///
/// ```ignore
/// use search_context_repository::{ConnectionConfig, OpenSearchBackend};
///
/// let config = ConnectionConfig::new("http://localhost", 9200)
///     .with_basic_auth("admin", "admin");
/// let backend = OpenSearchBackend::new(&config)?;
/// backend.create_index("products").await?;
/// ```
pub struct OpenSearchBackend {
    client: OpenSearch,
}

impl OpenSearchBackend {
    /// Create a backend for the configured endpoint and credentials.
    ///
    /// No request is sent; use [`SearchBackend::ping`] to check connectivity.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchBackend)` - A new backend instance
    /// * `Err(SearchContextError::ConfigError)` - If the configuration is invalid
    /// * `Err(SearchContextError::ConnectionError)` - If the transport cannot be built
    pub fn new(config: &ConnectionConfig) -> Result<Self, SearchContextError> {
        let endpoint = config.endpoint()?;
        let auth = config.auth_method()?;

        let conn_pool = SingleNodeConnectionPool::new(endpoint.clone());
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();

        let auth_kind = match auth {
            AuthMethod::Anonymous => "anonymous",
            AuthMethod::Basic { username, password } => {
                builder = builder.auth(Credentials::Basic(username, password));
                "basic"
            }
            AuthMethod::ApiKey(key) => {
                builder = match key.split_once(':') {
                    Some((id, secret)) => {
                        builder.auth(Credentials::ApiKey(id.to_string(), secret.to_string()))
                    }
                    None => {
                        let value = HeaderValue::from_str(&format!("ApiKey {}", key))
                            .map_err(|e| SearchContextError::config(format!("Invalid api_key: {}", e)))?;
                        builder.header(AUTHORIZATION, value)
                    }
                };
                "api_key"
            }
        };

        let transport = builder
            .build()
            .map_err(|e| SearchContextError::connection(e.to_string()))?;

        info!(
            endpoint = %endpoint,
            auth = auth_kind,
            "Created OpenSearch backend"
        );

        Ok(Self::from_client(OpenSearch::new(transport)))
    }

    /// Wrap an already configured client.
    pub fn from_client(client: OpenSearch) -> Self {
        Self { client }
    }

    /// Turn a non-success response into an error carrying the server's reason.
    async fn failure(response: Response, operation: &str) -> SearchContextError {
        let status = response.status_code();
        let body = response.text().await.unwrap_or_default();
        let reason = server_reason(&body);
        error!(
            operation,
            status = %status,
            reason = %reason,
            "Search request failed"
        );
        SearchContextError::server(status.as_u16(), reason)
    }

    /// Fail with the server's reason unless the response status is 2xx.
    async fn expect_success(
        response: Response,
        operation: &str,
    ) -> Result<(), SearchContextError> {
        if response.status_code().is_success() {
            Ok(())
        } else {
            Err(Self::failure(response, operation).await)
        }
    }

    async fn read_json(response: Response) -> Result<Value, SearchContextError> {
        response
            .json::<Value>()
            .await
            .map_err(|e| SearchContextError::parse(e.to_string()))
    }
}

/// Extract the human-readable reason from an error response body.
///
/// Prefers `error.reason`, then a string `error`, then the raw body.
fn server_reason(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let reason = parsed.as_ref().and_then(|value| {
        value["error"]["reason"]
            .as_str()
            .or_else(|| value["error"].as_str())
            .map(str::to_string)
    });
    match reason {
        Some(reason) => reason,
        None if body.is_empty() => "no response body".to_string(),
        None => body.to_string(),
    }
}

/// Collect the `_source` of every hit in a search response.
///
/// A hit without `_source` (e.g. `_source` disabled in the mapping) is a
/// `ParseError` rather than a silently shorter result.
fn hit_sources(body: &Value) -> Result<Vec<Value>, SearchContextError> {
    let hits = body["hits"]["hits"]
        .as_array()
        .ok_or_else(|| SearchContextError::parse("search response has no hits array"))?;
    hits.iter()
        .map(|hit| {
            hit.get("_source").cloned().ok_or_else(|| {
                SearchContextError::parse(format!(
                    "search hit '{}' has no _source",
                    hit["_id"].as_str().unwrap_or("?")
                ))
            })
        })
        .collect()
}

/// Map an index-exists status code. `None` for anything but 200/404.
fn exists_from_status(status: u16) -> Option<bool> {
    match status {
        200 => Some(true),
        404 => Some(false),
        _ => None,
    }
}

/// Interpret the body of a 404 get.
///
/// `"found": false` is a missing document; any other 404 is a missing index.
fn classify_get_404(body: &Value, index: &str) -> Result<Option<Value>, SearchContextError> {
    if body["found"] == Value::Bool(false) {
        Ok(None)
    } else {
        Err(SearchContextError::index_not_found(index))
    }
}

/// The `_source` of a successful get, `None` unless `"found": true`.
fn found_source(body: &Value) -> Option<Value> {
    if body["found"] != Value::Bool(true) {
        return None;
    }
    body.get("_source").cloned()
}

/// Interpret the body of a 404 delete.
fn classify_delete_404(body: &Value, index: &str, id: &str) -> SearchContextError {
    if body["result"] == "not_found" {
        SearchContextError::document_not_found(index, id)
    } else {
        SearchContextError::index_not_found(index)
    }
}

/// Per-document failures reported inside a 200 `_reindex` response.
fn reindex_failures(body: &Value) -> Option<SearchContextError> {
    let failures = body["failures"].as_array().filter(|f| !f.is_empty())?;
    let details: Vec<String> = failures
        .iter()
        .map(|f| {
            f["cause"]["reason"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| f.to_string())
        })
        .collect();
    let total = body["total"].as_u64().unwrap_or(failures.len() as u64) as usize;
    Some(SearchContextError::bulk_operation(total, &details))
}

#[async_trait]
impl SearchBackend for OpenSearchBackend {
    async fn ping(&self) -> Result<(), SearchContextError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchContextError::connection(e.to_string()))?;
        Self::expect_success(response, "ping").await
    }

    async fn create_index(&self, index: &str) -> Result<(), SearchContextError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .send()
            .await
            .map_err(|e| SearchContextError::connection(e.to_string()))?;
        Self::expect_success(response, "create_index").await?;

        info!(index = %index, "Index created");
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchContextError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchContextError::connection(e.to_string()))?;

        if response.status_code().as_u16() == 404 {
            return Err(SearchContextError::index_not_found(index));
        }
        Self::expect_success(response, "delete_index").await?;

        info!(index = %index, "Index deleted");
        Ok(())
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchContextError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchContextError::connection(e.to_string()))?;

        match exists_from_status(response.status_code().as_u16()) {
            Some(exists) => Ok(exists),
            None => Err(Self::failure(response, "index_exists").await),
        }
    }

    async fn refresh_index(&self, index: &str) -> Result<(), SearchContextError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchContextError::connection(e.to_string()))?;

        if response.status_code().as_u16() == 404 {
            return Err(SearchContextError::index_not_found(index));
        }
        Self::expect_success(response, "refresh_index").await
    }

    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        document: Value,
    ) -> Result<(), SearchContextError> {
        let parts = match id {
            Some(id) => IndexParts::IndexId(index, id),
            None => IndexParts::Index(index),
        };

        let response = self
            .client
            .index(parts)
            .body(document)
            .send()
            .await
            .map_err(|e| SearchContextError::connection(e.to_string()))?;
        Self::expect_success(response, "index_document").await?;

        debug!(index = %index, id = ?id, "Document indexed");
        Ok(())
    }

    async fn get_document(
        &self,
        index: &str,
        id: &str,
    ) -> Result<Option<Value>, SearchContextError> {
        let response = self
            .client
            .get(GetParts::IndexId(index, id))
            .send()
            .await
            .map_err(|e| SearchContextError::connection(e.to_string()))?;

        let status = response.status_code();
        if status.as_u16() == 404 {
            // A 404 either means a missing document ("found": false) or a missing index
            let body = Self::read_json(response).await?;
            return classify_get_404(&body, index);
        }
        if !status.is_success() {
            return Err(Self::failure(response, "get_document").await);
        }

        let body = Self::read_json(response).await?;
        Ok(found_source(&body))
    }

    async fn delete_document(&self, index: &str, id: &str) -> Result<(), SearchContextError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(index, id))
            .send()
            .await
            .map_err(|e| SearchContextError::connection(e.to_string()))?;

        if response.status_code().as_u16() == 404 {
            let body = Self::read_json(response).await?;
            return Err(classify_delete_404(&body, index, id));
        }
        Self::expect_success(response, "delete_document").await?;

        debug!(index = %index, id = %id, "Document deleted");
        Ok(())
    }

    async fn update_document(
        &self,
        index: &str,
        id: &str,
        partial: Value,
    ) -> Result<(), SearchContextError> {
        let response = self
            .client
            .update(UpdateParts::IndexId(index, id))
            .body(json!({ "doc": partial }))
            .send()
            .await
            .map_err(|e| SearchContextError::connection(e.to_string()))?;
        Self::expect_success(response, "update_document").await?;

        debug!(index = %index, id = %id, "Document updated");
        Ok(())
    }

    async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<Vec<Value>, SearchContextError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(request.to_body())
            .send()
            .await
            .map_err(|e| SearchContextError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Err(Self::failure(response, "search").await);
        }

        let body = Self::read_json(response).await?;
        let documents = hit_sources(&body)?;

        debug!(index = %index, hits = documents.len(), "Search completed");
        Ok(documents)
    }

    async fn reindex(&self, request: &ReindexRequest) -> Result<(), SearchContextError> {
        let response = self
            .client
            .reindex()
            .body(request.to_body())
            .send()
            .await
            .map_err(|e| SearchContextError::connection(e.to_string()))?;

        if !response.status_code().is_success() {
            return Err(Self::failure(response, "reindex").await);
        }

        // Per-document failures come back with a 200 status
        let body = Self::read_json(response).await?;
        if let Some(error) = reindex_failures(&body) {
            return Err(error);
        }

        info!(
            source = %request.source_index,
            dest = %request.dest_index,
            "Reindex completed"
        );
        Ok(())
    }

    async fn update_aliases(&self, actions: &[AliasAction]) -> Result<(), SearchContextError> {
        let response = self
            .client
            .indices()
            .update_aliases()
            .body(AliasAction::to_body(actions))
            .send()
            .await
            .map_err(|e| SearchContextError::connection(e.to_string()))?;
        Self::expect_success(response, "update_aliases").await?;

        debug!(actions = actions.len(), "Aliases updated");
        Ok(())
    }
}

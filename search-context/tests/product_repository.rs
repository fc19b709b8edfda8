//! Integration tests for the product catalog.
//!
//! The catalog is wired exactly as the binary wires it, with the OpenSearch
//! backend swapped for an in-memory one.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use search_context::catalog::{run_demo, sample_products, PRODUCTS_CONTEXT, PRODUCTS_INDEX};
use search_context::{AppError, CatalogError, ConnectionMode, Dependencies, Product, Settings};
use search_context_repository::{
    AliasAction, ReindexRequest, SearchBackend, SearchContextError, SearchRequest,
};

// In-memory backend for testing
#[derive(Default)]
struct InMemoryBackend {
    indices: Mutex<HashMap<String, HashMap<String, Value>>>,
    failed_pings: Mutex<u32>,
    pings: Mutex<u32>,
}

impl InMemoryBackend {
    fn unreachable_for(pings: u32) -> Self {
        Self {
            failed_pings: Mutex::new(pings),
            ..Default::default()
        }
    }

    fn field<'a>(doc: &'a Value, field: &str) -> Option<&'a Value> {
        doc.get(field.trim_end_matches(".keyword"))
    }

    fn matches(query: &Value, doc: &Value) -> bool {
        if let Some(fields) = query.get("term").and_then(Value::as_object) {
            return fields
                .iter()
                .all(|(field, expected)| Self::field(doc, field) == Some(expected));
        }
        if let Some(fields) = query.get("range").and_then(Value::as_object) {
            return fields.iter().all(|(field, bounds)| {
                let Some(value) = Self::field(doc, field).and_then(Value::as_f64) else {
                    return false;
                };
                bounds["gte"].as_f64().map_or(true, |gte| value >= gte)
                    && bounds["lte"].as_f64().map_or(true, |lte| value <= lte)
            });
        }
        query.get("match_all").is_some()
    }
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    async fn ping(&self) -> Result<(), SearchContextError> {
        *self.pings.lock().await += 1;
        let mut remaining = self.failed_pings.lock().await;
        if *remaining > 0 {
            *remaining -= 1;
            return Err(SearchContextError::connection("connection refused"));
        }
        Ok(())
    }

    async fn create_index(&self, index: &str) -> Result<(), SearchContextError> {
        let mut indices = self.indices.lock().await;
        if indices.contains_key(index) {
            return Err(SearchContextError::server(
                400,
                format!("index [{}] already exists", index),
            ));
        }
        indices.insert(index.to_string(), HashMap::new());
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchContextError> {
        self.indices
            .lock()
            .await
            .remove(index)
            .map(|_| ())
            .ok_or_else(|| SearchContextError::index_not_found(index))
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchContextError> {
        Ok(self.indices.lock().await.contains_key(index))
    }

    async fn refresh_index(&self, index: &str) -> Result<(), SearchContextError> {
        if self.indices.lock().await.contains_key(index) {
            Ok(())
        } else {
            Err(SearchContextError::index_not_found(index))
        }
    }

    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        document: Value,
    ) -> Result<(), SearchContextError> {
        let id = id.ok_or_else(|| SearchContextError::server(400, "missing id"))?;
        self.indices
            .lock()
            .await
            .entry(index.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    async fn get_document(
        &self,
        index: &str,
        id: &str,
    ) -> Result<Option<Value>, SearchContextError> {
        let indices = self.indices.lock().await;
        let docs = indices
            .get(index)
            .ok_or_else(|| SearchContextError::index_not_found(index))?;
        Ok(docs.get(id).cloned())
    }

    async fn delete_document(&self, index: &str, id: &str) -> Result<(), SearchContextError> {
        self.indices
            .lock()
            .await
            .get_mut(index)
            .and_then(|docs| docs.remove(id))
            .map(|_| ())
            .ok_or_else(|| SearchContextError::document_not_found(index, id))
    }

    async fn update_document(
        &self,
        index: &str,
        id: &str,
        partial: Value,
    ) -> Result<(), SearchContextError> {
        let mut indices = self.indices.lock().await;
        let doc = indices
            .get_mut(index)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| SearchContextError::document_not_found(index, id))?;
        if let (Some(doc), Some(partial)) = (doc.as_object_mut(), partial.as_object()) {
            for (field, value) in partial {
                doc.insert(field.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<Vec<Value>, SearchContextError> {
        let indices = self.indices.lock().await;
        let docs = indices
            .get(index)
            .ok_or_else(|| SearchContextError::index_not_found(index))?;
        let mut hits: Vec<Value> = docs
            .values()
            .filter(|doc| Self::matches(&request.query, doc))
            .cloned()
            .collect();
        hits.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));
        Ok(hits)
    }

    async fn reindex(&self, _request: &ReindexRequest) -> Result<(), SearchContextError> {
        Ok(())
    }

    async fn update_aliases(&self, _actions: &[AliasAction]) -> Result<(), SearchContextError> {
        Ok(())
    }
}

fn wire(backend: Arc<InMemoryBackend>) -> Dependencies {
    Dependencies::build(&Settings::default(), backend).unwrap()
}

fn names(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test]
async fn test_build_registers_products_context() {
    let deps = wire(Arc::new(InMemoryBackend::default()));

    assert_eq!(deps.registry.names(), vec![PRODUCTS_CONTEXT]);
    assert_eq!(deps.products.context().name(), PRODUCTS_CONTEXT);
}

#[tokio::test]
async fn test_build_rejects_unknown_context() {
    let mut settings = Settings::default();
    settings.connection.contexts = vec!["orders".to_string()];

    let result = Dependencies::build(&settings, Arc::new(InMemoryBackend::default()));

    assert!(matches!(
        result,
        Err(AppError::SearchError(SearchContextError::ConfigError(_)))
    ));
}

#[tokio::test]
async fn test_ensure_index_is_idempotent() {
    let backend = Arc::new(InMemoryBackend::default());
    let deps = wire(backend.clone());

    deps.products.ensure_index().await.unwrap();
    deps.products.ensure_index().await.unwrap();

    assert!(backend.indices.lock().await.contains_key(PRODUCTS_INDEX));
}

#[tokio::test]
async fn test_insert_find_update_remove() {
    let deps = wire(Arc::new(InMemoryBackend::default()));
    let repo = &deps.products;
    repo.ensure_index().await.unwrap();

    let product = Product::new("PS5 slim 1TR", 1000.0, "Game Console").with_id("ps5");
    repo.insert(&product).await.unwrap();
    assert_eq!(repo.find("ps5").await.unwrap(), Some(product.clone()));

    repo.update_price("ps5", 2500.0).await.unwrap();
    let updated = repo.find("ps5").await.unwrap().unwrap();
    assert_eq!(updated.price, 2500.0);
    assert_eq!(updated.name, product.name);

    repo.remove("ps5").await.unwrap();
    assert_eq!(repo.find("ps5").await.unwrap(), None);

    let err = repo.remove("ps5").await.unwrap_err();
    assert!(matches!(
        err,
        CatalogError::SearchError(SearchContextError::DocumentNotFound { .. })
    ));
}

#[tokio::test]
async fn test_insert_many_validates_before_writing() {
    let backend = Arc::new(InMemoryBackend::default());
    let deps = wire(backend.clone());
    deps.products.ensure_index().await.unwrap();

    let mut batch = sample_products();
    batch[3].price = -5.0;

    let err = deps.products.insert_many(&batch).await.unwrap_err();
    assert!(matches!(err, CatalogError::ValidationError(_)));
    assert!(backend.indices.lock().await[PRODUCTS_INDEX].is_empty());
}

#[tokio::test]
async fn test_category_and_price_range_searches() {
    let deps = wire(Arc::new(InMemoryBackend::default()));
    let repo = &deps.products;
    repo.ensure_index().await.unwrap();
    repo.insert_many(&sample_products()).await.unwrap();
    repo.refresh().await.unwrap();

    let category_a = repo.search_by_category("Category A").await.unwrap();
    assert_eq!(
        names(&category_a),
        vec!["Product 1", "Product 2", "Product 4", "Product 7"]
    );

    let category_b = repo.search_by_category("Category B").await.unwrap();
    assert_eq!(names(&category_b), vec!["Product 3", "Product 5", "Product 6"]);

    let in_range = repo.search_by_price_range(10.0, 20.0).await.unwrap();
    assert_eq!(
        names(&in_range),
        vec!["Product 1", "Product 2", "Product 3", "Product 7"]
    );

    assert!(repo.search_by_category("Category C").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_price_range_rejects_inverted_bounds() {
    let deps = wire(Arc::new(InMemoryBackend::default()));

    let err = deps.products.search_by_price_range(20.0, 10.0).await.unwrap_err();

    assert!(matches!(err, CatalogError::ValidationError(_)));
}

#[tokio::test]
async fn test_search_before_index_exists_fails() {
    let deps = wire(Arc::new(InMemoryBackend::default()));

    let err = deps.products.search_by_category("Category A").await.unwrap_err();

    assert_eq!(
        err,
        CatalogError::SearchError(SearchContextError::index_not_found(PRODUCTS_INDEX))
    );
}

#[tokio::test]
async fn test_run_demo_seeds_catalog() {
    let backend = Arc::new(InMemoryBackend::default());
    let deps = wire(backend.clone());

    run_demo(&deps.products).await.unwrap();

    assert_eq!(backend.indices.lock().await[PRODUCTS_INDEX].len(), 7);
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_cluster_retries_until_reachable() {
    let backend = InMemoryBackend::unreachable_for(3);

    Dependencies::wait_for_cluster(&backend, ConnectionMode::Retry, Duration::from_secs(15))
        .await
        .unwrap();

    assert_eq!(*backend.pings.lock().await, 4);
}

#[tokio::test]
async fn test_wait_for_cluster_fail_fast() {
    let backend = InMemoryBackend::unreachable_for(1);

    let result =
        Dependencies::wait_for_cluster(&backend, ConnectionMode::FailFast, Duration::from_secs(15))
            .await;

    assert!(matches!(result, Err(AppError::ConfigError(_))));
    assert_eq!(*backend.pings.lock().await, 1);
}

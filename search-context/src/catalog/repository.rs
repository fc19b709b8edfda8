//! Product repository.
//!
//! Thin domain layer over the `products` search context. Every operation the
//! repository issues is routed to the `products` index by the context's
//! override table, whatever index name is passed in.

use std::sync::Arc;

use search_context_repository::{ContextResponse, IndexOverrides, SearchContext, SearchRequest};
use tracing::{debug, info, instrument};

use crate::catalog::Product;
use crate::errors::CatalogError;

/// Name the products context is registered under.
pub const PRODUCTS_CONTEXT: &str = "products";

/// Index every products-context operation is routed to.
pub const PRODUCTS_INDEX: &str = "products";

/// Upper bound on hits returned by the catalog searches.
const MAX_RESULTS: usize = 100;

/// Repository for product documents.
#[derive(Clone)]
pub struct ProductRepository {
    context: Arc<SearchContext>,
}

impl ProductRepository {
    pub fn new(context: Arc<SearchContext>) -> Self {
        Self { context }
    }

    /// Overrides the products context is registered with.
    pub fn overrides() -> IndexOverrides {
        IndexOverrides::all(PRODUCTS_INDEX)
    }

    pub fn context(&self) -> &Arc<SearchContext> {
        &self.context
    }

    /// Create the products index unless it already exists.
    #[instrument(skip(self))]
    pub async fn ensure_index(&self) -> Result<(), CatalogError> {
        let exists = self.context.index_exists(PRODUCTS_INDEX).await;
        if exists.is_success() {
            debug!(index = PRODUCTS_INDEX, "Index already exists");
            return Ok(());
        }
        if let Some(error) = exists.error() {
            return Err(error.clone().into());
        }

        into_catalog(self.context.create_index(PRODUCTS_INDEX).await)?;
        info!(index = PRODUCTS_INDEX, "Index created");
        Ok(())
    }

    /// Index one product.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn insert(&self, product: &Product) -> Result<(), CatalogError> {
        validate(product)?;
        into_catalog(self.context.index_document(PRODUCTS_INDEX, product).await)
    }

    /// Index a batch of products.
    ///
    /// Validation runs over the whole batch before anything is written.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn insert_many(&self, products: &[Product]) -> Result<(), CatalogError> {
        for product in products {
            validate(product)?;
        }
        into_catalog(self.context.bulk_index(PRODUCTS_INDEX, products).await)
    }

    /// Fetch a product by ID. `Ok(None)` when no such product exists.
    #[instrument(skip(self))]
    pub async fn find(&self, id: &str) -> Result<Option<Product>, CatalogError> {
        let response = self.context.get_document::<Product>(PRODUCTS_INDEX, id).await;
        if response.is_not_found() {
            return Ok(None);
        }
        into_catalog(response).map(Some)
    }

    /// Change the price of an existing product.
    #[instrument(skip(self))]
    pub async fn update_price(&self, id: &str, price: f64) -> Result<(), CatalogError> {
        validate_price(price)?;
        let partial = serde_json::json!({ "price": price });
        into_catalog(self.context.update_document(PRODUCTS_INDEX, id, &partial).await)
    }

    /// Delete a product by ID.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<(), CatalogError> {
        into_catalog(self.context.delete_document(PRODUCTS_INDEX, id).await)
    }

    /// Make recent writes visible to searches.
    pub async fn refresh(&self) -> Result<(), CatalogError> {
        into_catalog(self.context.refresh_index(PRODUCTS_INDEX).await)
    }

    /// Products whose category is exactly `category`.
    #[instrument(skip(self))]
    pub async fn search_by_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        let request = SearchRequest::term("category.keyword", category).with_size(MAX_RESULTS);
        let products = self.context.search(PRODUCTS_INDEX, &request).await?;
        debug!(hits = products.len(), "Category search finished");
        Ok(products)
    }

    /// Products priced between `min` and `max`, both inclusive.
    #[instrument(skip(self))]
    pub async fn search_by_price_range(
        &self,
        min: f64,
        max: f64,
    ) -> Result<Vec<Product>, CatalogError> {
        validate_price(min)?;
        validate_price(max)?;
        if min > max {
            return Err(CatalogError::validation(format!(
                "minimum price {} is above maximum price {}",
                min, max
            )));
        }

        let request = SearchRequest::range("price", Some(min), Some(max)).with_size(MAX_RESULTS);
        let products = self.context.search(PRODUCTS_INDEX, &request).await?;
        debug!(hits = products.len(), "Price range search finished");
        Ok(products)
    }
}

fn validate(product: &Product) -> Result<(), CatalogError> {
    if product.id.trim().is_empty() {
        return Err(CatalogError::validation("product id must not be empty"));
    }
    if product.name.trim().is_empty() {
        return Err(CatalogError::validation(format!(
            "product '{}' has an empty name",
            product.id
        )));
    }
    validate_price(product.price)
}

fn validate_price(price: f64) -> Result<(), CatalogError> {
    if !price.is_finite() || price < 0.0 {
        return Err(CatalogError::validation(format!("invalid price {}", price)));
    }
    Ok(())
}

/// Failures without error detail surface as `Rejected` with the response message.
fn into_catalog<T>(response: ContextResponse<T>) -> Result<T, CatalogError> {
    if response.is_success() {
        return response.into_result().map_err(CatalogError::from);
    }
    match response.error() {
        Some(error) => Err(error.clone().into()),
        None => Err(CatalogError::rejected(response.message())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_bad_products() {
        let product = Product::new("Product 1", 10.0, "Category A");
        assert!(validate(&product).is_ok());

        let empty_id = product.clone().with_id("  ");
        assert!(matches!(validate(&empty_id), Err(CatalogError::ValidationError(_))));

        let mut no_name = product.clone();
        no_name.name = String::new();
        assert!(validate(&no_name).is_err());

        let mut negative = product;
        negative.price = -1.0;
        assert!(validate(&negative).is_err());
    }

    #[test]
    fn test_validate_price_rejects_nan() {
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
        assert!(validate_price(0.0).is_ok());
    }

    #[test]
    fn test_into_catalog() {
        let ok: ContextResponse<u32> = ContextResponse::ok(7);
        assert_eq!(into_catalog(ok), Ok(7));

        let rejected: ContextResponse<u32> = ContextResponse::fail_message("nope");
        assert_eq!(
            into_catalog(rejected),
            Err(CatalogError::rejected("Operation failed Message:nope"))
        );

        let error = search_context_repository::SearchContextError::connection("refused");
        let failed: ContextResponse<u32> = ContextResponse::fail(error.clone());
        assert_eq!(into_catalog(failed), Err(CatalogError::SearchError(error)));
    }

    #[test]
    fn test_overrides_route_everything_to_products() {
        let overrides = ProductRepository::overrides();
        for operation in search_context_repository::Operation::ALL {
            assert_eq!(overrides.get(operation), Some(PRODUCTS_INDEX));
        }
    }
}

//! Sample catalog run: seed the products index and query it.

use tracing::info;

use crate::catalog::{Product, ProductRepository};
use crate::errors::CatalogError;

/// Seven sample products across two categories.
pub fn sample_products() -> Vec<Product> {
    vec![
        Product::new("Product 1", 10.0, "Category A"),
        Product::new("Product 2", 11.0, "Category A"),
        Product::new("Product 3", 12.0, "Category B"),
        Product::new("Product 4", 100.0, "Category A"),
        Product::new("Product 5", 101.0, "Category B"),
        Product::new("Product 6", 20.1, "Category B"),
        Product::new("Product 7", 15.0, "Category A"),
    ]
}

/// Index the sample products, then log category and price-range searches.
pub async fn run_demo(products: &ProductRepository) -> Result<(), CatalogError> {
    products.ensure_index().await?;

    let samples = sample_products();
    products.insert_many(&samples).await?;
    products.refresh().await?;
    info!(count = samples.len(), "Sample products indexed");

    for category in ["Category A", "Category B"] {
        let found = products.search_by_category(category).await?;
        info!(category, hits = found.len(), "Products in category");
        for product in &found {
            info!(name = %product.name, price = product.price, "  hit");
        }
    }

    let in_range = products.search_by_price_range(10.0, 20.0).await?;
    info!(min = 10.0, max = 20.0, hits = in_range.len(), "Products in price range");
    for product in &in_range {
        info!(name = %product.name, price = product.price, "  hit");
    }

    Ok(())
}

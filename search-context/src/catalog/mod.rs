//! Product catalog on top of the `products` search context.

mod demo;
mod product;
mod repository;

pub use demo::{run_demo, sample_products};
pub use product::Product;
pub use repository::{ProductRepository, PRODUCTS_CONTEXT, PRODUCTS_INDEX};

//! # Search Context
//!
//! Product catalog built on the search context layer: reads connection
//! settings from the environment, registers a `products` context against a
//! shared OpenSearch client, and exposes a `ProductRepository` over it.
//!
//! ## Modules
//!
//! - [`config`]: Environment settings and dependency initialization
//! - [`catalog`]: Product documents, the product repository and the demo flow
//! - [`errors`]: Error types for the catalog

pub mod catalog;
pub mod config;
pub mod errors;

pub use catalog::{Product, ProductRepository};
pub use config::{ConnectionMode, Dependencies, Settings};
pub use errors::CatalogError;

use search_context_repository::SearchContextError;
use thiserror::Error;

/// Errors that can occur during application startup or execution.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Catalog error.
    #[error("Catalog error: {0}")]
    CatalogError(#[from] CatalogError),

    /// Search context error.
    #[error("Search context error: {0}")]
    SearchError(#[from] SearchContextError),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

//! Dependency initialization and wiring for the product catalog.

use std::sync::Arc;
use std::time::Duration;

use search_context_repository::{ContextRegistry, OpenSearchBackend, SearchBackend};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::catalog::{ProductRepository, PRODUCTS_CONTEXT};
use crate::config::{ConnectionMode, Settings};
use crate::AppError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Registry holding every configured search context.
    pub registry: ContextRegistry,
    /// Repository over the `products` context.
    pub products: ProductRepository,
}

impl Dependencies {
    /// Connect to the configured cluster and build the context registry.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If the configuration is invalid, or the cluster is
    ///   unreachable in fail-fast mode
    pub async fn new(settings: &Settings) -> Result<Self, AppError> {
        info!(
            url = %settings.connection.url,
            port = settings.connection.port,
            contexts = ?settings.connection.contexts,
            connection_mode = ?settings.connection_mode,
            retry_interval_secs = settings.retry_interval.as_secs(),
            "Initializing dependencies"
        );

        let backend: Arc<dyn SearchBackend> =
            Arc::new(OpenSearchBackend::new(&settings.connection)?);
        Self::wait_for_cluster(
            backend.as_ref(),
            settings.connection_mode,
            settings.retry_interval,
        )
        .await?;

        info!("Search cluster connection established");

        Self::build(settings, backend)
    }

    /// Build the registry and repositories over an existing backend.
    pub fn build(settings: &Settings, backend: Arc<dyn SearchBackend>) -> Result<Self, AppError> {
        let registry = ContextRegistry::builder(settings.connection.clone())
            .register(PRODUCTS_CONTEXT, ProductRepository::overrides())
            .with_backend(backend)
            .build()?;

        let products = ProductRepository::new(registry.get(PRODUCTS_CONTEXT)?);

        Ok(Self { registry, products })
    }

    /// Ping the cluster until it answers, or once in fail-fast mode.
    pub async fn wait_for_cluster(
        backend: &dyn SearchBackend,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<(), AppError> {
        loop {
            match backend.ping().await {
                Ok(()) => return Ok(()),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(AppError::config(format!(
                            "Failed to connect to search cluster: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to search cluster, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }
}

//! Context registry.
//!
//! Applications declare their contexts once at startup with
//! [`ContextRegistry::builder`]. `build` validates the connection settings,
//! creates one backend shared by every context, and materializes the contexts
//! selected by [`ConnectionConfig::contexts`].

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::config::ConnectionConfig;
use crate::context::SearchContext;
use crate::errors::SearchContextError;
use crate::index_name::IndexOverrides;
use crate::interfaces::SearchBackend;
use crate::opensearch::OpenSearchBackend;

/// Registered contexts, keyed by name.
///
/// # Example
///
/// ```no_run
/// use search_context_repository::{ConnectionConfig, ContextRegistry, IndexOverrides};
///
/// # fn example() -> Result<(), search_context_repository::SearchContextError> {
/// let config = ConnectionConfig::new("http://localhost", 9200)
///     .with_basic_auth("elastic", "changeme");
///
/// let registry = ContextRegistry::builder(config)
///     .register("products", IndexOverrides::all("products"))
///     .register("orders", IndexOverrides::new())
///     .build()?;
///
/// let products = registry.get("products")?;
/// # Ok(())
/// # }
/// ```
pub struct ContextRegistry {
    config: Arc<ConnectionConfig>,
    backend: Arc<dyn SearchBackend>,
    contexts: HashMap<String, Arc<SearchContext>>,
}

impl ContextRegistry {
    /// Start declaring contexts for `config`.
    pub fn builder(config: ConnectionConfig) -> ContextRegistryBuilder {
        ContextRegistryBuilder {
            config,
            registrations: Vec::new(),
            backend: None,
        }
    }

    /// Look up a context by name.
    pub fn get(&self, name: &str) -> Result<Arc<SearchContext>, SearchContextError> {
        self.contexts
            .get(name)
            .cloned()
            .ok_or_else(|| SearchContextError::context_not_registered(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.contexts.contains_key(name)
    }

    /// Names of the materialized contexts, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.contexts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The connection settings shared by every context.
    pub fn config(&self) -> &Arc<ConnectionConfig> {
        &self.config
    }

    /// The backend shared by every context.
    pub fn backend(&self) -> &Arc<dyn SearchBackend> {
        &self.backend
    }
}

/// Builder returned by [`ContextRegistry::builder`].
pub struct ContextRegistryBuilder {
    config: ConnectionConfig,
    registrations: Vec<(String, IndexOverrides)>,
    backend: Option<Arc<dyn SearchBackend>>,
}

impl ContextRegistryBuilder {
    /// Declare a context. Registering a name twice keeps the last overrides.
    pub fn register(mut self, name: impl Into<String>, overrides: IndexOverrides) -> Self {
        let name = name.into();
        self.registrations.retain(|(existing, _)| *existing != name);
        self.registrations.push((name, overrides));
        self
    }

    /// Use `backend` instead of connecting to the configured endpoint.
    pub fn with_backend(mut self, backend: Arc<dyn SearchBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Validate the configuration and materialize the selected contexts.
    ///
    /// # Returns
    ///
    /// * `Ok(ContextRegistry)` - The populated registry
    /// * `Err(SearchContextError::ConfigError)` - If the configuration is
    ///   invalid or names a context that was never registered
    pub fn build(self) -> Result<ContextRegistry, SearchContextError> {
        self.config.validate()?;

        for target in &self.config.contexts {
            if !self.registrations.iter().any(|(name, _)| name == target) {
                return Err(SearchContextError::config(format!(
                    "context '{}' is configured but was never registered",
                    target
                )));
            }
        }

        let backend: Arc<dyn SearchBackend> = match self.backend {
            Some(backend) => backend,
            None => Arc::new(OpenSearchBackend::new(&self.config)?),
        };

        let selected = |name: &str| {
            self.config.contexts.is_empty() || self.config.contexts.iter().any(|c| c == name)
        };

        let contexts: HashMap<String, Arc<SearchContext>> = self
            .registrations
            .into_iter()
            .filter(|(name, _)| selected(name))
            .map(|(name, overrides)| {
                let context =
                    SearchContext::new(name.clone(), backend.clone()).with_overrides(overrides);
                (name, Arc::new(context))
            })
            .collect();

        let mut names: Vec<&str> = contexts.keys().map(String::as_str).collect();
        names.sort_unstable();
        info!(contexts = ?names, "Context registry built");

        Ok(ContextRegistry {
            config: Arc::new(self.config),
            backend,
            contexts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index_name::Operation;

    #[test]
    fn test_build_without_credentials() {
        let registry = ContextRegistry::builder(ConnectionConfig::default())
            .register("products", IndexOverrides::all("products"))
            .build()
            .unwrap();

        assert!(registry.contains("products"));
        assert_eq!(registry.config().port, 9200);
    }

    #[test]
    fn test_get_unknown_context() {
        let registry = ContextRegistry::builder(ConnectionConfig::default())
            .build()
            .unwrap();

        assert!(matches!(
            registry.get("products"),
            Err(SearchContextError::ContextNotRegistered(_))
        ));
    }

    #[test]
    fn test_scan_targets_select_contexts() {
        let config = ConnectionConfig::default().with_contexts(["orders"]);
        let registry = ContextRegistry::builder(config)
            .register("products", IndexOverrides::new())
            .register("orders", IndexOverrides::new())
            .build()
            .unwrap();

        assert_eq!(registry.names(), vec!["orders"]);
    }

    #[test]
    fn test_empty_scan_targets_select_all() {
        let registry = ContextRegistry::builder(ConnectionConfig::default())
            .register("products", IndexOverrides::new())
            .register("orders", IndexOverrides::new())
            .build()
            .unwrap();

        assert_eq!(registry.names(), vec!["orders", "products"]);
    }

    #[test]
    fn test_unregistered_scan_target_rejected() {
        let config = ConnectionConfig::default().with_contexts(["invoices"]);
        let result = ContextRegistry::builder(config)
            .register("products", IndexOverrides::new())
            .build();

        assert!(matches!(result, Err(SearchContextError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_config_rejected_at_build() {
        let mut config = ConnectionConfig::default();
        config.password = Some("secret".to_string());

        let result = ContextRegistry::builder(config)
            .register("products", IndexOverrides::new())
            .build();

        assert!(matches!(result, Err(SearchContextError::ConfigError(_))));
    }

    #[test]
    fn test_reregistration_keeps_last_overrides() {
        let registry = ContextRegistry::builder(ConnectionConfig::default())
            .register("products", IndexOverrides::new())
            .register("products", IndexOverrides::all("catalog"))
            .build()
            .unwrap();

        let context = registry.get("products").unwrap();
        assert_eq!(context.overrides().get(Operation::Search), Some("catalog"));
        assert_eq!(registry.names().len(), 1);
    }

    #[test]
    fn test_contexts_share_backend() {
        let registry = ContextRegistry::builder(ConnectionConfig::default())
            .register("products", IndexOverrides::new())
            .register("orders", IndexOverrides::new())
            .build()
            .unwrap();

        let products = registry.get("products").unwrap();
        let orders = registry.get("orders").unwrap();
        assert!(Arc::ptr_eq(products.backend(), orders.backend()));
        assert!(Arc::ptr_eq(products.backend(), registry.backend()));
    }
}

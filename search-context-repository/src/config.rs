//! Connection configuration for the search engine.

use url::Url;

use crate::errors::SearchContextError;

/// Default search engine URL, without port.
pub const DEFAULT_URL: &str = "http://localhost";

/// Default search engine port.
pub const DEFAULT_PORT: u16 = 9200;

/// Connection settings shared by every context in a registry.
///
/// Basic authentication is used when both `username` and `password` are set;
/// an API key is used when `api_key` is set. Configuring neither connects
/// anonymously.
///
/// `contexts` lists the registered context names to materialize at startup.
/// Leave it empty to materialize every registered context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Search engine URL without port (e.g., "http://localhost").
    pub url: String,
    /// Search engine port.
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// API key for hosted clusters. Either the encoded key, or `id:key`.
    pub api_key: Option<String>,
    /// Names of the contexts to materialize.
    pub contexts: Vec<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            port: DEFAULT_PORT,
            username: None,
            password: None,
            api_key: None,
            contexts: Vec::new(),
        }
    }
}

/// Credentials derived from a validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    Anonymous,
    Basic { username: String, password: String },
    ApiKey(String),
}

impl ConnectionConfig {
    /// Create a configuration for `url` and `port` with no credentials.
    pub fn new(url: impl Into<String>, port: u16) -> Self {
        Self {
            url: url.into(),
            port,
            ..Default::default()
        }
    }

    /// Use basic authentication.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Use an API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Restrict the registry to the named contexts.
    pub fn with_contexts<I, S>(mut self, contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contexts = contexts.into_iter().map(Into::into).collect();
        self
    }

    /// Full endpoint URL with the configured port applied.
    ///
    /// # Returns
    ///
    /// * `Ok(Url)` - The parsed endpoint
    /// * `Err(SearchContextError::ConfigError)` - If the URL is missing or invalid
    pub fn endpoint(&self) -> Result<Url, SearchContextError> {
        if self.url.trim().is_empty() {
            return Err(SearchContextError::config("url is required"));
        }
        if self.port == 0 {
            return Err(SearchContextError::config("port must be greater than 0"));
        }

        let mut endpoint = Url::parse(self.url.trim())
            .map_err(|e| SearchContextError::config(format!("Invalid url '{}': {}", self.url, e)))?;
        endpoint
            .set_port(Some(self.port))
            .map_err(|_| SearchContextError::config(format!("url '{}' cannot have a port", self.url)))?;
        Ok(endpoint)
    }

    /// Work out which credentials to use.
    ///
    /// Fails when only half of the basic credentials are set, or when basic
    /// credentials and an API key are both set. Empty strings count as unset.
    pub fn auth_method(&self) -> Result<AuthMethod, SearchContextError> {
        let username = non_empty(&self.username);
        let password = non_empty(&self.password);
        let api_key = non_empty(&self.api_key);

        match (username, password, api_key) {
            (None, None, None) => Ok(AuthMethod::Anonymous),
            (None, None, Some(key)) => Ok(AuthMethod::ApiKey(key.to_string())),
            (Some(username), Some(password), None) => Ok(AuthMethod::Basic {
                username: username.to_string(),
                password: password.to_string(),
            }),
            (Some(_), Some(_), Some(_)) => Err(SearchContextError::config(
                "configure either username/password or api_key, not both",
            )),
            (Some(_), None, _) => Err(SearchContextError::config(
                "password is required when username is set",
            )),
            (None, Some(_), _) => Err(SearchContextError::config(
                "username is required when password is set",
            )),
        }
    }

    /// Validate every field.
    pub fn validate(&self) -> Result<(), SearchContextError> {
        self.endpoint()?;
        self.auth_method()?;
        if self.contexts.iter().any(|name| name.trim().is_empty()) {
            return Err(SearchContextError::config("context names cannot be empty"));
        }
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

//! Uniform success/failure envelope returned by every context operation.
//!
//! The search engine reports outcomes in several shapes (HTTP status codes,
//! `found` flags, error bodies). The context facade folds all of them into a
//! `ContextResponse` so callers handle one type regardless of the operation.

use serde::Serialize;

use crate::errors::SearchContextError;

/// Message carried by a failed lookup of a missing document.
pub const NOT_FOUND_MESSAGE: &str = "nothing found";

/// Message carried by every successful response.
pub const SUCCESS_MESSAGE: &str = "Operation Succeed";

/// Result envelope for context operations.
///
/// Operations without a payload return `ContextResponse<()>`. The fields are
/// private: a failed response never carries data, and a successful one always
/// does.
///
/// # Example
///
/// ```
/// use search_context_repository::{ContextResponse, SearchContextError};
///
/// let ok = ContextResponse::ok(42);
/// assert!(ok.is_success());
/// assert_eq!(ok.data(), Some(&42));
///
/// let failed: ContextResponse<i32> =
///     ContextResponse::fail(SearchContextError::connection("refused"));
/// assert!(!failed.is_success());
/// assert!(failed.message().contains("refused"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextResponse<T = ()> {
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    is_success: bool,
    message: String,
    #[serde(skip)]
    error: Option<SearchContextError>,
    #[serde(skip)]
    not_found: bool,
}

impl<T> ContextResponse<T> {
    /// Successful response carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            is_success: true,
            message: SUCCESS_MESSAGE.to_string(),
            error: None,
            not_found: false,
        }
    }

    /// Failed response wrapping the underlying error.
    pub fn fail(error: SearchContextError) -> Self {
        Self {
            data: None,
            is_success: false,
            message: format!("Operation failed ERROR:{}", error),
            error: Some(error),
            not_found: false,
        }
    }

    /// Failed response with a custom message and no error detail.
    pub fn fail_message(message: impl AsRef<str>) -> Self {
        Self {
            data: None,
            is_success: false,
            message: format!("Operation failed Message:{}", message.as_ref()),
            error: None,
            not_found: false,
        }
    }

    /// Failed lookup: the requested document (or its index) does not exist.
    ///
    /// The message is the fixed [`NOT_FOUND_MESSAGE`] failure text.
    pub fn not_found() -> Self {
        Self {
            not_found: true,
            ..Self::fail_message(NOT_FOUND_MESSAGE)
        }
    }

    /// Whether this is a failed lookup built by [`ContextResponse::not_found`].
    pub fn is_not_found(&self) -> bool {
        self.not_found
    }

    pub fn is_success(&self) -> bool {
        self.is_success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The underlying error, if the failure was built from one.
    pub fn error(&self) -> Option<&SearchContextError> {
        self.error.as_ref()
    }

    /// Convert into a `Result`, for callers that prefer `?`.
    ///
    /// Failures built with [`ContextResponse::fail_message`] carry no error
    /// detail and come back as a [`SearchContextError::ServerError`] with
    /// status `0` holding the message.
    pub fn into_result(self) -> Result<T, SearchContextError> {
        let Self {
            data,
            is_success,
            message,
            error,
            ..
        } = self;
        match (data, error) {
            (Some(data), _) if is_success => Ok(data),
            (_, Some(error)) => Err(error),
            _ => Err(SearchContextError::server(0, message)),
        }
    }
}

impl<T> From<Result<T, SearchContextError>> for ContextResponse<T> {
    fn from(result: Result<T, SearchContextError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(error) => Self::fail(error),
        }
    }
}

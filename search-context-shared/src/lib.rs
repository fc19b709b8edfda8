//! # Search Context Shared
//!
//! This crate defines the request payloads shared between the search context
//! facade and the applications composing against it: search requests, reindex
//! requests and alias actions.

pub mod types;

pub use types::alias_action::AliasAction;
pub use types::reindex_request::ReindexRequest;
pub use types::search_request::SearchRequest;

//! This module defines the request types sent through a search context.
//! It re-exports `SearchRequest`, `ReindexRequest` and `AliasAction`.

pub mod alias_action;
pub mod reindex_request;
pub mod search_request;

pub use alias_action::AliasAction;
pub use reindex_request::ReindexRequest;
pub use search_request::SearchRequest;

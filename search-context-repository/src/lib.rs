//! # Search Context Repository
//!
//! This crate provides the search context facade applications compose
//! against, the uniform `ContextResponse` envelope, index-name resolution,
//! the `SearchBackend` seam and a concrete backend for OpenSearch, plus a
//! registry that wires named contexts to one shared client at startup.

pub mod config;
pub mod context;
pub mod errors;
pub mod index_name;
pub mod interfaces;
pub mod opensearch;
pub mod registry;
pub mod response;
pub mod utils;

pub use config::{AuthMethod, ConnectionConfig};
pub use context::SearchContext;
pub use errors::SearchContextError;
pub use index_name::{resolve_index_name, IndexOverrides, Operation};
pub use interfaces::SearchBackend;
pub use crate::opensearch::OpenSearchBackend;
pub use registry::{ContextRegistry, ContextRegistryBuilder};
pub use response::{ContextResponse, NOT_FOUND_MESSAGE, SUCCESS_MESSAGE};

pub use search_context_shared::{AliasAction, ReindexRequest, SearchRequest};

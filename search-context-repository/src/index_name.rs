//! Index-name resolution.
//!
//! Each context may pin the index used by individual operations through an
//! `IndexOverrides` table fixed at registration time. When an operation has an
//! override, the caller-supplied index name is ignored; otherwise the supplied
//! name is normalized to lower case, the only form the search engine accepts.

use std::collections::HashMap;
use std::fmt;

/// The operations exposed by a search context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateIndex,
    DeleteIndex,
    IndexExists,
    RefreshIndex,
    IndexDocument,
    GetDocument,
    DeleteDocument,
    UpdateDocument,
    Search,
    BulkIndex,
    IndexRange,
    DeleteRange,
    Reindex,
    AddAlias,
    RemoveAlias,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Operation; 15] = [
        Operation::CreateIndex,
        Operation::DeleteIndex,
        Operation::IndexExists,
        Operation::RefreshIndex,
        Operation::IndexDocument,
        Operation::GetDocument,
        Operation::DeleteDocument,
        Operation::UpdateDocument,
        Operation::Search,
        Operation::BulkIndex,
        Operation::IndexRange,
        Operation::DeleteRange,
        Operation::Reindex,
        Operation::AddAlias,
        Operation::RemoveAlias,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateIndex => "create_index",
            Operation::DeleteIndex => "delete_index",
            Operation::IndexExists => "index_exists",
            Operation::RefreshIndex => "refresh_index",
            Operation::IndexDocument => "index_document",
            Operation::GetDocument => "get_document",
            Operation::DeleteDocument => "delete_document",
            Operation::UpdateDocument => "update_document",
            Operation::Search => "search",
            Operation::BulkIndex => "bulk_index",
            Operation::IndexRange => "index_range",
            Operation::DeleteRange => "delete_range",
            Operation::Reindex => "reindex",
            Operation::AddAlias => "add_alias",
            Operation::RemoveAlias => "remove_alias",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping from operation to a fixed index name.
///
/// # Example
///
/// ```
/// use search_context_repository::{IndexOverrides, Operation};
///
/// let overrides = IndexOverrides::new()
///     .with(Operation::Search, "products")
///     .with(Operation::IndexDocument, "products");
///
/// assert_eq!(overrides.resolve(Operation::Search, "anything"), "products");
/// assert_eq!(overrides.resolve(Operation::GetDocument, "Orders"), "orders");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexOverrides {
    table: HashMap<Operation, String>,
}

impl IndexOverrides {
    /// An empty table: every operation uses the caller-supplied name.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table pinning every operation to `index`.
    pub fn all(index: impl Into<String>) -> Self {
        let index = index.into();
        Self {
            table: Operation::ALL
                .iter()
                .map(|op| (*op, index.clone()))
                .collect(),
        }
    }

    /// Pin `operation` to `index`.
    pub fn with(mut self, operation: Operation, index: impl Into<String>) -> Self {
        self.table.insert(operation, index.into());
        self
    }

    pub fn get(&self, operation: Operation) -> Option<&str> {
        self.table.get(&operation).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Resolve the index name `operation` should target.
    pub fn resolve(&self, operation: Operation, supplied: &str) -> String {
        resolve_index_name(self.get(operation), supplied)
    }
}

/// Resolve an index name from an optional override and the caller-supplied name.
///
/// The override is returned untouched; the supplied name is lower-cased.
pub fn resolve_index_name(override_name: Option<&str>, supplied: &str) -> String {
    match override_name {
        Some(name) => name.to_string(),
        None => supplied.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        assert_eq!(resolve_index_name(Some("products"), "anything"), "products");
    }

    #[test]
    fn test_supplied_name_is_lowercased() {
        assert_eq!(resolve_index_name(None, "Products"), "products");
        assert_eq!(resolve_index_name(None, "orders"), "orders");
    }

    #[test]
    fn test_override_is_not_normalized() {
        assert_eq!(resolve_index_name(Some("Products"), "x"), "Products");
    }

    #[test]
    fn test_table_resolution() {
        let overrides = IndexOverrides::new().with(Operation::Search, "products");

        assert_eq!(overrides.resolve(Operation::Search, "anything"), "products");
        assert_eq!(overrides.resolve(Operation::IndexDocument, "Orders"), "orders");
        assert!(overrides.get(Operation::GetDocument).is_none());
    }

    #[test]
    fn test_all_covers_every_operation() {
        let overrides = IndexOverrides::all("products");
        for op in Operation::ALL {
            assert_eq!(overrides.get(op), Some("products"), "missing {}", op);
        }
    }

}

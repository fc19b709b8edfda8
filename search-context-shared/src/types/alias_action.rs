//! Alias actions for the `_aliases` API.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A single alias mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AliasAction {
    /// Point `alias` at `index`.
    Add { alias: String, index: String },
    /// Detach `alias` from `index`.
    Remove { alias: String, index: String },
}

impl AliasAction {
    pub fn add(alias: impl Into<String>, index: impl Into<String>) -> Self {
        Self::Add {
            alias: alias.into(),
            index: index.into(),
        }
    }

    pub fn remove(alias: impl Into<String>, index: impl Into<String>) -> Self {
        Self::Remove {
            alias: alias.into(),
            index: index.into(),
        }
    }

    /// The alias this action touches.
    pub fn alias(&self) -> &str {
        match self {
            Self::Add { alias, .. } | Self::Remove { alias, .. } => alias,
        }
    }

    /// The index this action touches.
    pub fn index(&self) -> &str {
        match self {
            Self::Add { index, .. } | Self::Remove { index, .. } => index,
        }
    }

    /// Render a list of actions as an `_aliases` API body.
    pub fn to_body(actions: &[AliasAction]) -> Value {
        json!({ "actions": actions })
    }
}

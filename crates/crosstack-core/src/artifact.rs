//! Synthesized stack artifacts
//!
//! The deployment-time shape of a stack: resource declarations, export
//! channels, and imports of other stacks' exports. Artifacts are plain
//! serde records; the deploy layer compares and persists them as JSON.

use crate::resource::{AccessMode, KeyAttribute};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A resource declaration in a synthesized artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceDecl {
    Table {
        logical_id: String,
        table_name: String,
        partition_key: KeyAttribute,
        index_names: Vec<String>,
    },
    Function {
        logical_id: String,
        handler: String,
        runtime: String,
        /// Fully resolved environment
        environment: BTreeMap<String, String>,
    },
}

/// An exported value, addressable by other stacks' artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Export {
    /// Export channel name, unique across the deployment
    pub name: String,

    /// Exported value (a table name)
    pub value: String,
}

/// A reference to another stack's export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Import {
    /// Name of the imported export channel
    pub export_name: String,

    /// Stack whose artifact provides the export
    pub from_stack: String,
}

/// A declared permission relationship, as it lands in the artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantDecl {
    /// Logical id of the granted function
    pub function: String,

    /// Physical name of the target table
    pub table_name: String,

    pub access: AccessMode,
}

/// Synthesized deployment artifact of one stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackArtifact {
    /// Stack name
    pub stack: String,

    pub resources: Vec<ResourceDecl>,

    /// Export channels this artifact provides
    pub exports: Vec<Export>,

    /// Exports of other artifacts this artifact depends on
    pub imports: Vec<Import>,

    /// Declared permission grants
    pub grants: Vec<GrantDecl>,
}

impl StackArtifact {
    /// Imports referencing a given stack's artifact
    pub fn imports_from(&self, stack: &str) -> Vec<&Import> {
        self.imports.iter().filter(|i| i.from_stack == stack).collect()
    }

    /// Export channels carrying a given value
    pub fn exports_of_value(&self, value: &str) -> Vec<&Export> {
        self.exports.iter().filter(|e| e.value == value).collect()
    }

    /// Look up an export channel by name
    pub fn export(&self, name: &str) -> Option<&Export> {
        self.exports.iter().find(|e| e.name == name)
    }

    /// Whether this artifact declares a table with the given physical name
    pub fn declares_table(&self, table_name: &str) -> bool {
        self.resources.iter().any(|r| {
            matches!(r, ResourceDecl::Table { table_name: name, .. } if name == table_name)
        })
    }

    /// Resolved environment of a function resource, if present
    pub fn function_environment(&self, logical_id: &str) -> Option<&BTreeMap<String, String>> {
        self.resources.iter().find_map(|r| match r {
            ResourceDecl::Function {
                logical_id: id,
                environment,
                ..
            } if id == logical_id => Some(environment),
            _ => None,
        })
    }
}

//! Resource declarations and references
//!
//! A table is declared once by its producing stack. Everything else in the
//! model is a way of *referring* to that table: a [`TableHandle`] is a typed
//! reference carrying the full attribute set and the identity of the owning
//! stack, while [`TableRef::ByName`] is a bare name string re-resolved
//! against the platform with no link back to the producer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key attribute type of a table partition key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    String,
    Number,
    Binary,
}

/// Partition key attribute (name + type)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAttribute {
    pub name: String,
    pub key_type: KeyType,
}

impl KeyAttribute {
    pub fn new(name: impl Into<String>, key_type: KeyType) -> Self {
        Self {
            name: name.into(),
            key_type,
        }
    }
}

/// Declaration of a keyed storage table
///
/// Declared exactly once per table name across an app; never mutated after
/// registration. Removing the declaration (and redeploying) is the only way
/// to destroy the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Logical id within the declaring stack
    pub logical_id: String,

    /// Physical table name, unique across the app
    pub table_name: String,

    /// Partition key attribute
    pub partition_key: KeyAttribute,

    /// Secondary index names, if any
    pub index_names: Vec<String>,
}

impl TableSpec {
    pub fn new(
        logical_id: impl Into<String>,
        table_name: impl Into<String>,
        partition_key: KeyAttribute,
    ) -> Self {
        Self {
            logical_id: logical_id.into(),
            table_name: table_name.into(),
            partition_key,
            index_names: Vec::new(),
        }
    }

    pub fn with_index(mut self, name: impl Into<String>) -> Self {
        self.index_names.push(name.into());
        self
    }
}

/// Attributes visible through a table reference
///
/// A handle carries the full set; a name-resolved reference carries only the
/// name. Grants that need the missing metadata fail at synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableAttributes {
    pub table_name: String,
    pub partition_key: Option<KeyAttribute>,
    pub index_names: Vec<String>,
}

/// Typed build-time reference to a table
///
/// Obtainable only from the stack that declared the table (or passed on from
/// it). Using a handle across a stack boundary couples the two stacks'
/// artifacts through an export/import pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableHandle {
    /// Name of the stack that declared the table
    pub stack: String,

    /// Logical id of the table within that stack
    pub logical_id: String,

    /// Full attribute set, as declared
    pub attributes: TableAttributes,
}

impl TableHandle {
    pub fn table_name(&self) -> &str {
        &self.attributes.table_name
    }
}

/// How a consuming stack refers to a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableRef {
    /// Direct reference via a handle from the producing stack.
    /// Crossing a stack boundary this way synthesizes an export/import pair.
    ByHandle(TableHandle),

    /// Re-resolution by physical name. No build-time link to the producer;
    /// a wrong name surfaces at deploy or run time, not here.
    ByName(String),
}

impl TableRef {
    pub fn table_name(&self) -> &str {
        match self {
            TableRef::ByHandle(handle) => handle.table_name(),
            TableRef::ByName(name) => name,
        }
    }

    /// Attributes visible through this reference
    pub fn resolved_attributes(&self) -> TableAttributes {
        match self {
            TableRef::ByHandle(handle) => handle.attributes.clone(),
            TableRef::ByName(name) => TableAttributes {
                table_name: name.clone(),
                partition_key: None,
                index_names: Vec::new(),
            },
        }
    }
}

/// Access mode of a permission grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Read access to the table itself
    Read,
    /// Read access to the table and its secondary indexes.
    /// Requires index metadata on the reference.
    ReadWithIndexes,
}

impl std::fmt::Display for AccessMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessMode::Read => write!(f, "read"),
            AccessMode::ReadWithIndexes => write!(f, "read-with-indexes"),
        }
    }
}

/// One-way permission relationship from a function to a table
///
/// Declared at definition time; enforcement happens at runtime on the
/// platform side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    /// Logical id of the granted function
    pub function: String,

    /// Table being accessed
    pub table: TableRef,

    pub access: AccessMode,
}

/// Environment variable value of a function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnvValue {
    Literal(String),
    /// Resolves to the referenced table's name at synthesis
    TableName(TableRef),
}

/// Declaration of a function resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Logical id within the declaring stack
    pub logical_id: String,

    /// Handler entry point
    pub handler: String,

    /// Runtime tag (e.g. "node22")
    pub runtime: String,

    /// Environment variables, resolved at synthesis
    pub environment: BTreeMap<String, EnvValue>,
}

impl FunctionSpec {
    pub fn new(
        logical_id: impl Into<String>,
        handler: impl Into<String>,
        runtime: impl Into<String>,
    ) -> Self {
        Self {
            logical_id: logical_id.into(),
            handler: handler.into(),
            runtime: runtime.into(),
            environment: BTreeMap::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: EnvValue) -> Self {
        self.environment.insert(key.into(), value);
        self
    }
}

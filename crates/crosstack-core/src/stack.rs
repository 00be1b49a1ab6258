//! Deployable unit ("stack") definitions
//!
//! A stack is composition, not inheritance: it holds its declared child
//! resources and is itself held by an [`App`](crate::app::App). Constructing
//! one registers definitions only; nothing talks to a platform here.

use crate::resource::{
    AccessMode, FunctionSpec, Grant, TableAttributes, TableHandle, TableRef, TableSpec,
};

/// A named export channel pinned by the stack itself, independent of any
/// consumer. Used to keep an export alive during decoupling migrations.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualExport {
    /// Export channel name
    pub name: String,

    /// Logical id of the exported table
    pub logical_id: String,
}

/// A deployable unit: a named set of resource declarations
#[derive(Debug, Clone, Default)]
pub struct Stack {
    pub(crate) name: String,
    pub(crate) tables: Vec<TableSpec>,
    pub(crate) functions: Vec<FunctionSpec>,
    pub(crate) grants: Vec<Grant>,
    pub(crate) manual_exports: Vec<ManualExport>,
}

impl Stack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a table in this stack, returning its typed handle
    pub fn add_table(&mut self, spec: TableSpec) -> TableHandle {
        let handle = TableHandle {
            stack: self.name.clone(),
            logical_id: spec.logical_id.clone(),
            attributes: TableAttributes {
                table_name: spec.table_name.clone(),
                partition_key: Some(spec.partition_key.clone()),
                index_names: spec.index_names.clone(),
            },
        };
        self.tables.push(spec);
        handle
    }

    /// Declare a function in this stack
    pub fn add_function(&mut self, spec: FunctionSpec) {
        self.functions.push(spec);
    }

    /// Look up the typed handle of a table declared by this stack
    ///
    /// Handles exist only for a stack's own tables: a stack can hand out
    /// handles for what it declares, never for anyone else's resources.
    pub fn table_handle(&self, logical_id: &str) -> Option<TableHandle> {
        self.tables
            .iter()
            .find(|t| t.logical_id == logical_id)
            .map(|t| TableHandle {
                stack: self.name.clone(),
                logical_id: t.logical_id.clone(),
                attributes: TableAttributes {
                    table_name: t.table_name.clone(),
                    partition_key: Some(t.partition_key.clone()),
                    index_names: t.index_names.clone(),
                },
            })
    }

    /// Declare a read grant from a function in this stack to a table
    pub fn grant_read(&mut self, function: impl Into<String>, table: TableRef) {
        self.grants.push(Grant {
            function: function.into(),
            table,
            access: AccessMode::Read,
        });
    }

    /// Declare a read grant covering the table's secondary indexes.
    /// Fails at synthesis if the reference carries no index metadata.
    pub fn grant_read_with_indexes(&mut self, function: impl Into<String>, table: TableRef) {
        self.grants.push(Grant {
            function: function.into(),
            table,
            access: AccessMode::ReadWithIndexes,
        });
    }

    /// Pin an export of a table's name under an explicit channel name,
    /// regardless of whether any consumer imports it
    pub fn export_table_name(&mut self, export_name: impl Into<String>, logical_id: &str) {
        self.manual_exports.push(ManualExport {
            name: export_name.into(),
            logical_id: logical_id.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{KeyAttribute, KeyType};

    #[test]
    fn handle_only_for_own_tables() {
        let mut stack = Stack::new("producer");
        stack.add_table(TableSpec::new(
            "UsersTable",
            "Users",
            KeyAttribute::new("userId", KeyType::String),
        ));

        let handle = stack.table_handle("UsersTable").unwrap();
        assert_eq!(handle.stack, "producer");
        assert_eq!(handle.table_name(), "Users");
        assert!(handle.attributes.partition_key.is_some());

        assert!(stack.table_handle("OrdersTable").is_none());
    }

    #[test]
    fn handle_carries_index_metadata() {
        let mut stack = Stack::new("producer");
        stack.add_table(
            TableSpec::new(
                "UsersTable",
                "Users",
                KeyAttribute::new("userId", KeyType::String),
            )
            .with_index("byEmail"),
        );

        let handle = stack.table_handle("UsersTable").unwrap();
        assert_eq!(handle.attributes.index_names, vec!["byEmail".to_string()]);

        // A name-resolved reference to the same table carries none
        let by_name = TableRef::ByName("Users".to_string());
        assert!(by_name.resolved_attributes().index_names.is_empty());
    }
}

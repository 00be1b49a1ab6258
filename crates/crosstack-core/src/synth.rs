//! One-shot artifact synthesis
//!
//! Evaluated sequentially at definition time. The only interesting rule
//! lives here: a handle used outside its owning stack turns into an export
//! on the producer artifact and an import on the consumer artifact, keyed
//! by a deterministic channel name.

use crate::artifact::{Export, GrantDecl, Import, ResourceDecl, StackArtifact};
use crate::error::{Result, SynthError};
use crate::resource::{AccessMode, EnvValue, TableHandle, TableRef, TableSpec};
use crate::stack::Stack;
use std::collections::{BTreeMap, HashSet};

/// Deterministic export channel name for a table's name attribute
pub fn auto_export_name(stack: &str, logical_id: &str) -> String {
    format!("{}:{}:name", stack, logical_id)
}

fn find_table<'a>(stacks: &'a [Stack], stack: &str, logical_id: &str) -> Option<&'a TableSpec> {
    stacks
        .iter()
        .find(|s| s.name() == stack)?
        .tables
        .iter()
        .find(|t| t.logical_id == logical_id)
}

/// Validate a handle against the app and, if it crosses a stack boundary,
/// record the export requirement on the producer and the import on the user.
fn resolve_handle(
    stacks: &[Stack],
    user_stack: &str,
    handle: &TableHandle,
    exports: &mut BTreeMap<String, BTreeMap<String, String>>,
    imports: &mut BTreeMap<String, String>,
) -> Result<()> {
    if !stacks.iter().any(|s| s.name() == handle.stack) {
        return Err(SynthError::UnknownProducer {
            stack: handle.stack.clone(),
            table_name: handle.table_name().to_string(),
        });
    }
    let table = find_table(stacks, &handle.stack, &handle.logical_id).ok_or_else(|| {
        SynthError::UnknownTable {
            stack: handle.stack.clone(),
            logical_id: handle.logical_id.clone(),
        }
    })?;
    if table.table_name != handle.attributes.table_name {
        return Err(SynthError::StaleHandle {
            stack: handle.stack.clone(),
            logical_id: handle.logical_id.clone(),
        });
    }

    if handle.stack != user_stack {
        let name = auto_export_name(&handle.stack, &handle.logical_id);
        exports
            .entry(handle.stack.clone())
            .or_default()
            .insert(name.clone(), table.table_name.clone());
        imports.insert(name, handle.stack.clone());
    }
    Ok(())
}

fn insert_export(
    exports: &mut BTreeMap<String, String>,
    name: String,
    value: String,
) -> Result<()> {
    match exports.get(&name) {
        Some(existing) if existing != &value => Err(SynthError::ConflictingExport {
            name,
            existing: existing.clone(),
            requested: value,
        }),
        _ => {
            exports.insert(name, value);
            Ok(())
        }
    }
}

pub(crate) fn synth_app(stacks: &[Stack]) -> Result<Vec<StackArtifact>> {
    // Stack names and per-stack logical ids are unique
    let mut stack_names = HashSet::new();
    for stack in stacks {
        if !stack_names.insert(stack.name()) {
            return Err(SynthError::DuplicateStack(stack.name().to_string()));
        }
        let mut logical_ids = HashSet::new();
        for id in stack
            .tables
            .iter()
            .map(|t| &t.logical_id)
            .chain(stack.functions.iter().map(|f| &f.logical_id))
        {
            if !logical_ids.insert(id) {
                return Err(SynthError::DuplicateLogicalId {
                    stack: stack.name().to_string(),
                    logical_id: id.clone(),
                });
            }
        }
    }

    // Exactly one producing definition per table name across the app
    let mut producers: BTreeMap<&str, &str> = BTreeMap::new();
    for stack in stacks {
        for table in &stack.tables {
            if let Some(first) = producers.insert(&table.table_name, stack.name()) {
                return Err(SynthError::DuplicateTableName {
                    table_name: table.table_name.clone(),
                    first: first.to_string(),
                    second: stack.name().to_string(),
                });
            }
        }
    }

    // First pass: validate references and collect export requirements.
    // auto_exports: producer stack -> export name -> value
    // stack_imports: consumer stack -> export name -> producer stack
    let mut auto_exports: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    let mut stack_imports: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();

    for stack in stacks {
        let imports = stack_imports.entry(stack.name().to_string()).or_default();

        for function in &stack.functions {
            for value in function.environment.values() {
                if let EnvValue::TableName(TableRef::ByHandle(handle)) = value {
                    resolve_handle(stacks, stack.name(), handle, &mut auto_exports, imports)?;
                }
            }
        }

        for grant in &stack.grants {
            if !stack.functions.iter().any(|f| f.logical_id == grant.function) {
                return Err(SynthError::UnknownFunction {
                    stack: stack.name().to_string(),
                    function: grant.function.clone(),
                });
            }
            match &grant.table {
                TableRef::ByHandle(handle) => {
                    resolve_handle(stacks, stack.name(), handle, &mut auto_exports, imports)?;
                }
                TableRef::ByName(name) => {
                    // Re-resolved references carry no index metadata
                    if grant.access == AccessMode::ReadWithIndexes {
                        return Err(SynthError::ReducedCapability {
                            table_name: name.clone(),
                            access: grant.access,
                        });
                    }
                }
            }
        }
    }

    // Second pass: emit artifacts in definition order
    let mut artifacts = Vec::with_capacity(stacks.len());
    for stack in stacks {
        let mut exports: BTreeMap<String, String> = BTreeMap::new();
        if let Some(required) = auto_exports.get(stack.name()) {
            for (name, value) in required {
                insert_export(&mut exports, name.clone(), value.clone())?;
            }
        }
        for manual in &stack.manual_exports {
            let table = find_table(stacks, stack.name(), &manual.logical_id).ok_or_else(|| {
                SynthError::UnknownTable {
                    stack: stack.name().to_string(),
                    logical_id: manual.logical_id.clone(),
                }
            })?;
            insert_export(&mut exports, manual.name.clone(), table.table_name.clone())?;
        }

        let mut resources = Vec::new();
        for table in &stack.tables {
            resources.push(ResourceDecl::Table {
                logical_id: table.logical_id.clone(),
                table_name: table.table_name.clone(),
                partition_key: table.partition_key.clone(),
                index_names: table.index_names.clone(),
            });
        }
        for function in &stack.functions {
            let environment = function
                .environment
                .iter()
                .map(|(key, value)| {
                    let resolved = match value {
                        EnvValue::Literal(s) => s.clone(),
                        EnvValue::TableName(table_ref) => table_ref.table_name().to_string(),
                    };
                    (key.clone(), resolved)
                })
                .collect();
            resources.push(ResourceDecl::Function {
                logical_id: function.logical_id.clone(),
                handler: function.handler.clone(),
                runtime: function.runtime.clone(),
                environment,
            });
        }

        let grants = stack
            .grants
            .iter()
            .map(|grant| GrantDecl {
                function: grant.function.clone(),
                table_name: grant.table.table_name().to_string(),
                access: grant.access,
            })
            .collect();

        let imports = stack_imports
            .remove(stack.name())
            .unwrap_or_default()
            .into_iter()
            .map(|(export_name, from_stack)| Import {
                export_name,
                from_stack,
            })
            .collect::<Vec<_>>();

        let exports = exports
            .into_iter()
            .map(|(name, value)| Export { name, value })
            .collect::<Vec<_>>();

        tracing::debug!(
            "Synthesized stack '{}' ({} exports, {} imports)",
            stack.name(),
            exports.len(),
            imports.len()
        );

        artifacts.push(StackArtifact {
            stack: stack.name().to_string(),
            resources,
            exports,
            imports,
            grants,
        });
    }

    Ok(artifacts)
}

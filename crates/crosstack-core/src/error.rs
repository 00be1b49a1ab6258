//! Synthesis error types

use crate::resource::AccessMode;
use thiserror::Error;

/// Errors raised while synthesizing an app into stack artifacts
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("Duplicate stack name: {0}")]
    DuplicateStack(String),

    #[error("Duplicate logical id '{logical_id}' in stack '{stack}'")]
    DuplicateLogicalId { stack: String, logical_id: String },

    #[error(
        "Table name '{table_name}' is declared by both '{first}' and '{second}': exactly one producing definition may exist per table name"
    )]
    DuplicateTableName {
        table_name: String,
        first: String,
        second: String,
    },

    #[error("Stack '{stack}' has no table with logical id '{logical_id}'")]
    UnknownTable { stack: String, logical_id: String },

    #[error("Grant in stack '{stack}' names unknown function '{function}'")]
    UnknownFunction { stack: String, function: String },

    #[error("Handle for table '{table_name}' points at stack '{stack}', which is not part of this app")]
    UnknownProducer { stack: String, table_name: String },

    #[error("Handle for '{logical_id}' no longer matches the table declared by stack '{stack}'")]
    StaleHandle { stack: String, logical_id: String },

    #[error(
        "Cannot grant {access} on table '{table_name}': a name-resolved reference carries no secondary index metadata"
    )]
    ReducedCapability {
        table_name: String,
        access: AccessMode,
    },

    #[error("Conflicting export '{name}': already set to '{existing}', requested '{requested}'")]
    ConflictingExport {
        name: String,
        existing: String,
        requested: String,
    },
}

pub type Result<T> = std::result::Result<T, SynthError>;

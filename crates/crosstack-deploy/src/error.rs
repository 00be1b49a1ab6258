//! Deployment error types

use thiserror::Error;

/// Errors raised by the deployment registry and state management
#[derive(Error, Debug)]
pub enum DeployError {
    #[error(
        "Export '{export}' is still imported by stack '{importer}': decouple the stacks before modifying or removing it"
    )]
    ExportInUse { export: String, importer: String },

    #[error("Stack '{stack}' imports export '{export}', which no deployed stack provides")]
    ExportNotFound { stack: String, export: String },

    #[error("Stack not deployed: {0}")]
    StackNotDeployed(String),

    #[error("State file error: {0}")]
    StateError(String),

    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DeployError>;

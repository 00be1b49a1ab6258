//! Deployment context discovery
//!
//! The config-based variant needs one out-of-band value: the shared table
//! name. It comes from an optional JSON context file, searched in order:
//!
//! 1. Path named by the `CROSSTACK_CONTEXT` environment variable
//! 2. `./crosstack.json`
//! 3. `./.crosstack/context.json`
//!
//! Absent a file, the defaults apply (table name `"Users"`, artifacts under
//! `.crosstack/out`).

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TABLE_NAME: &str = "Users";
const DEFAULT_OUT_DIR: &str = ".crosstack/out";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    /// Shared table name, known out-of-band by producer and consumer
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Directory synthesized artifacts are written to
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_string()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUT_DIR)
}

impl Default for Context {
    fn default() -> Self {
        Self {
            table_name: default_table_name(),
            out_dir: default_out_dir(),
        }
    }
}

impl Context {
    /// Locate and load the context file, falling back to defaults
    pub fn discover() -> anyhow::Result<Self> {
        if let Ok(path) = std::env::var("CROSSTACK_CONTEXT") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::load(&path);
            }
        }

        for candidate in ["crosstack.json", ".crosstack/context.json"] {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load(path);
            }
        }

        tracing::debug!("No context file found, using defaults");
        Ok(Self::default())
    }

    fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read context file {}", path.display()))?;
        let context: Self = serde_json::from_str(&content)
            .with_context(|| format!("invalid context file {}", path.display()))?;
        tracing::debug!("Loaded context from {}", path.display());
        Ok(context)
    }
}

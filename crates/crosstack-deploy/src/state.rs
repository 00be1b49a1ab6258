//! Deployment state persistence
//!
//! Manages the `.crosstack/state.json` file which records the artifact of
//! every deployed stack. Saves keep a backup of the previous state, and a
//! JSON lock file guards against concurrent runs.

use crate::error::{DeployError, Result};
use chrono::{DateTime, Utc};
use crosstack_core::StackArtifact;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

const STATE_VERSION: u32 = 1;
const STATE_DIR: &str = ".crosstack";
const STATE_FILE: &str = "state.json";
const STATE_BACKUP: &str = "state.json.backup";
const LOCK_FILE: &str = "lock.json";

/// A deployed stack: its artifact plus deployment timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployedStack {
    pub artifact: StackArtifact,

    /// When the stack was first deployed
    pub deployed_at: DateTime<Utc>,

    /// Last redeploy timestamp
    pub updated_at: DateTime<Utc>,
}

impl DeployedStack {
    pub fn new(artifact: StackArtifact) -> Self {
        let now = Utc::now();
        Self {
            artifact,
            deployed_at: now,
            updated_at: now,
        }
    }
}

/// Full deployment state: every deployed stack, keyed by stack name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployState {
    /// State file version
    pub version: u32,

    /// Last modified timestamp
    pub updated_at: DateTime<Utc>,

    pub stacks: BTreeMap<String, DeployedStack>,
}

impl Default for DeployState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            updated_at: Utc::now(),
            stacks: BTreeMap::new(),
        }
    }
}

impl DeployState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stack(&self, name: &str) -> Option<&DeployedStack> {
        self.stacks.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DeployedStack)> {
        self.stacks.iter()
    }

    pub(crate) fn set_stack(&mut self, name: String, deployed: DeployedStack) {
        self.stacks.insert(name, deployed);
        self.updated_at = Utc::now();
    }

    pub(crate) fn remove_stack(&mut self, name: &str) -> Option<DeployedStack> {
        let removed = self.stacks.remove(name);
        if removed.is_some() {
            self.updated_at = Utc::now();
        }
        removed
    }
}

/// State manager for reading/writing the state files
pub struct StateManager {
    /// Project root directory
    project_root: PathBuf,
}

impl StateManager {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
        }
    }

    fn state_dir(&self) -> PathBuf {
        self.project_root.join(STATE_DIR)
    }

    fn state_path(&self) -> PathBuf {
        self.state_dir().join(STATE_FILE)
    }

    fn backup_path(&self) -> PathBuf {
        self.state_dir().join(STATE_BACKUP)
    }

    fn lock_path(&self) -> PathBuf {
        self.state_dir().join(LOCK_FILE)
    }

    async fn ensure_state_dir(&self) -> Result<()> {
        let dir = self.state_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
            tracing::debug!("Created state directory: {}", dir.display());
        }
        Ok(())
    }

    /// Load the current state
    pub async fn load(&self) -> Result<DeployState> {
        let path = self.state_path();
        if !path.exists() {
            tracing::debug!("State file not found, returning empty state");
            return Ok(DeployState::new());
        }

        let content = fs::read_to_string(&path).await?;
        let state: DeployState = serde_json::from_str(&content)?;

        if state.version > STATE_VERSION {
            return Err(DeployError::StateError(format!(
                "State file version {} is newer than supported version {}",
                state.version, STATE_VERSION
            )));
        }

        tracing::debug!("Loaded state with {} deployed stacks", state.stacks.len());
        Ok(state)
    }

    /// Save the state, keeping the previous file as a backup
    pub async fn save(&self, state: &DeployState) -> Result<()> {
        self.ensure_state_dir().await?;

        let path = self.state_path();
        let backup = self.backup_path();

        if path.exists() {
            if backup.exists() {
                fs::remove_file(&backup).await?;
            }
            fs::rename(&path, &backup).await?;
            tracing::debug!("Created state backup");
        }

        let content = serde_json::to_string_pretty(state)?;
        fs::write(&path, content).await?;

        tracing::debug!("Saved state with {} deployed stacks", state.stacks.len());
        Ok(())
    }

    /// Acquire a lock for exclusive access
    pub async fn acquire_lock(&self) -> Result<StateLock> {
        self.ensure_state_dir().await?;

        let lock_path = self.lock_path();

        if lock_path.exists() {
            let content = fs::read_to_string(&lock_path).await?;
            let lock_info: LockInfo = serde_json::from_str(&content)?;

            // Locks older than an hour are taken over
            let age = Utc::now().signed_duration_since(lock_info.acquired_at);
            if age.num_hours() < 1 {
                return Err(DeployError::LockError(format!(
                    "State is locked by {} since {}",
                    lock_info.holder, lock_info.acquired_at
                )));
            }

            tracing::warn!("Removing stale lock from {}", lock_info.holder);
        }

        let lock_info = LockInfo {
            holder: std::env::var("HOSTNAME")
                .or_else(|_| std::env::var("HOST"))
                .unwrap_or_else(|_| "unknown".to_string()),
            acquired_at: Utc::now(),
        };

        let content = serde_json::to_string_pretty(&lock_info)?;
        fs::write(&lock_path, content).await?;

        tracing::debug!("Acquired state lock");
        Ok(StateLock {
            lock_path,
            released: false,
        })
    }
}

/// Lock information
#[derive(Debug, Serialize, Deserialize)]
struct LockInfo {
    holder: String,
    acquired_at: DateTime<Utc>,
}

/// RAII guard for the state lock
pub struct StateLock {
    lock_path: PathBuf,
    released: bool,
}

impl StateLock {
    /// Release the lock
    pub async fn release(mut self) -> Result<()> {
        if !self.released {
            if self.lock_path.exists() {
                fs::remove_file(&self.lock_path).await?;
                tracing::debug!("Released state lock");
            }
            self.released = true;
        }
        Ok(())
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if !self.released && self.lock_path.exists() {
            // Synchronous cleanup in drop - not ideal but necessary
            let _ = std::fs::remove_file(&self.lock_path);
        }
    }
}

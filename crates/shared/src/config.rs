//! Configuration types for Moonlit

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Sync client configuration
///
/// Passed into `SyncClient` at construction time; there is no global state.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Quiet period before a scheduled push fires. Mutations arriving
    /// inside the window reset it, coalescing bursts into one write.
    pub debounce: Duration,

    /// Push any unsaved state when the client shuts down
    pub flush_on_shutdown: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            flush_on_shutdown: true,
        }
    }
}

/// Where the client keeps its local files
#[derive(Debug, Clone)]
pub struct ClientPaths {
    pub data_dir: PathBuf,
}

impl ClientPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// SQLite database holding profiles and progress
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("moonlit.db")
    }

    /// Cached identity handle from the last login
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}

/// Cached identity handle (the localStorage analog)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCache {
    pub profile_id: String,
}

impl SessionCache {
    /// Load a cached session, if one exists and parses
    pub fn load(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn save(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    /// Drop the cached handle (stale id, or explicit logout)
    pub fn clear(path: &Path) {
        let _ = std::fs::remove_file(path);
    }
}

// Store configuration
//
// Loadable from JSON or from the environment:
//   COA_DB_PATH             database file (unset = in-memory)
//   COA_DB_WAL              "0"/"false" disables WAL journaling
//   COA_DB_BUSY_TIMEOUT_MS  how long to wait on a locked database

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "COA_DB_PATH";
pub const ENV_DB_WAL: &str = "COA_DB_WAL";
pub const ENV_DB_BUSY_TIMEOUT_MS: &str = "COA_DB_BUSY_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file; `None` keeps everything in memory
    pub path: Option<PathBuf>,

    /// WAL journal for crash recovery. Ignored for in-memory stores.
    pub wal: bool,

    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            path: None,
            wal: true,
            busy_timeout_ms: 5000,
        }
    }
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Build from environment variables, keeping defaults for anything unset or unparsable
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            config.path = Some(PathBuf::from(path));
        }
        if let Some(wal) = lookup(ENV_DB_WAL) {
            config.wal = !matches!(wal.trim().to_lowercase().as_str(), "0" | "false" | "off" | "no");
        }
        if let Some(timeout) = lookup(ENV_DB_BUSY_TIMEOUT_MS).and_then(|t| t.trim().parse().ok()) {
            config.busy_timeout_ms = timeout;
        }

        config
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.is_none()
    }
}

//! Local key-value slot storage
//!
//! A tiny file-backed stand-in for browser local storage: each key maps to
//! one file holding one string value.
//!
//! # Directory Structure
//!
//! ```text
//! <data_dir>/
//!   nebula-tasks.json        # value stored under key "nebula-tasks"
//!   nebula-tasks.json.lock   # advisory lock for readers and writers
//! ```
//!
//! The default data directory comes from the platform conventions
//! (`directories::ProjectDirs`), e.g. `~/.local/share/nebula` on Linux.

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::{Error, Result};
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};

/// Extension used for slot files
pub const SLOT_EXTENSION: &str = "json";

/// Platform project directories for nebula, if a home directory is known.
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "nebula")
}

/// Default data directory for slot files
pub fn default_data_dir() -> Result<PathBuf> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            Error::OperationFailed(
                "could not determine a data directory; pass --data-dir".to_string(),
            )
        })
}

/// Key-value slot store rooted at a directory
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
    lock_timeout_ms: u64,
}

impl Storage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    /// Path of the file backing `key`
    pub fn slot_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self
            .data_dir
            .join(format!("{key}.{SLOT_EXTENSION}")))
    }

    /// Read the raw value under `key`; `None` if the slot was never written.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        tracing::debug!(key, path = %path.display(), "reading slot");
        lock::read_locked_str(&path, self.lock_timeout_ms)
    }

    /// Overwrite the value under `key` (atomic, locked).
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        tracing::debug!(key, bytes = value.len(), "writing slot");
        lock::write_atomic_locked(&path, value.as_bytes(), self.lock_timeout_ms)
    }
}

/// Slot keys become file names, so keep them to a conservative charset.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidArgument("slot key cannot be empty".to_string()));
    }
    if key.starts_with('.') {
        return Err(Error::InvalidArgument(format!(
            "slot key '{key}' cannot start with '.'"
        )));
    }
    if !key
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
    {
        return Err(Error::InvalidArgument(format!(
            "slot key '{key}' may only contain letters, digits, '-', '_' and '.'"
        )));
    }
    Ok(())
}

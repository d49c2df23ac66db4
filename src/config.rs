//! Configuration loading and management
//!
//! Handles parsing of `nebula.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::filter::Filter;
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::persistence::DEFAULT_SLOT_KEY;

/// File name of the default configuration file
pub const CONFIG_FILE: &str = "nebula.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Task slot configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// List view configuration
    #[serde(default)]
    pub view: ViewConfig,
}

/// Where and how the task list is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Slot key the task list is stored under
    #[serde(default = "default_key")]
    pub key: String,

    /// Data directory override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// How long to wait for the slot lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_key() -> String {
    DEFAULT_SLOT_KEY.to_string()
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            dir: None,
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Filter used when none is given on the command line
    #[serde(default)]
    pub default_filter: Filter,
}

impl Config {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Default config location, e.g. `~/.config/nebula/nebula.toml`
    pub fn default_path() -> Option<PathBuf> {
        crate::storage::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Resolve the effective configuration.
    ///
    /// An explicitly named file must exist and be valid. The implicit default
    /// file is optional and falls back to defaults when broken.
    pub fn resolve(explicit: Option<&Path>) -> crate::error::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path).map_err(|err| match err {
                crate::error::Error::InvalidConfig(_) => err,
                other => crate::error::Error::InvalidConfig(format!(
                    "{}: {}",
                    path.display(),
                    other
                )),
            });
        }
        Ok(Self::default_path()
            .map(|path| Self::load_or_default(&path))
            .unwrap_or_default())
    }

    /// Load from `path`, or return defaults if missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.storage.validate()
    }
}

impl StorageConfig {
    fn validate(&self) -> crate::error::Result<()> {
        crate::storage::validate_key(self.key.trim()).map_err(|err| match err {
            crate::error::Error::InvalidArgument(message) => {
                crate::error::Error::InvalidConfig(format!("storage.key: {message}"))
            }
            other => other,
        })?;
        if self.key.trim() != self.key {
            return Err(crate::error::Error::InvalidConfig(
                "storage.key cannot have surrounding whitespace".to_string(),
            ));
        }
        if self.lock_timeout_ms == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "storage.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        if let Some(dir) = &self.dir {
            if dir.as_os_str().is_empty() {
                return Err(crate::error::Error::InvalidConfig(
                    "storage.dir cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.storage.key, "nebula-tasks");
        assert!(cfg.storage.dir.is_none());
        assert_eq!(cfg.storage.lock_timeout_ms, 5000);
        assert_eq!(cfg.view.default_filter, Filter::All);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
[storage]
key = "work-tasks"
dir = "/tmp/nebula-data"
lock_timeout_ms = 250

[view]
default_filter = "active"
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.storage.key, "work-tasks");
        assert_eq!(cfg.storage.dir, Some(PathBuf::from("/tmp/nebula-data")));
        assert_eq!(cfg.storage.lock_timeout_ms, 250);
        assert_eq!(cfg.view.default_filter, Filter::Active);
    }

    #[test]
    fn default_filter_accepts_cli_spellings() {
        for (raw, expected) in [("done", Filter::Completed), ("completed", Filter::Completed)] {
            let cfg: Config = toml::from_str(&format!("[view]\ndefault_filter = \"{raw}\""))
                .expect("parse config");
            assert_eq!(cfg.view.default_filter, expected);
            assert_eq!(raw.parse::<Filter>().expect("parse filter"), expected);
        }
    }

    #[test]
    fn invalid_key_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[storage]\nkey = \"../escape\"").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            crate::error::Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn zero_lock_timeout_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[storage]\nlock_timeout_ms = 0").expect("write config");

        assert!(matches!(
            Config::load(&path),
            Err(crate::error::Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn unknown_filter_is_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[view]\ndefault_filter = \"someday\"").expect("write config");

        assert!(matches!(
            Config::load(&path),
            Err(crate::error::Error::TomlParse(_))
        ));
    }

    #[test]
    fn load_or_default_when_missing_or_broken() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        assert_eq!(Config::load_or_default(&path).storage.key, "nebula-tasks");

        fs::write(&path, "storage = 123").expect("write config");
        assert_eq!(Config::load_or_default(&path).storage.key, "nebula-tasks");
    }

    #[test]
    fn resolve_explicit_missing_is_invalid_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Config::resolve(Some(&dir.path().join("missing.toml"))).expect_err("missing");
        assert!(matches!(err, crate::error::Error::InvalidConfig(_)));
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.toml");
        Config::default().save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("key = \"nebula-tasks\""));
        assert!(written.contains("default_filter = \"all\""));
    }
}

//! nebula init command implementation
//!
//! Writes a default `nebula.toml` and creates the data directory.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};

use super::task::{resolve_data_dir, GlobalOptions};

#[derive(serde::Serialize)]
struct InitReport {
    config_path: PathBuf,
    data_dir: PathBuf,
    created: InitCreated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    config: bool,
    data_dir: bool,
}

pub fn run(global: GlobalOptions) -> Result<()> {
    let config_path = match &global.config {
        Some(path) => path.clone(),
        None => Config::default_path().ok_or_else(|| {
            Error::OperationFailed("could not determine a config directory".to_string())
        })?,
    };

    let created_config = ensure_config(&config_path)?;
    let config = Config::resolve(Some(config_path.as_path()))?;
    let data_dir = resolve_data_dir(&global, &config)?;
    let created_data_dir = ensure_dir(&data_dir)?;

    let mut created_items = Vec::new();
    if created_config {
        created_items.push("config");
    }
    if created_data_dir {
        created_items.push("data dir");
    }

    let header = if created_items.is_empty() {
        "nebula init: nothing to do"
    } else {
        "nebula init: initialized"
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("config", config_path.display().to_string());
    human.push_summary("data", data_dir.display().to_string());
    human.push_summary(
        "created",
        if created_items.is_empty() {
            "none".to_string()
        } else {
            created_items.join(", ")
        },
    );

    let report = InitReport {
        config_path,
        data_dir,
        created: InitCreated {
            config: created_config,
            data_dir: created_data_dir,
        },
    };
    emit_success(global.output(), "init", &report, Some(&human))
}

fn ensure_config(path: &Path) -> Result<bool> {
    if path.exists() {
        if !path.is_file() {
            return Err(Error::OperationFailed(format!(
                "config path exists but is not a file: {}",
                path.display()
            )));
        }
        return Ok(false);
    }

    Config::default().save(path)?;
    Ok(true)
}

fn ensure_dir(path: &Path) -> Result<bool> {
    if path.exists() {
        if !path.is_dir() {
            return Err(Error::OperationFailed(format!(
                "Expected directory at {}",
                path.display()
            )));
        }
        return Ok(false);
    }

    std::fs::create_dir_all(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_config_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf/nebula.toml");

        assert!(ensure_config(&path).unwrap());
        assert!(!ensure_config(&path).unwrap());
        assert!(Config::load(&path).is_ok());
    }

    #[test]
    fn ensure_dir_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("taken");
        std::fs::write(&file, "x").unwrap();

        assert!(ensure_dir(&file).is_err());
        assert!(ensure_dir(&dir.path().join("new")).unwrap());
    }
}

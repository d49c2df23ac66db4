#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use nebula::task::Task;
use tempfile::TempDir;

/// Isolated data and config directories for one test.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let env = Self { dir };
        env.write_config("").expect("write config");
        env
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("nebula.toml")
    }

    pub fn slot_path(&self) -> PathBuf {
        self.data_dir().join("nebula-tasks.json")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.config_path();
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_slot(&self, contents: &str) -> std::io::Result<()> {
        fs::create_dir_all(self.data_dir())?;
        fs::write(self.slot_path(), contents)
    }

    pub fn read_slot(&self) -> Result<Vec<Task>, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(self.slot_path())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// `nebula` with data and config pinned to this environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = nebula_cmd();
        cmd.env("NEBULA_DATA_DIR", self.data_dir())
            .env("NEBULA_CONFIG", self.config_path());
        cmd
    }

    /// Run a command with `--json` and return the `data` payload.
    pub fn json(&self, args: &[&str]) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
        let output = self.cmd().arg("--json").args(args).output()?;
        if !output.status.success() {
            return Err(format!(
                "nebula {:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stderr)
            )
            .into());
        }
        let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        Ok(value["data"].clone())
    }
}

pub fn nebula_cmd() -> Command {
    let mut cmd = Command::cargo_bin("nebula").expect("binary");
    cmd.env_remove("RUST_LOG")
        .env_remove("NEBULA_DATA_DIR")
        .env_remove("NEBULA_CONFIG");
    cmd
}

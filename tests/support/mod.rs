#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tasktalk::registry::TodoRegistry;
use tasktalk::state::StateStore;
use tasktalk::task::AppState;
use tempfile::TempDir;

/// Scratch working directory with its own state file and config home.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.path().join("state.json")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_state(&self) -> Result<AppState, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(self.state_path())?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn registry(&self) -> TodoRegistry {
        TodoRegistry::new(StateStore::open(self.state_path(), AppState::default()))
    }

    /// The tasktalk binary, isolated from the caller's environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tasktalk").expect("binary");
        cmd.current_dir(self.path())
            .env_remove("TASKTALK_STATE")
            .env_remove("TASKTALK_CONFIG")
            .env_remove("RUST_LOG")
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env("NO_COLOR", "1");
        cmd
    }
}

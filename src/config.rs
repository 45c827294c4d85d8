//! Configuration loading and management
//!
//! Handles parsing of `.tasktalk.toml` configuration files. Lookup order:
//! an explicit path, `.tasktalk.toml` in the working directory, then the
//! per-user `config.toml`.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::state::DEFAULT_STATE_FILE;

/// Name of the project-local config file
pub const CONFIG_FILE: &str = ".tasktalk.toml";

const MIN_BUBBLE_WIDTH: usize = 20;
const MAX_BUBBLE_WIDTH: usize = 200;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// State document configuration
    #[serde(default)]
    pub state: StateConfig,

    /// Chat session configuration
    #[serde(default)]
    pub chat: ChatConfig,
}

/// State document configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    /// Path to the JSON state document, relative to the working directory
    #[serde(default = "default_state_path")]
    pub path: PathBuf,

    /// Append chat turns to the `conversation` field
    #[serde(default = "default_true")]
    pub record_conversation: bool,
}

fn default_state_path() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_FILE)
}

fn default_true() -> bool {
    true
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
            record_conversation: true,
        }
    }
}

/// Chat session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Inner width of chat bubbles, in columns
    #[serde(default = "default_bubble_width")]
    pub bubble_width: usize,

    /// Show trace bubbles for agent activity
    #[serde(default = "default_true")]
    pub show_trace: bool,

    /// Name shown in the banner and the agent trace
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,
}

fn default_bubble_width() -> usize {
    50
}

fn default_assistant_name() -> String {
    "Todo List Assistant".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bubble_width: default_bubble_width(),
            show_trace: true,
            assistant_name: default_assistant_name(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `dir`, then the user config, or return defaults.
    ///
    /// Unreadable or invalid files are skipped with a warning.
    pub fn load_from_dir(dir: &Path) -> Self {
        let candidates = std::iter::once(dir.join(CONFIG_FILE)).chain(user_config_path());
        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "loaded config");
                    return config;
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                }
            }
        }
        Self::default()
    }

    /// Resolve configuration: an explicit path must load, otherwise fall back
    /// to the implicit lookup.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => Ok(Self::load_from_dir(dir)),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.state.path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "state.path cannot be empty".to_string(),
            ));
        }

        let width = self.chat.bubble_width;
        if !(MIN_BUBBLE_WIDTH..=MAX_BUBBLE_WIDTH).contains(&width) {
            return Err(Error::InvalidConfig(format!(
                "chat.bubble_width must be between {MIN_BUBBLE_WIDTH} and {MAX_BUBBLE_WIDTH}"
            )));
        }

        if self.chat.assistant_name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "chat.assistant_name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Per-user config file (`~/.config/tasktalk/config.toml` on Linux)
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tasktalk").map(|dirs| dirs.config_dir().join("config.toml"))
}

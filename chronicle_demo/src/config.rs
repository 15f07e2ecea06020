//! Demo configuration, read from a TOML file.

use game_state::GameState;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for one demo session. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Shown at the top of the main menu.
    pub title: String,

    /// Conversation to play instead of the built-in diplomatic greeting.
    pub dialogue_path: Option<PathBuf>,

    /// Starting standings, applied on top of the four empires at zero.
    pub factions: BTreeMap<String, i32>,

    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "EVE Chronicle RPG".to_string(),
            dialogue_path: None,
            factions: BTreeMap::new(),
            log_filter: "info".to_string(),
        }
    }
}

impl DemoConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Game state for a new session.
    pub fn initial_state(&self) -> GameState {
        let mut state = GameState::new();
        for (faction, score) in &self.factions {
            state.factions.set(faction.clone(), *score);
        }
        state
    }
}

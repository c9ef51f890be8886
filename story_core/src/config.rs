//! Session configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::StoryError;

/// Tunables for a story session.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Lives at the start of a run and after a restart.
    pub starting_lives: u32,

    /// Dialogue scenes advance on their own after a delay.
    pub auto_advance_dialogue: bool,

    /// Delay used when a dialogue scene does not set its own.
    pub default_auto_advance_ms: u64,

    /// Time limit used when a timed challenge does not set its own.
    pub timed_challenge_default_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            auto_advance_dialogue: true,
            default_auto_advance_ms: 4000,
            timed_challenge_default_ms: 20_000,
        }
    }
}

impl SessionConfig {
    /// Parse a config from TOML and validate it.
    pub fn from_toml_str(source: &str) -> Result<Self, StoryError> {
        let config: SessionConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoryError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| StoryError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), StoryError> {
        if self.starting_lives == 0 {
            return Err(StoryError::InvalidConfig(
                "starting_lives must be at least 1".into(),
            ));
        }
        if self.timed_challenge_default_ms == 0 {
            return Err(StoryError::InvalidConfig(
                "timed_challenge_default_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn default_auto_advance(&self) -> Duration {
        Duration::from_millis(self.default_auto_advance_ms)
    }

    pub fn timed_challenge_default(&self) -> Duration {
        Duration::from_millis(self.timed_challenge_default_ms)
    }
}

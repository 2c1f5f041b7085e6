//! Runtime configuration.
//!
//! ```toml
//! refresh_interval_ticks = 20
//! title_refresh_interval_ticks = 20
//! tick_interval_ms = 50
//! align_shared_animations = true
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Scheduler and panel settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Re-evaluation interval for placeholder rows set without an explicit interval.
    pub refresh_interval_ticks: u32,
    /// Re-evaluation interval for placeholder titles.
    pub title_refresh_interval_ticks: u32,
    /// Period of a [`TickSource`](crate::TickSource) in milliseconds.
    pub tick_interval_ms: u64,
    /// Schedule shared-animation advances on multiples of their interval.
    pub align_shared_animations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_ticks: 20,
            title_refresh_interval_ticks: 20,
            tick_interval_ms: 50,
            align_shared_animations: true,
        }
    }
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Reject zero intervals.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_ticks == 0 {
            return Err(ConfigError::Invalid("refresh_interval_ticks must be positive"));
        }
        if self.title_refresh_interval_ticks == 0 {
            return Err(ConfigError::Invalid("title_refresh_interval_ticks must be positive"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive"));
        }
        Ok(())
    }

    /// Tick period as a [`Duration`].
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

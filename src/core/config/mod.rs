use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

/// Log configuration.
#[derive(Clone, Copy, Debug)]
pub struct LogConfig {
    pub level: LevelFilter,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: LevelFilter::Info }
    }
}

/// Producer/consumer workload run by the demo binary.
///
/// Every field is optional in the JSON file; missing ones take the
/// defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub producers: usize,
    pub consumers: usize,
    pub items_per_producer: usize,
    /// NDJSON journal output
    pub log_path: PathBuf,
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`
    pub level: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            producers: 4,
            consumers: 3,
            items_per_producer: 5,
            log_path: PathBuf::from("output.ndjson"),
            level: "info".to_string(),
        }
    }
}

impl DemoConfig {
    /// Load from a JSON file, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let shown = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: shown.clone(), source })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path: shown, source })
    }

    pub fn log_config(&self) -> Result<LogConfig, ConfigError> {
        let level = self
            .level
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::Level(self.level.clone()))?;
        Ok(LogConfig { level })
    }
}

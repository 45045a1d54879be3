//! Settings read from a TOML file.
//!
//! ```toml
//! [data]
//! pools = "./pools.json"
//!
//! [log]
//! level = "info"
//!
//! [display]
//! week_start = "sunday"
//! ```
//!
//! Every key is optional.

use crate::data::time::WeekStart;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where the config file is looked for when none is given.
pub const DEFAULT_CONFIG_PATH: &str = "./pool-hours.toml";

/// Error generated while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("could not read config file `{}`", path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML, or has a value of the wrong type.
    #[error("invalid config file `{}`", path.display())]
    Toml {
        /// The file that was being parsed.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: toml::de::Error,
    },
}

/// `[data]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Pools JSON file.
    pub pools: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            pools: PathBuf::from("./pools.json"),
        }
    }
}

/// `[log]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `info` or `pool_hours=debug`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `[display]`
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// First day of a displayed week.
    pub week_start: WeekStart,
}

/// All settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `[data]`
    pub data: DataConfig,
    /// `[log]`
    pub log: LogConfig,
    /// `[display]`
    pub display: DisplayConfig,
}

impl Config {
    /// Load settings.
    ///
    /// With `Some(path)` the file must exist. With [`None`],
    /// [`DEFAULT_CONFIG_PATH`] is tried and defaults are used if it is absent.
    ///
    /// # Errors
    ///
    /// See [`ConfigError`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// If `text` is not valid TOML or does not fit [`Config`].
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

//! Configuration management for incidentrec.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::DEFAULT_RECENT_COUNT;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name under the platform config directory.
const APP_DIR_NAME: &str = "incidentrec";

/// Default data directory name, placed under the user's documents folder.
const DATA_DIR_NAME: &str = "TeachersData";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "INCIDENTREC_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `INCIDENTREC_`, nested with `__`)
/// 2. TOML config file at `~/.config/incidentrec/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Display configuration.
    pub display: DisplayConfig,
}

/// Where the CSV files live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the CSV files.
    /// Defaults to `~/Documents/TeachersData`.
    pub data_dir: Option<PathBuf>,
    /// Teacher list file name.
    pub teachers_file: String,
    /// Student list file name.
    pub students_file: String,
    /// Incident log file name.
    pub incidents_file: String,
}

/// How results are shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Number of incidents in the recent-incidents display.
    pub recent_count: usize,
    /// Text shown when there are no incidents yet.
    pub placeholder: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None, // Resolved at runtime
            teachers_file: "teachers.csv".to_string(),
            students_file: "students.csv".to_string(),
            incidents_file: "incidents.csv".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            recent_count: DEFAULT_RECENT_COUNT,
            placeholder: "no incidents yet".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::document_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("teachers_file", &self.storage.teachers_file),
            ("students_file", &self.storage.students_file),
            ("incidents_file", &self.storage.incidents_file),
        ];

        for (key, name) in names {
            if name.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: format!("{key} must not be empty"),
                });
            }
            if name.contains(['/', '\\']) {
                return Err(Error::ConfigValidation {
                    message: format!("{key} must be a file name, not a path: {name}"),
                });
            }
        }

        for (i, (key_a, a)) in names.iter().enumerate() {
            for (key_b, b) in &names[i + 1..] {
                if a == b {
                    return Err(Error::ConfigValidation {
                        message: format!("{key_a} and {key_b} both name {a}"),
                    });
                }
            }
        }

        if self.display.recent_count == 0 {
            return Err(Error::ConfigValidation {
                message: "recent_count must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Text for the recent-incidents display: one line per incident, or the
    /// placeholder when there are none.
    #[must_use]
    pub fn render_recent(&self, lines: &[String]) -> String {
        if lines.is_empty() {
            self.display.placeholder.clone()
        } else {
            lines.join("\n")
        }
    }
}

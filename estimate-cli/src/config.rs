//! `estimator.toml` loading.
//!
//! Every section and field is optional; a missing file means all defaults.
//! Command-line flags are applied on top by the caller.

use std::path::{Path, PathBuf};
use std::time::Duration;

use estimate_core::db::DbConfig;
use estimate_core::wizard::SessionConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// The config file looked for in the working directory.
pub const CONFIG_FILE_NAME: &str = "estimator.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: String,
    pub connection_string: String,
}

impl StoreConfig {
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            backend: self.backend.clone(),
            connection_string: self.connection_string.clone(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: "estimates.db".to_string(),
        }
    }
}

fn default_fallback() -> StoreConfig {
    StoreConfig {
        backend: "local".to_string(),
        connection_string: "estimates-offline.json".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Pause before results are shown, in milliseconds.
    pub processing_delay_ms: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Bare level or full `EnvFilter` directive. `RUST_LOG` wins when set.
    pub level: String,
    /// Append log records to this file as well.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Primary store.
    pub database: StoreConfig,
    /// Used when the primary is unavailable or a save to it fails.
    pub fallback: StoreConfig,
    pub estimator: EstimatorConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: StoreConfig::default(),
            fallback: default_fallback(),
            estimator: EstimatorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            processing_delay: Duration::from_millis(self.estimator.processing_delay_ms),
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        for (section, store) in [("database", &self.database), ("fallback", &self.fallback)] {
            if store.backend.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("[{section}] backend is empty")));
            }
            if store.connection_string.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "[{section}] connection_string is empty"
                )));
            }
        }
        Ok(self)
    }
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(contents)?;
    config.validate()
}

/// Load and parse the config file at `path`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents)
}

/// Loads `explicit` when given (from `--config` or `ESTIMATOR_CONFIG`),
/// otherwise `estimator.toml` in `dir` if present, otherwise defaults.
pub fn load_or_default(explicit: Option<&Path>, dir: &Path) -> Result<AppConfig, ConfigError> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading config");
        return load_config(path);
    }

    let discovered = dir.join(CONFIG_FILE_NAME);
    if discovered.is_file() {
        debug!(path = %discovered.display(), "found config file");
        load_config(&discovered)
    } else {
        debug!("no config file found, using defaults");
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(parse_config("").unwrap(), AppConfig::default());
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();

        assert_eq!(config.database.db_config(), DbConfig {
            backend: "sqlite".to_string(),
            connection_string: "estimates.db".to_string(),
        });
        assert_eq!(config.fallback.backend, "local");
        assert_eq!(config.fallback.connection_string, "estimates-offline.json");
        assert_eq!(
            config.session_config().processing_delay,
            Duration::from_millis(3000)
        );
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, None);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
            [database]
            connection_string = "/var/lib/estimator/site.db"

            [estimator]
            processing_delay_ms = 0

            [logging]
            level = "debug"
            file = "estimator.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.backend, "sqlite");
        assert_eq!(config.database.connection_string, "/var/lib/estimator/site.db");
        assert_eq!(config.fallback, default_fallback());
        assert_eq!(config.session_config().processing_delay, Duration::ZERO);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("estimator.log")));
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let result = parse_config("[estimator]\nprocessing_delay_ms = \"soon\"\n");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn empty_backend_is_invalid() {
        let result = parse_config("[fallback]\nbackend = \"\"\n");

        assert!(matches!(result, Err(ConfigError::Invalid(msg)) if msg.contains("fallback")));
    }

    #[test]
    fn missing_explicit_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let result = load_or_default(Some(&missing), dir.path());

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn discovers_file_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[fallback]\nconnection_string = \":memory:\"\n",
        )
        .unwrap();

        let config = load_or_default(None, dir.path()).unwrap();

        assert_eq!(config.fallback.connection_string, ":memory:");
        assert_eq!(config.fallback.backend, "local");
    }

    #[test]
    fn no_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(
            load_or_default(None, dir.path()).unwrap(),
            AppConfig::default()
        );
    }
}

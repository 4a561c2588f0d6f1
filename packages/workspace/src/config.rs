//! Engine configuration, loaded from JSON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Undo levels kept per edit session (0 = unlimited)
    pub max_undo_levels: usize,
    /// Record version 1 when a page is created
    pub snapshot_on_create: bool,
    /// Appended to the source path when cloning (`/about` → `/about-copy`)
    pub clone_path_suffix: String,
    /// Candidate clone paths tried before giving up
    pub max_path_attempts: u32,
    /// Author recorded when a save names none
    pub system_author: String,
    pub telemetry: TelemetryConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_undo_levels: 100,
            snapshot_on_create: true,
            clone_path_suffix: "-copy".to_string(),
            max_path_attempts: 100,
            system_author: "system".to_string(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clone_path_suffix.is_empty() || self.clone_path_suffix.contains('/') {
            return Err(ConfigError::Invalid(
                "clone_path_suffix must be non-empty and contain no '/'".to_string(),
            ));
        }
        if self.max_path_attempts == 0 {
            return Err(ConfigError::Invalid("max_path_attempts must be at least 1".to_string()));
        }
        if self.system_author.trim().is_empty() {
            return Err(ConfigError::Invalid("system_author must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_undo_levels, 100);
        assert!(config.snapshot_on_create);
        assert_eq!(config.clone_path_suffix, "-copy");
        assert_eq!(config.telemetry.filter, "info");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "max_undo_levels": 5, "telemetry": { "json": true } }"#).unwrap();
        assert_eq!(config.max_undo_levels, 5);
        assert!(config.telemetry.json);
        assert_eq!(config.telemetry.filter, "info");
        assert_eq!(config.system_author, "system");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "clone_path_suffix": "" }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "max_path_attempts": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(EngineConfig::from_json_str("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "clone_path_suffix": "-dup" }}"#).unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.clone_path_suffix, "-dup");

        assert!(matches!(
            EngineConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}

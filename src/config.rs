//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::card::CardConfig;
use crate::service::NotifierConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub notifier: NotifierConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Cards shown on the board, in order
    #[serde(default)]
    pub cards: Vec<CardConfig>,
}

/// Item storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// SQLite database file
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

fn default_database() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("tasktree").join("tasktree.db"))
        .unwrap_or_else(|| PathBuf::from("./tasktree.db"))
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Append to this file instead of stderr
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("tasktree").join("config.toml")),
            Some(PathBuf::from("/etc/tasktree/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Check values serde cannot: card entities and channel capacity
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notifier.broadcast_capacity == 0 {
            return Err(ConfigError::Invalid(
                "notifier.broadcast_capacity must be at least 1".to_string(),
            ));
        }
        for card in &self.cards {
            card.validate()
                .map_err(|e| ConfigError::Invalid(format!("card {:?}: {}", card.entity, e)))?;
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `TASKTREE_*` overrides from `lookup`; unparseable values are ignored
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(database) = lookup("TASKTREE_DATABASE") {
            self.storage.database = PathBuf::from(database);
        }

        if let Some(capacity) = lookup("TASKTREE_BROADCAST_CAPACITY") {
            match capacity.parse::<usize>() {
                Ok(c) if c > 0 => self.notifier.broadcast_capacity = c,
                _ => tracing::warn!(value = %capacity, "Ignoring invalid TASKTREE_BROADCAST_CAPACITY"),
            }
        }

        if let Some(level) = lookup("TASKTREE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("TASKTREE_LOG_FORMAT") {
            match format.parse() {
                Ok(f) => self.logging.format = f,
                Err(e) => tracing::warn!("Ignoring TASKTREE_LOG_FORMAT: {}", e),
            }
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# tasktree configuration
#
# Environment variables override these settings:
# - TASKTREE_DATABASE
# - TASKTREE_BROADCAST_CAPACITY
# - TASKTREE_LOG_LEVEL
# - TASKTREE_LOG_FORMAT

[storage]
# SQLite database holding every list
database = "~/.local/share/tasktree/tasktree.db"

[notifier]
# Pending pushes kept per list before slow subscribers skip ahead
broadcast_capacity = 64

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/tasktree/tasktree.log"

# One block per card, shown in order
[[cards]]
entity = "todo.shopping"
title = "Shopping"
hide_completed = false
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.notifier.broadcast_capacity, 64);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.cards.is_empty());
        assert!(config.storage.database.ends_with("tasktree.db"));
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.cards.len(), 1);
        assert_eq!(config.cards[0].card_size(), 5);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [storage]
            database = "/tmp/lists.db"

            [logging]
            format = "json"

            [[cards]]
            entity = "todo.chores"
            "#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage.database, PathBuf::from("/tmp/lists.db"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.notifier.broadcast_capacity, 64);
        assert_eq!(config.cards[0].entity, "todo.chores");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();

        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[storage\n").unwrap();
        assert!(matches!(Config::load(&broken), Err(ConfigError::Parse { .. })));

        let foreign = dir.path().join("foreign.toml");
        std::fs::write(&foreign, "[[cards]]\nentity = \"light.porch\"\n").unwrap();
        assert!(matches!(Config::load(&foreign), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TASKTREE_DATABASE", "/data/t.db"),
            ("TASKTREE_BROADCAST_CAPACITY", "8"),
            ("TASKTREE_LOG_LEVEL", "debug"),
            ("TASKTREE_LOG_FORMAT", "yaml"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.storage.database, PathBuf::from("/data/t.db"));
        assert_eq!(config.notifier.broadcast_capacity, 8);
        assert_eq!(config.logging.level, "debug");
        // Unknown format leaves the default in place
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }
}

//! Configuration management for the todo application.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use statekit_persist::{FileStorage, MemoryStorage, PersistOptions, Storage};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while reading configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set to a value that cannot be parsed
    #[error("Invalid value '{value}' for {var}")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },
}

/// Which storage backend holds the settings record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// One file per key under `storage_dir`
    File,
    /// Process memory only; nothing survives a restart
    Memory,
}

/// Error returned when a storage backend name is not recognised
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown storage '{0}' (expected file or memory)")]
pub struct ParseStorageKindError(String);

impl FromStr for StorageKind {
    type Err = ParseStorageKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            _ => Err(ParseStorageKindError(s.to_string())),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Storage backend (`TODO_APP_STORAGE`, default `file`)
    pub storage: StorageKind,
    /// Directory for file storage (`TODO_APP_STORAGE_DIR`, default `.todo-app`)
    pub storage_dir: PathBuf,
    /// Key of the settings record (`TODO_APP_SETTINGS_KEY`, default `user-storage`)
    pub settings_key: String,
    /// Schema version of the settings record (`TODO_APP_SETTINGS_VERSION`, default `0`)
    pub settings_version: u32,
    /// Log filter used when `RUST_LOG` is unset (default `info`)
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::File,
            storage_dir: PathBuf::from(".todo-app"),
            settings_key: "user-storage".to_string(),
            settings_version: 0,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set but unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set but unparsable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let storage = match lookup("TODO_APP_STORAGE") {
            Some(value) => value.parse::<StorageKind>().map_err(|_| ConfigError::Invalid {
                var: "TODO_APP_STORAGE",
                value,
            })?,
            None => defaults.storage,
        };

        let settings_version = match lookup("TODO_APP_SETTINGS_VERSION") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "TODO_APP_SETTINGS_VERSION",
                value,
            })?,
            None => defaults.settings_version,
        };

        Ok(Self {
            storage,
            storage_dir: lookup("TODO_APP_STORAGE_DIR")
                .map_or(defaults.storage_dir, PathBuf::from),
            settings_key: lookup("TODO_APP_SETTINGS_KEY").unwrap_or(defaults.settings_key),
            settings_version,
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
        })
    }

    /// Build the configured storage backend
    #[must_use]
    pub fn build_storage(&self) -> Arc<dyn Storage> {
        match self.storage {
            StorageKind::File => Arc::new(FileStorage::new(self.storage_dir.clone())),
            StorageKind::Memory => Arc::new(MemoryStorage::new()),
        }
    }

    /// Persistence options for the settings store
    #[must_use]
    pub fn settings_persist_options(&self) -> PersistOptions {
        PersistOptions::new(self.settings_key.clone()).with_version(self.settings_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.settings_key, "user-storage");
    }

    #[test]
    fn reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            ("TODO_APP_STORAGE", "Memory"),
            ("TODO_APP_STORAGE_DIR", "/var/lib/todo"),
            ("TODO_APP_SETTINGS_KEY", "settings"),
            ("TODO_APP_SETTINGS_VERSION", "3"),
            ("RUST_LOG", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.storage, StorageKind::Memory);
        assert_eq!(config.storage_dir, PathBuf::from("/var/lib/todo"));
        assert_eq!(config.settings_key, "settings");
        assert_eq!(config.settings_version, 3);
        assert_eq!(config.log_level, "debug");

        let options = config.settings_persist_options();
        assert_eq!(options.key, "settings");
        assert_eq!(options.version, 3);
    }

    #[test]
    fn rejects_unknown_storage() {
        let error = AppConfig::from_lookup(lookup(&[("TODO_APP_STORAGE", "s3")])).unwrap_err();
        assert_eq!(
            error,
            ConfigError::Invalid {
                var: "TODO_APP_STORAGE",
                value: "s3".to_string()
            }
        );
    }

    #[test]
    fn storage_kind_parse_error_names_value() {
        assert_eq!("MEMORY".parse::<StorageKind>(), Ok(StorageKind::Memory));
        let error = "s3".parse::<StorageKind>().unwrap_err();
        assert_eq!(error, ParseStorageKindError("s3".to_string()));
        assert_eq!(error.to_string(), "unknown storage 's3' (expected file or memory)");
    }

    #[test]
    fn rejects_bad_version() {
        let result = AppConfig::from_lookup(lookup(&[("TODO_APP_SETTINGS_VERSION", "v2")]));
        assert!(result.is_err());
    }

    #[test]
    fn memory_storage_starts_empty() {
        let config = AppConfig {
            storage: StorageKind::Memory,
            ..AppConfig::default()
        };
        let storage = config.build_storage();
        assert!(storage.read("user-storage").unwrap().is_none());
    }
}

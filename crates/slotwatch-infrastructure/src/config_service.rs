//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the root configuration
//! from the configuration file (~/.config/slotwatch/config.toml).

use crate::paths::SlotwatchPaths;
use crate::storage::ConfigStorage;
use slotwatch_core::config::RootConfig;
use slotwatch_core::{Result, SlotwatchError};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the root configuration.
///
/// This implementation reads the configuration from config.toml
/// and caches it to avoid repeated file I/O operations.
#[derive(Clone)]
pub struct ConfigService {
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
    storage: Arc<ConfigStorage>,
}

impl ConfigService {
    pub fn new(storage: ConfigStorage) -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            storage: Arc::new(storage),
        }
    }

    pub fn from_paths(paths: &SlotwatchPaths) -> Result<Self> {
        let path = paths
            .config_file()
            .map_err(|e| SlotwatchError::config(e.to_string()))?;
        Ok(Self::new(ConfigStorage::new(path)))
    }

    /// Gets the root configuration, loading from file if not cached.
    ///
    /// An unreadable or invalid file falls back to defaults with a warning.
    pub fn get_config(&self) -> RootConfig {
        if let Ok(read_lock) = self.config.read() {
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = match self.storage.load() {
            Ok(Some(config)) => config,
            Ok(None) => RootConfig::default(),
            Err(e) => {
                tracing::warn!(
                    "Failed to load {}: {}; using defaults",
                    self.storage.path().display(),
                    e
                );
                RootConfig::default()
            }
        };

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Persists `config` and refreshes the cache.
    pub fn save(&self, config: &RootConfig) -> Result<()> {
        self.storage.save(config)?;
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(config.clone());
        }
        Ok(())
    }

    /// Writes a default config.toml if none exists. Returns `true` when a
    /// new file was written.
    pub fn init_default(&self) -> Result<bool> {
        if self.storage.path().exists() {
            return Ok(false);
        }
        self.save(&RootConfig::default())?;
        Ok(true)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    pub fn path(&self) -> &Path {
        self.storage.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn service_in(dir: &TempDir) -> ConfigService {
        ConfigService::from_paths(&SlotwatchPaths::new(Some(dir.path()))).unwrap()
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = service_in(&temp_dir);
        assert_eq!(service.get_config(), RootConfig::default());
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.toml"), "polling = [").unwrap();
        let service = service_in(&temp_dir);
        assert_eq!(service.get_config(), RootConfig::default());
    }

    #[test]
    fn test_init_default_then_reload() {
        let temp_dir = TempDir::new().unwrap();
        let service = service_in(&temp_dir);

        assert!(service.init_default().unwrap());
        assert!(!service.init_default().unwrap());

        let written = fs::read_to_string(service.path()).unwrap();
        assert!(written.contains("interval_ms = 15000"));
        assert!(written.contains("consulate = \"Toronto, Canada\""));
    }

    #[test]
    fn test_cache_and_invalidate() {
        let temp_dir = TempDir::new().unwrap();
        let service = service_in(&temp_dir);
        assert_eq!(service.get_config().polling.interval_ms, 15_000);

        fs::write(
            temp_dir.path().join("config.toml"),
            "[polling]\ninterval_ms = 60000\n",
        )
        .unwrap();
        assert_eq!(service.get_config().polling.interval_ms, 15_000);

        service.invalidate_cache();
        assert_eq!(service.get_config().polling.interval_ms, 60_000);
    }

    #[test]
    fn test_save_updates_cache() {
        let temp_dir = TempDir::new().unwrap();
        let service = service_in(&temp_dir);

        let mut config = service.get_config();
        config.oracle.temperature = 0.2;
        service.save(&config).unwrap();

        assert_eq!(service.get_config().oracle.temperature, 0.2);
        service.invalidate_cache();
        assert_eq!(service.get_config().oracle.temperature, 0.2);
    }
}

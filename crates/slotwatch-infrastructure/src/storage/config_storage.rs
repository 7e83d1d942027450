//! config.toml storage with atomic writes.

use slotwatch_core::SlotwatchError;
use slotwatch_core::config::RootConfig;
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

/// Errors that can occur during config storage operations.
#[derive(Debug)]
pub enum ConfigStorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parsing error.
    TomlParseError(toml::de::Error),
    /// TOML serialization error.
    TomlSerError(toml::ser::Error),
}

impl std::fmt::Display for ConfigStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigStorageError::TomlParseError(e) => write!(f, "TOML parse error: {}", e),
            ConfigStorageError::TomlSerError(e) => write!(f, "TOML serialization error: {}", e),
        }
    }
}

impl std::error::Error for ConfigStorageError {}

impl From<std::io::Error> for ConfigStorageError {
    fn from(e: std::io::Error) -> Self {
        ConfigStorageError::IoError(e)
    }
}

impl From<toml::de::Error> for ConfigStorageError {
    fn from(e: toml::de::Error) -> Self {
        ConfigStorageError::TomlParseError(e)
    }
}

impl From<toml::ser::Error> for ConfigStorageError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigStorageError::TomlSerError(e)
    }
}

impl From<ConfigStorageError> for SlotwatchError {
    fn from(e: ConfigStorageError) -> Self {
        match e {
            ConfigStorageError::IoError(err) => err.into(),
            ConfigStorageError::TomlParseError(err) => err.into(),
            ConfigStorageError::TomlSerError(err) => err.into(),
        }
    }
}

/// Storage for config.toml.
///
/// Responsibilities:
/// - Load config.toml into `RootConfig` (missing or empty file → `None`)
/// - Save `RootConfig` atomically (tmp file + fsync + rename)
///
/// Does NOT:
/// - Cache anything (see `ConfigService`)
/// - Touch secrets (see `SecretStorage`)
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates a new config storage handle.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the config file (usually config.toml)
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the config file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(RootConfig))`: Successfully loaded and parsed
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<RootConfig>, ConfigStorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let config = toml::from_str(&content)?;
        Ok(Some(config))
    }

    /// Saves the config atomically.
    ///
    /// Uses a temporary file + atomic rename to ensure durability.
    pub fn save(&self, config: &RootConfig) -> Result<(), ConfigStorageError> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(config)?;

        // Write to temporary file in the same directory
        let tmp_path = temp_path(&self.path)?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;

        // Ensure data is written to disk
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Gets a temporary file path next to `path` for atomic writes.
fn temp_path(path: &Path) -> Result<PathBuf, ConfigStorageError> {
    let invalid = |msg: &str| {
        ConfigStorageError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidInput, msg))
    };
    let parent = path
        .parent()
        .ok_or_else(|| invalid("Path has no parent directory"))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| invalid("Path has no file name"))?;

    Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().join("config.toml"));

        let mut config = RootConfig::default();
        config.polling.interval_ms = 20_000;
        config.query = config.query.with_country("Mexico");

        storage.save(&config).unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded, config);
        // no temp file left behind
        assert!(!temp_dir.path().join(".config.toml.tmp").exists());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().join("nonexistent.toml"));

        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_load_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.toml");
        fs::write(&file_path, "  \n").unwrap();

        assert!(ConfigStorage::new(file_path).load().unwrap().is_none());
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.toml");
        fs::write(&file_path, "[polling\ninterval_ms = ").unwrap();

        let result = ConfigStorage::new(file_path).load();
        assert!(matches!(result, Err(ConfigStorageError::TomlParseError(_))));
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("config.toml");
        let storage = ConfigStorage::new(file_path.clone());

        storage.save(&RootConfig::default()).unwrap();
        assert!(file_path.exists());
    }
}

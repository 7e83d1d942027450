//! Unified path management for slotwatch configuration files.
//!
//! This ensures consistency across all platforms (Linux, macOS, Windows).

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "slotwatch";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Files managed under the configuration directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    Secret,
    Logs,
}

/// Unified path management for slotwatch.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/slotwatch/         # Config directory
/// ├── config.toml              # Application configuration
/// ├── secret.json              # API keys
/// └── logs/                    # Application logs
///     └── slotwatch.log.YYYY-MM-DD
/// ```
///
/// A base path replaces `~/.config/slotwatch` entirely, which tests use to
/// stay inside a temporary directory.
#[derive(Debug, Clone, Default)]
pub struct SlotwatchPaths {
    base: Option<PathBuf>,
}

impl SlotwatchPaths {
    pub fn new(base_path: Option<&Path>) -> Self {
        Self {
            base: base_path.map(Path::to_path_buf),
        }
    }

    /// Returns the slotwatch configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/slotwatch/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Resolves the path of a managed file or directory.
    pub fn get_path(&self, service: ServiceType) -> Result<PathBuf, PathError> {
        let dir = self.config_dir()?;
        Ok(match service {
            ServiceType::Config => dir.join("config.toml"),
            ServiceType::Secret => dir.join("secret.json"),
            ServiceType::Logs => dir.join("logs"),
        })
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        self.get_path(ServiceType::Config)
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        self.get_path(ServiceType::Secret)
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        self.get_path(ServiceType::Logs)
    }
}

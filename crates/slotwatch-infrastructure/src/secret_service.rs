//! Secret service implementation.
//!
//! This module provides a service for managing secret configuration (API keys)
//! stored in secret.json, with environment variables taking precedence.

use crate::paths::SlotwatchPaths;
use crate::storage::{SecretStorage, SecretStorageError};
use anyhow::Result;
use slotwatch_core::config::{GeminiConfig, SecretConfig};
use slotwatch_core::secret::SecretService;
use std::sync::{Arc, RwLock};

/// Environment variables consulted for the Gemini key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Service for managing secret configuration.
///
/// Reads secret.json once and caches the result. A key found in the
/// environment overrides whatever the file contains. A missing file is not
/// an error here; the oracle reports missing credentials when it is built.
///
/// # Example
///
/// ```ignore
/// use slotwatch_infrastructure::SecretServiceImpl;
/// use slotwatch_core::secret::SecretService;
///
/// let service = SecretServiceImpl::from_env(&SlotwatchPaths::default())?;
/// let secrets = service.load_secrets().await?;
/// ```
#[derive(Clone)]
pub struct SecretServiceImpl {
    /// Cached secret config loaded from storage.
    secrets: Arc<RwLock<Option<SecretConfig>>>,
    storage: Arc<SecretStorage>,
    api_key_override: Option<String>,
}

impl SecretServiceImpl {
    /// Creates a service over `storage` without any environment override.
    pub fn new(storage: SecretStorage) -> Self {
        Self {
            secrets: Arc::new(RwLock::new(None)),
            storage: Arc::new(storage),
            api_key_override: None,
        }
    }

    /// Creates a service for the default secret file, honoring
    /// `GEMINI_API_KEY` / `API_KEY`.
    pub fn from_env(paths: &SlotwatchPaths) -> Result<Self> {
        let storage = SecretStorage::new(paths)
            .map_err(|e| anyhow::anyhow!("Failed to get secret path: {}", e))?;
        let mut service = Self::new(storage);
        service.api_key_override = API_KEY_ENV_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok())
            .filter(|key| !key.trim().is_empty());
        Ok(service)
    }

    /// Forces the Gemini key regardless of file contents.
    pub fn with_api_key_override(mut self, api_key: impl Into<String>) -> Self {
        self.api_key_override = Some(api_key.into());
        self
    }

    /// Loads the secrets from storage if not already cached.
    fn load_secrets_internal(&self) -> Result<SecretConfig, String> {
        // Check if already cached
        {
            let read_lock = self
                .secrets
                .read()
                .map_err(|_| "Secret cache lock poisoned".to_string())?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = match self.storage.load() {
            Ok(config) => config,
            Err(SecretStorageError::NotFound(path)) => {
                tracing::debug!("No secret file at {}", path.display());
                SecretConfig::default()
            }
            Err(e) => return Err(format!("Failed to load secret.json: {}", e)),
        };

        if let Some(key) = &self.api_key_override {
            let model_name = loaded.gemini.as_ref().and_then(|g| g.model_name.clone());
            loaded.gemini = Some(GeminiConfig {
                api_key: key.clone(),
                model_name,
            });
        }

        // Cache it
        {
            let mut write_lock = self
                .secrets
                .write()
                .map_err(|_| "Secret cache lock poisoned".to_string())?;
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig, String> {
        self.load_secrets_internal()
    }

    async fn secret_file_exists(&self) -> bool {
        self.storage.path().exists()
    }
}

//! Start-up wiring shared by the front-ends.

use crate::polling::{ControllerEvent, ControllerSettings, PollingController};
use anyhow::{Context, Result};
use slotwatch_core::config::RootConfig;
use slotwatch_core::{AppointmentQuery, DateOracle, OracleError, TargetMonth};
use slotwatch_infrastructure::storage::SecretStorage;
use slotwatch_infrastructure::{ConfigService, SecretServiceImpl, SlotwatchPaths};
use slotwatch_interaction::GeminiDateOracle;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Everything a front-end needs to build controllers.
pub struct AppContext {
    pub paths: SlotwatchPaths,
    pub config: RootConfig,
    pub oracle: Arc<dyn DateOracle>,
}

impl AppContext {
    /// Loads config.toml and secrets, then builds the Gemini oracle.
    ///
    /// Missing credentials abort start-up with a message naming the secret file.
    pub async fn load(paths: SlotwatchPaths) -> Result<Self> {
        let config_service = ConfigService::from_paths(&paths)?;
        tracing::info!(
            "[Bootstrap] Loading configuration from {}",
            config_service.path().display()
        );
        let config = config_service.get_config();

        let secret_service = SecretServiceImpl::from_env(&paths)?;
        let oracle = GeminiDateOracle::try_from_secrets(&secret_service, &config.oracle)
            .await
            .map_err(|e| match e {
                OracleError::MissingCredentials => {
                    let location = paths
                        .secret_file()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| "secret.json".to_string());
                    anyhow::anyhow!(
                        "No Gemini API key configured. Set GEMINI_API_KEY or add it to {location}"
                    )
                }
                other => anyhow::Error::new(other).context("Failed to initialize Gemini oracle"),
            })?;
        tracing::info!("[Bootstrap] Gemini oracle ready (model: {})", oracle.model());

        Ok(Self {
            paths,
            config,
            oracle: Arc::new(oracle),
        })
    }

    pub fn settings(&self) -> ControllerSettings {
        ControllerSettings::from(&self.config.polling)
    }

    /// The query configured in config.toml.
    pub fn default_query(&self) -> AppointmentQuery {
        self.config.query.clone()
    }

    pub fn controller(
        &self,
        query: AppointmentQuery,
        month: TargetMonth,
        events: Option<UnboundedSender<ControllerEvent>>,
    ) -> PollingController {
        let oracle = Arc::clone(&self.oracle);
        match events {
            Some(tx) => PollingController::with_events(oracle, query, month, self.settings(), tx),
            None => PollingController::new(oracle, query, month, self.settings()),
        }
    }
}

/// Files touched by [`init_config_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub config_file: PathBuf,
    pub config_created: bool,
    pub secret_file: PathBuf,
    pub secret_created: bool,
}

/// Writes a default config.toml and an empty secret.json template where missing.
pub fn init_config_files(paths: &SlotwatchPaths) -> Result<InitReport> {
    let config_service = ConfigService::from_paths(paths)?;
    let config_created = config_service
        .init_default()
        .context("Failed to write config.toml")?;

    let secret_storage = SecretStorage::new(paths)?;
    let secret_created = secret_storage
        .ensure_template()
        .context("Failed to write secret.json")?;

    if config_created || secret_created {
        tracing::info!(config_created, secret_created, "Initialized configuration files");
    }

    Ok(InitReport {
        config_file: config_service.path().to_path_buf(),
        config_created,
        secret_file: secret_storage.path().clone(),
        secret_created,
    })
}

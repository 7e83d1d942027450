//! GeminiDateOracle - asks the Gemini REST API for plausible appointment dates.
//!
//! Credentials come from secret.json (or the environment override handled by
//! the secret service); model, temperature and timeout come from config.toml.

use crate::prompt::{availability_prompt, dates_response_schema};
use crate::response::parse_dates;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slotwatch_core::config::{OracleConfig, SecretConfig};
use slotwatch_core::secret::SecretService;
use slotwatch_core::{AppointmentQuery, DateKey, DateOracle, OracleError, TargetMonth};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// [`DateOracle`] backed by Gemini structured output.
#[derive(Clone)]
pub struct GeminiDateOracle {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl GeminiDateOracle {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
            temperature: slotwatch_core::config::DEFAULT_TEMPERATURE,
        }
    }

    /// Points the oracle at a different endpoint root (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Builds an oracle from loaded configuration.
    ///
    /// The model in config.toml takes precedence over the one in secret.json.
    pub fn from_config(config: &OracleConfig, secrets: &SecretConfig) -> Result<Self, OracleError> {
        let api_key = secrets
            .gemini_api_key()
            .ok_or(OracleError::MissingCredentials)?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| OracleError::InvalidRequest(format!("Failed to build HTTP client: {e}")))?;

        let model = if config.model.trim().is_empty() {
            secrets
                .gemini
                .as_ref()
                .and_then(|g| g.model_name.clone())
                .unwrap_or_else(|| slotwatch_core::config::DEFAULT_GEMINI_MODEL.to_string())
        } else {
            config.model.clone()
        };

        let oracle = Self {
            client,
            api_key: api_key.to_string(),
            model,
            base_url: GEMINI_BASE_URL.to_string(),
            temperature: slotwatch_core::config::DEFAULT_TEMPERATURE,
        }
        .with_temperature(config.temperature);

        Ok(match config.base_url.as_deref() {
            Some(url) if !url.trim().is_empty() => oracle.with_base_url(url),
            _ => oracle,
        })
    }

    /// Loads secrets through `service` and builds the oracle.
    pub async fn try_from_secrets(
        service: &dyn SecretService,
        config: &OracleConfig,
    ) -> Result<Self, OracleError> {
        let secrets = service.load_secrets().await.map_err(|e| {
            tracing::warn!("Failed to load secrets: {}", e);
            OracleError::MissingCredentials
        })?;
        Self::from_config(config, &secrets)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, OracleError> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|err| OracleError::Transport {
                message: format!("Gemini API request failed: {err}"),
                retryable: err.is_connect() || err.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| OracleError::malformed(format!("Failed to parse Gemini response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl DateOracle for GeminiDateOracle {
    async fn fetch(
        &self,
        query: &AppointmentQuery,
        month: TargetMonth,
    ) -> Result<Vec<DateKey>, OracleError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: availability_prompt(query, month)?,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: dates_response_schema(),
                temperature: self.temperature,
            },
        };

        tracing::debug!(
            model = %self.model,
            consulate = %query.consulate,
            month = %month,
            "Requesting availability from Gemini"
        );

        let text = self.send_request(&request).await?;
        let dates = parse_dates(&text)?;

        tracing::debug!(count = dates.len(), "Gemini returned dates");
        Ok(dates)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, OracleError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| OracleError::malformed("Gemini API returned no text in the response candidates"))
}

fn map_http_error(status: StatusCode, body: String) -> OracleError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    OracleError::Http {
        status: status.as_u16(),
        message,
        retryable,
    }
}

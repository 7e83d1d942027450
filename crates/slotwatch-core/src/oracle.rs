//! Date oracle interface.
//!
//! The oracle is the external collaborator that reports which dates are
//! currently believed available for a query and month. The polling core only
//! depends on this trait; `slotwatch-interaction` provides the HTTP-backed
//! implementation.

use crate::calendar::{DateKey, TargetMonth};
use crate::query::AppointmentQuery;
use thiserror::Error;

/// Failure of a single oracle call.
///
/// None of these are fatal to the polling core: every variant is logged and
/// treated as an empty result for the scan that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The request never produced an HTTP response (connect, timeout, ...)
    #[error("Oracle transport failure: {message}")]
    Transport { message: String, retryable: bool },

    /// The service answered with a non-success status
    #[error("Oracle returned HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        retryable: bool,
    },

    /// The call succeeded but the payload did not have the expected shape
    #[error("Malformed oracle response: {0}")]
    MalformedResponse(String),

    /// The request could not be built (prompt rendering, client setup)
    #[error("Oracle request could not be built: {0}")]
    InvalidRequest(String),

    /// No API key is configured for the oracle
    #[error("Oracle credentials are not configured")]
    MissingCredentials,
}

impl OracleError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }

    /// Whether a later attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { retryable, .. } | Self::Http { retryable, .. } => *retryable,
            Self::MalformedResponse(_) => true,
            Self::InvalidRequest(_) | Self::MissingCredentials => false,
        }
    }
}

/// Source of available appointment dates.
///
/// Implementations return dates normalized to [`DateKey`]; ordering of the
/// returned vector is not relied upon.
#[async_trait::async_trait]
pub trait DateOracle: Send + Sync {
    /// Fetches the dates currently believed available in `month`.
    async fn fetch(
        &self,
        query: &AppointmentQuery,
        month: TargetMonth,
    ) -> Result<Vec<DateKey>, OracleError>;
}

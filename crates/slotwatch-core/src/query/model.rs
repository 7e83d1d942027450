use super::catalog;
use serde::{Deserialize, Serialize};

/// What the oracle is asked about.
///
/// The fields are opaque to the polling core; only the catalog and the
/// oracle implementation give them meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppointmentQuery {
    pub country: String,
    pub consulate: String,
    pub visa_type: String,
}

impl AppointmentQuery {
    pub fn new(
        country: impl Into<String>,
        consulate: impl Into<String>,
        visa_type: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            consulate: consulate.into(),
            visa_type: visa_type.into(),
        }
    }

    /// Switches country and resets the consulate to that country's first one.
    ///
    /// Unknown countries leave the consulate empty.
    pub fn with_country(&self, country: &str) -> Self {
        let consulate = catalog::default_consulate(country)
            .map(|c| c.value.to_string())
            .unwrap_or_default();
        Self {
            country: country.to_string(),
            consulate,
            visa_type: self.visa_type.clone(),
        }
    }

    pub fn with_consulate(&self, consulate: impl Into<String>) -> Self {
        Self {
            consulate: consulate.into(),
            ..self.clone()
        }
    }

    pub fn with_visa_type(&self, visa_type: impl Into<String>) -> Self {
        Self {
            visa_type: visa_type.into(),
            ..self.clone()
        }
    }

    /// Whether the consulate is one the catalog lists for this country.
    pub fn is_consistent(&self) -> bool {
        catalog::consulates(&self.country)
            .iter()
            .any(|c| c.value == self.consulate)
    }
}

impl Default for AppointmentQuery {
    fn default() -> Self {
        Self::new(
            catalog::DEFAULT_COUNTRY,
            catalog::DEFAULT_CONSULATE,
            catalog::DEFAULT_VISA_TYPE,
        )
    }
}

pub mod config;
pub mod find;
pub mod locations;
pub mod watch;

use anyhow::{Result, bail};
use clap::Args;
use slotwatch_core::query::catalog;
use slotwatch_core::{AppointmentQuery, TargetMonth};

/// Location and month selection shared by `find` and `watch`.
///
/// Anything left out falls back to config.toml and the current month.
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Country, e.g. "India"
    #[arg(long)]
    pub country: Option<String>,

    /// Consulate name within the country, e.g. "Mumbai"
    #[arg(long)]
    pub consulate: Option<String>,

    /// Visa type or its code, e.g. "H-1B"
    #[arg(long)]
    pub visa: Option<String>,

    /// Month to search, as YYYY-MM
    #[arg(long, value_name = "YYYY-MM")]
    pub month: Option<TargetMonth>,
}

impl SearchArgs {
    /// Applies the flags on top of `base`.
    pub fn resolve(&self, base: &AppointmentQuery) -> Result<(AppointmentQuery, TargetMonth)> {
        let mut query = base.clone();

        if let Some(name) = &self.country {
            let Some(country) = catalog::find_country(name) else {
                bail!("Unknown country '{name}'. Run `slotwatch locations` for the list.");
            };
            query = query.with_country(country.name);
        }

        if let Some(name) = &self.consulate {
            let Some(consulate) = catalog::find_consulate(&query.country, name) else {
                bail!("No consulate '{name}' in {}.", query.country);
            };
            query = query.with_consulate(consulate.value);
        }

        if let Some(name) = &self.visa {
            let Some(visa) = catalog::find_visa_type(name) else {
                bail!("Unknown visa type '{name}'.");
            };
            query = query.with_visa_type(visa);
        }

        Ok((query, self.month.unwrap_or_else(TargetMonth::current)))
    }
}

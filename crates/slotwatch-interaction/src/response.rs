//! Decoding of the oracle's `{"dates": [...]}` payload.

use serde_json::Value;
use slotwatch_core::{DateKey, OracleError};

/// Extracts the dates from the model's JSON text.
///
/// Any deviation from the expected shape is a `MalformedResponse`: invalid
/// JSON, a missing or non-array `dates` field, a non-string entry, or an
/// entry that is not a calendar date. The result is sorted and free of
/// duplicates.
pub fn parse_dates(text: &str) -> Result<Vec<DateKey>, OracleError> {
    let payload: Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| OracleError::malformed(format!("response is not JSON: {e}")))?;

    let entries = payload
        .get("dates")
        .ok_or_else(|| OracleError::malformed("missing \"dates\" field"))?
        .as_array()
        .ok_or_else(|| OracleError::malformed("\"dates\" is not an array"))?;

    let mut dates = entries
        .iter()
        .map(|entry| {
            let raw = entry
                .as_str()
                .ok_or_else(|| OracleError::malformed(format!("non-string date entry: {entry}")))?;
            DateKey::parse(raw).map_err(|e| OracleError::malformed(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    dates.sort();
    dates.dedup();
    Ok(dates)
}

/// Models occasionally wrap JSON in a markdown fence despite the mime type.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

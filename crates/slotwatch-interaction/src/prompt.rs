//! Prompt and response schema sent to the generative oracle.

use minijinja::{Environment, context};
use serde_json::{Value, json};
use slotwatch_core::{AppointmentQuery, OracleError, TargetMonth};

const AVAILABILITY_TEMPLATE: &str = r#"You simulate the appointment scheduling system of a US consulate.
Consulate: {{ consulate }}
Visa type: {{ visa_type }}
Month: {{ month_name }} {{ year }}

Generate a plausible list of {{ min_dates }} to {{ max_dates }} available appointment dates in that month.
Do not make every day available. Appointments only happen on weekdays (Monday-Friday), and some weeks may have no availability at all.
Answer with a JSON object whose single key "dates" is an array of strings in YYYY-MM-DD format.
If the whole month has no availability, return an empty "dates" array."#;

/// Renders the availability prompt for `query` in `month`.
pub fn availability_prompt(
    query: &AppointmentQuery,
    month: TargetMonth,
) -> Result<String, OracleError> {
    let env = Environment::new();
    env.render_str(
        AVAILABILITY_TEMPLATE,
        context! {
            consulate => &query.consulate,
            visa_type => &query.visa_type,
            month_name => month.name(),
            year => month.year(),
            min_dates => 5,
            max_dates => 10,
        },
    )
    .map_err(|e| OracleError::InvalidRequest(format!("Failed to render prompt: {e}")))
}

/// Structured-output schema: an object with one required string array.
pub fn dates_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "dates": {
                "type": "ARRAY",
                "items": {
                    "type": "STRING",
                    "description": "A date in YYYY-MM-DD format"
                }
            }
        },
        "required": ["dates"]
    })
}

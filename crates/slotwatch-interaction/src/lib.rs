//! Oracle implementations that talk to external services.

pub mod gemini_oracle;
pub mod prompt;
pub mod response;

pub use gemini_oracle::{GEMINI_BASE_URL, GeminiDateOracle};
pub use response::parse_dates;

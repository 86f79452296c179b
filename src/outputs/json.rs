//! JSON export.
//!
//! The aggregate is written as one pretty-printed object keyed by country
//! code, countries in API order:
//!
//! ```json
//! {
//!   "fr": [{ "first_name": "…", "summary": "…", … }],
//!   "us": []
//! }
//! ```
//!
//! Non-ASCII text (accents, Cyrillic, Arabic) is written as-is, not escaped.

use crate::error::Result;
use crate::models::LeadersByCountry;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Serialize `leaders` to a pretty JSON string.
pub fn to_json_string(leaders: &LeadersByCountry) -> Result<String> {
    Ok(serde_json::to_string_pretty(leaders)?)
}

/// Write `leaders` to `path` as JSON.
#[instrument(level = "info", skip(leaders), fields(path = %path.display()))]
pub async fn write_leaders(leaders: &LeadersByCountry, path: &Path) -> Result<()> {
    let json = to_json_string(leaders)?;
    fs::write(path, json).await?;
    info!(countries = leaders.len(), "Wrote JSON export");
    Ok(())
}

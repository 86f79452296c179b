//! CSV export.
//!
//! One row per leader with the columns
//! `Country, First Name, Last Name, Wikipedia URL, Summary`. Missing and
//! `null` values are written as empty cells; other non-string values are
//! written as their JSON text. Line breaks inside the summary are replaced
//! with spaces so every leader stays on a single line.

use crate::error::Result;
use crate::models::{FIRST_NAME, LAST_NAME, Leader, LeadersByCountry, WIKIPEDIA_URL};
use serde_json::Value;
use std::path::Path;
use tracing::{info, instrument};

/// Column titles, in row order.
pub const HEADER: [&str; 5] = ["Country", "First Name", "Last Name", "Wikipedia URL", "Summary"];

/// Render `leaders` as CSV bytes.
///
/// # Arguments
///
/// * `leaders` - The aggregate to render, one row per leader in country order
///
/// # Returns
///
/// The encoded document, header row included.
pub fn to_csv_bytes(leaders: &LeadersByCountry) -> Result<Vec<u8>> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for (country, batch) in leaders.iter() {
        for leader in batch {
            let summary = flatten_newlines(leader.summary().unwrap_or_default());
            writer.write_record([
                country,
                &cell(leader, FIRST_NAME),
                &cell(leader, LAST_NAME),
                &cell(leader, WIKIPEDIA_URL),
                summary.as_str(),
            ])?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()).into())
}

/// Write `leaders` to `path` as CSV.
#[instrument(level = "info", skip(leaders), fields(path = %path.display()))]
pub async fn write_leaders(leaders: &LeadersByCountry, path: &Path) -> Result<()> {
    let bytes = to_csv_bytes(leaders)?;
    tokio::fs::write(path, bytes).await?;
    info!(rows = leaders.leader_count(), "Wrote CSV export");
    Ok(())
}

fn cell(leader: &Leader, key: &str) -> String {
    match leader.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn flatten_newlines(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

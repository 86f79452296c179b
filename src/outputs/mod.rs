//! Export of the aggregated leaders to files.
//!
//! # Submodules
//!
//! - [`json`]: One JSON object keyed by country code
//! - [`csv`]: One flat row per leader
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── leaders_data.json
//! └── leaders_data.csv
//! ```

pub mod csv;
pub mod json;

use crate::error::Result;
use crate::models::LeadersByCountry;
use crate::utils::ensure_writable_dir;
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// File name of the JSON export inside the output directory.
pub const JSON_FILENAME: &str = "leaders_data.json";
/// File name of the CSV export inside the output directory.
pub const CSV_FILENAME: &str = "leaders_data.csv";

/// Which file(s) to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Both,
}

impl OutputFormat {
    /// Whether this format includes the JSON file.
    pub fn writes_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }

    /// Whether this format includes the CSV file.
    pub fn writes_csv(self) -> bool {
        matches!(self, OutputFormat::Csv | OutputFormat::Both)
    }
}

/// Write `leaders` into `output_dir` in the requested format(s).
///
/// The directory is created (and probed for writability) first. Returns the
/// paths written, JSON before CSV.
#[instrument(level = "info", skip(leaders), fields(output_dir = %output_dir.display()))]
pub async fn export(
    leaders: &LeadersByCountry,
    format: OutputFormat,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    ensure_writable_dir(output_dir).await?;

    let mut written = Vec::new();
    if format.writes_json() {
        let path = output_dir.join(JSON_FILENAME);
        json::write_leaders(leaders, &path).await?;
        written.push(path);
    }
    if format.writes_csv() {
        let path = output_dir.join(CSV_FILENAME);
        csv::write_leaders(leaders, &path).await?;
        written.push(path);
    }
    info!(files = written.len(), "Export complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Leader;

    fn sample() -> LeadersByCountry {
        let mut all = LeadersByCountry::new();
        all.insert(
            "fr",
            vec![Leader::new("Jacques", "Chirac")],
        );
        all
    }

    #[test]
    fn test_format_flags() {
        assert!(OutputFormat::Json.writes_json() && !OutputFormat::Json.writes_csv());
        assert!(!OutputFormat::Csv.writes_json() && OutputFormat::Csv.writes_csv());
        assert!(OutputFormat::Both.writes_json() && OutputFormat::Both.writes_csv());
    }

    #[tokio::test]
    async fn test_export_both() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("outputs");

        let written = export(&sample(), OutputFormat::Both, &dir).await.unwrap();
        assert_eq!(written, vec![dir.join(JSON_FILENAME), dir.join(CSV_FILENAME)]);
        assert!(written.iter().all(|p| p.is_file()));
    }

    #[tokio::test]
    async fn test_export_csv_only() {
        let tmp = tempfile::tempdir().unwrap();
        let written = export(&sample(), OutputFormat::Csv, tmp.path()).await.unwrap();
        assert_eq!(written, vec![tmp.path().join(CSV_FILENAME)]);
        assert!(!tmp.path().join(JSON_FILENAME).exists());
    }
}

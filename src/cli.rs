//! Command-line interface definitions for the country leaders scraper.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The API base URL can also come from the environment.

use crate::outputs::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Fetch country leaders, enrich them with Wikipedia summaries, and export
/// the result.
///
/// # Examples
///
/// ```sh
/// # Five leaders per country, fetched concurrently, JSON and CSV
/// country_leaders --concurrent
///
/// # Everything, CSV only, into ./data
/// country_leaders --no-limit --format csv --output-dir ./data
///
/// # Time concurrent vs sequential runs
/// country_leaders --compare
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Maximum leaders enriched per country
    #[arg(short, long, default_value_t = 5, conflicts_with = "no_limit")]
    pub limit: usize,

    /// Enrich every leader the API returns
    #[arg(long)]
    pub no_limit: bool,

    /// Fetch articles concurrently within each country
    #[arg(short = 'p', long)]
    pub concurrent: bool,

    /// Run concurrently, then sequentially, and report both timings
    #[arg(long, conflicts_with = "concurrent")]
    pub compare: bool,

    /// Output file format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Both)]
    pub format: OutputFormat,

    /// Directory the export files are written to
    #[arg(short, long, default_value = "outputs")]
    pub output_dir: PathBuf,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Country-leaders API root (overrides the config file)
    #[arg(long, env = "COUNTRY_LEADERS_BASE_URL")]
    pub base_url: Option<String>,

    /// Maximum article fetches in flight (overrides the config file)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Print every leader with a summary preview after the run
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The per-country cap, or `None` with `--no-limit`.
    pub fn limit_per_country(&self) -> Option<usize> {
        (!self.no_limit).then_some(self.limit)
    }
}

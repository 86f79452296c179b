//! # Country Leaders
//!
//! Command-line entry point: fetch every country's leaders, enrich them with
//! Wikipedia summaries, and export JSON and/or CSV.
//!
//! ## Usage
//!
//! ```sh
//! country_leaders --concurrent --format both --output-dir ./outputs
//! ```

use clap::Parser;
use country_leaders::cli::Cli;
use country_leaders::config::{ScraperConfig, load_config};
use country_leaders::observer::TracingObserver;
use country_leaders::report::{RunTiming, write_comparison, write_verbose_sample};
use country_leaders::{LeadersByCountry, LeadersPipeline, outputs};
use std::error::Error;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    info!("country_leaders starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = resolve_config(&args)?;

    let pipeline = match LeadersPipeline::connect(&config).await {
        Ok(pipeline) => pipeline.with_observer(TracingObserver),
        Err(e) => {
            error!(error = %e, "Could not open a session with the country-leaders API");
            return Err(e.into());
        }
    };

    let cancel = pipeline.cancellation();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; cancelling the run");
            interrupt.cancel();
        }
    });

    let modes = if args.compare { vec![true, false] } else { vec![args.concurrent] };
    let limit = args.limit_per_country();

    let mut timings = Vec::with_capacity(modes.len());
    let mut last_run = None;
    for concurrent in modes {
        info!(concurrent, ?limit, "Run scraper");
        let t0 = Instant::now();
        let leaders = match pipeline.fetch_leaders(limit, concurrent).await {
            Ok(leaders) => leaders,
            Err(e) => {
                error!(error = %e, "Scraping failed; nothing exported");
                return Err(e.into());
            }
        };
        let elapsed = t0.elapsed();
        info!(concurrent, secs = elapsed.as_secs_f64(), "Run finished");
        timings.push(RunTiming { concurrent, elapsed });
        last_run = Some(leaders);
    }
    let leaders: LeadersByCountry = last_run.unwrap_or_default();

    if args.verbose {
        write_verbose_sample(&mut std::io::stdout().lock(), &leaders)?;
    }

    match cancel
        .guard(outputs::export(&leaders, args.format, &args.output_dir))
        .await
    {
        Ok(paths) => {
            for path in paths {
                info!(path = %path.display(), "Export completed");
            }
        }
        Err(e) => {
            error!(path = %args.output_dir.display(), error = %e, "Export failed");
            return Err(e.into());
        }
    }

    if args.compare {
        write_comparison(&mut std::io::stdout().lock(), &timings)?;
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        countries = leaders.len(),
        leaders = leaders.leader_count(),
        "Execution complete"
    );
    Ok(())
}

/// Config file (if any), then CLI overrides on top.
fn resolve_config(args: &Cli) -> Result<ScraperConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ScraperConfig::default(),
    };
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(workers) = args.workers {
        config.max_concurrency = Some(workers);
    }
    debug!(?config, "Resolved configuration");
    Ok(config)
}

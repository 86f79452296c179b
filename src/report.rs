//! Plain-text reports for the terminal.
//!
//! - [`write_verbose_sample`]: each country's leaders with a summary preview
//! - [`write_comparison`]: concurrent vs sequential timings for `--compare`

use crate::models::LeadersByCountry;
use itertools::Itertools;
use std::io::{self, Write};
use std::time::Duration;

/// Characters of summary shown per leader.
pub const SUMMARY_PREVIEW_CHARS: usize = 150;

/// Print each country's leaders with a summary preview and their article URL.
///
/// # Arguments
///
/// * `out` - Destination, usually locked stdout
/// * `leaders` - The aggregate to describe
///
/// # Returns
///
/// Any I/O error raised by `out`.
pub fn write_verbose_sample<W: Write>(out: &mut W, leaders: &LeadersByCountry) -> io::Result<()> {
    for (country, batch) in leaders.iter() {
        writeln!(out, ">>> Country '{}' - {} leaders enriched.", country, batch.len())?;
        for leader in batch {
            let name = leader.display_name().unwrap_or_else(|| "Unknown".to_string());
            let summary = leader.summary().unwrap_or_default();
            let preview: String = summary.chars().take(SUMMARY_PREVIEW_CHARS).collect();
            writeln!(out, "- {name}: {preview}...")?;
            match leader.article_url() {
                Some(url) => writeln!(out, "{url}")?,
                None => writeln!(out, "[No Wikipedia URL found]")?,
            }
        }
    }
    Ok(())
}

/// Timing of one full run, labelled by mode.
#[derive(Debug, Clone, Copy)]
pub struct RunTiming {
    pub concurrent: bool,
    pub elapsed: Duration,
}

/// Print each run's duration and, when both modes ran, the speed-up.
///
/// # Arguments
///
/// * `out` - Destination, usually locked stdout
/// * `runs` - Timings in the order the runs happened
pub fn write_comparison<W: Write>(out: &mut W, runs: &[RunTiming]) -> io::Result<()> {
    writeln!(out, "Execution Time Comparison:")?;
    let lines = runs
        .iter()
        .map(|run| {
            let label = if run.concurrent { "With concurrency:" } else { "Without concurrency:" };
            format!("- {label:<22}{:.2} seconds", run.elapsed.as_secs_f64())
        })
        .join("\n");
    writeln!(out, "{lines}")?;

    let concurrent = runs.iter().find(|r| r.concurrent).map(|r| r.elapsed);
    let sequential = runs.iter().find(|r| !r.concurrent).map(|r| r.elapsed);
    if let (Some(concurrent), Some(sequential)) = (concurrent, sequential) {
        if sequential > concurrent && !concurrent.is_zero() {
            let gain = sequential.as_secs_f64() / concurrent.as_secs_f64();
            writeln!(out, "Concurrency was ~{gain:.2}x faster")?;
        } else {
            writeln!(
                out,
                "Concurrency was slower; the API might be limiting parallel requests."
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Leader;

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_verbose_sample() {
        let mut all = LeadersByCountry::new();
        all.insert(
            "us",
            vec![
                Leader::new("Abraham", "Lincoln")
                    .with_url("https://en.wikipedia.org/wiki/Abraham_Lincoln")
                    .with_field("summary", "é".repeat(200)),
                Leader::default(),
            ],
        );

        let text = render(|out| write_verbose_sample(out, &all));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ">>> Country 'us' - 2 leaders enriched.");
        assert_eq!(lines[1], format!("- Abraham Lincoln: {}...", "é".repeat(150)));
        assert_eq!(lines[2], "https://en.wikipedia.org/wiki/Abraham_Lincoln");
        assert_eq!(lines[3], "- Unknown: ...");
        assert_eq!(lines[4], "[No Wikipedia URL found]");
    }

    #[test]
    fn test_comparison_reports_gain() {
        let runs = [
            RunTiming { concurrent: true, elapsed: Duration::from_secs(2) },
            RunTiming { concurrent: false, elapsed: Duration::from_secs(8) },
        ];
        let text = render(|out| write_comparison(out, &runs));
        assert!(text.contains("2.00 seconds"));
        assert!(text.contains("8.00 seconds"));
        assert!(text.contains("~4.00x faster"));
    }

    #[test]
    fn test_comparison_reports_slowdown() {
        let runs = [
            RunTiming { concurrent: true, elapsed: Duration::from_secs(5) },
            RunTiming { concurrent: false, elapsed: Duration::from_secs(3) },
        ];
        let text = render(|out| write_comparison(out, &runs));
        assert!(text.contains("Concurrency was slower"));
    }
}

//! Progress callbacks for the leaders pipeline.
//!
//! The pipeline reports what it does through [`PipelineObserver`] instead of
//! printing. Every method has an empty default body, so an observer only
//! implements the events it cares about. [`NoopObserver`] is the default;
//! the binary uses [`TracingObserver`].

use crate::models::Leader;
use crate::utils::truncate_for_log;
use tracing::{debug, info, warn};

/// Receives progress events from [`LeadersPipeline`](crate::pipeline::LeadersPipeline).
pub trait PipelineObserver {
    /// The country list came back from the API.
    fn countries_listed(&self, _countries: &[String]) {}

    /// A country's batch has been fetched, limited and enriched.
    fn country_enriched(&self, _country: &str, _leaders: &[Leader]) {}

    /// Fetching a leader's article failed; the leader keeps an empty summary.
    fn leader_failed(&self, _leader: &Leader, _error: &str) {}

    /// The article was fetched but had no qualifying paragraph.
    fn summary_missing(&self, _leader: &Leader) {}
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Reports progress as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn countries_listed(&self, countries: &[String]) {
        info!(count = countries.len(), ?countries, "Countries to process");
    }

    fn country_enriched(&self, country: &str, leaders: &[Leader]) {
        if leaders.is_empty() {
            warn!(%country, "No leaders returned for country");
        } else {
            let failed = leaders.iter().filter(|l| l.enrichment_error().is_some()).count();
            info!(%country, count = leaders.len(), failed, "Country leaders enriched");
            for leader in leaders {
                debug!(
                    %country,
                    name = leader.display_name().as_deref().unwrap_or("Unknown"),
                    summary = %truncate_for_log(leader.summary().unwrap_or_default(), 80),
                    "Leader"
                );
            }
        }
    }

    fn leader_failed(&self, leader: &Leader, error: &str) {
        warn!(
            name = leader.display_name().as_deref().unwrap_or("Unknown"),
            url = leader.wikipedia_url().unwrap_or_default(),
            %error,
            "Leader enrichment failed"
        );
    }

    fn summary_missing(&self, leader: &Leader) {
        info!(
            name = leader.display_name().as_deref().unwrap_or("Unknown"),
            "Article has no usable summary paragraph"
        );
    }
}

impl<T: PipelineObserver + ?Sized> PipelineObserver for &T {
    fn countries_listed(&self, countries: &[String]) {
        (**self).countries_listed(countries)
    }

    fn country_enriched(&self, country: &str, leaders: &[Leader]) {
        (**self).country_enriched(country, leaders)
    }

    fn leader_failed(&self, leader: &Leader, error: &str) {
        (**self).leader_failed(leader, error)
    }

    fn summary_missing(&self, leader: &Leader) {
        (**self).summary_missing(leader)
    }
}

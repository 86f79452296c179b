//! The fetch → limit → enrich → aggregate pipeline.
//!
//! ```text
//! /cookie ─► /countries ─► for each country (in API order):
//!                             /leaders?country=xx
//!                             truncate to limit
//!                             enrich (sequential or concurrent)
//!                             record in LeadersByCountry
//! ```
//!
//! Countries are processed one after another; concurrency only happens
//! inside a country's enrichment. A failed country or leader listing aborts
//! the whole run and no partial aggregate is returned. Every API call and
//! every enrichment races the pipeline's [`Cancellation`].

use crate::api::{HttpLeadersApi, LeadersApi};
use crate::cancel::Cancellation;
use crate::config::ScraperConfig;
use crate::enrich::{EnrichMode, enrich_all};
use crate::error::Result;
use crate::models::LeadersByCountry;
use crate::observer::{NoopObserver, PipelineObserver};
use crate::scrapers::{SummarySource, WikipediaFetcher};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Lists, limits, enriches and aggregates leaders.
///
/// Generic over the API client `A`, the summary source `S` and the progress
/// observer `O`, so tests can run it against in-memory stubs.
pub struct LeadersPipeline<A, S, O = NoopObserver> {
    api: A,
    source: S,
    observer: O,
    workers: usize,
    cancel: Cancellation,
}

impl LeadersPipeline<HttpLeadersApi, WikipediaFetcher> {
    /// Build the HTTP-backed pipeline. The session cookie is acquired here,
    /// once; a failure to get it fails construction.
    #[instrument(level = "info", skip_all, fields(base_url = %config.base_url))]
    pub async fn connect(config: &ScraperConfig) -> Result<Self> {
        let client = config.http_client()?;
        let api = HttpLeadersApi::connect(client.clone(), &config.base_url).await?;
        let source = WikipediaFetcher::new(client);
        Ok(LeadersPipeline::new(api, source).with_workers(config.worker_count()))
    }
}

impl<A, S> LeadersPipeline<A, S>
where
    A: LeadersApi,
    S: SummarySource,
{
    /// Assemble a pipeline from its parts, with no observer and the default
    /// worker count.
    pub fn new(api: A, source: S) -> Self {
        let workers = ScraperConfig::default().worker_count();
        Self {
            api,
            source,
            observer: NoopObserver,
            workers,
            cancel: Cancellation::new(),
        }
    }
}

impl<A, S, O> LeadersPipeline<A, S, O>
where
    A: LeadersApi,
    S: SummarySource,
    O: PipelineObserver,
{
    /// Swap in a progress observer.
    pub fn with_observer<P: PipelineObserver>(self, observer: P) -> LeadersPipeline<A, S, P> {
        LeadersPipeline {
            api: self.api,
            source: self.source,
            observer,
            workers: self.workers,
            cancel: self.cancel,
        }
    }

    /// Pool size used in concurrent mode.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// The API client this pipeline lists through.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Handle that aborts in-flight enrichment when cancelled.
    pub fn cancellation(&self) -> Cancellation {
        self.cancel.clone()
    }

    /// Fetch every country's leaders, enrich them, and aggregate by country.
    ///
    /// `limit_per_country` truncates each batch before enrichment, so it also
    /// bounds the number of article fetches. Every listed country gets an
    /// entry, even when it has no leaders.
    ///
    /// # Arguments
    ///
    /// * `limit_per_country` - Keep at most this many leaders per country (`None` keeps all)
    /// * `concurrent` - Fetch a country's articles concurrently instead of one by one
    ///
    /// # Returns
    ///
    /// The aggregate in API country order, or the first listing error.
    /// [`ScraperError::Cancelled`](crate::error::ScraperError::Cancelled) if
    /// the run was interrupted.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_leaders(
        &self,
        limit_per_country: Option<usize>,
        concurrent: bool,
    ) -> Result<LeadersByCountry> {
        let t0 = Instant::now();
        let mode = EnrichMode::from_flag(concurrent, self.workers);

        let countries = self.cancel.guard(self.api.countries()).await?;
        self.observer.countries_listed(&countries);

        let mut aggregate = LeadersByCountry::new();
        for country in countries {
            let mut leaders = self.cancel.guard(self.api.leaders(&country)).await?;
            let available = leaders.len();
            if let Some(limit) = limit_per_country {
                leaders.truncate(limit);
            }
            debug!(%country, available, kept = leaders.len(), "Leaders listed");

            let enriched = enrich_all(&self.source, leaders, mode, &self.observer, &self.cancel).await?;
            self.observer.country_enriched(&country, &enriched);
            aggregate.insert(country, enriched);
        }

        info!(
            countries = aggregate.len(),
            leaders = aggregate.leader_count(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Leaders fetched and enriched"
        );
        Ok(aggregate)
    }
}

//! Leader enrichment: attach a Wikipedia summary to each leader.
//!
//! # Failure isolation
//!
//! A leader whose article can't be fetched does not fail its batch. It comes
//! back with an empty `summary` and the error text in `enrichment_error`, so
//! a fetch failure stays distinguishable from an article that simply has no
//! usable paragraph (empty `summary`, no error).
//!
//! # Ordering
//!
//! In concurrent mode results complete in any order. Each task carries its
//! input index and writes into a pre-sized slot, so the returned batch always
//! lines up with the input.

use crate::cancel::Cancellation;
use crate::error::{Result, ScraperError};
use crate::models::Leader;
use crate::observer::PipelineObserver;
use crate::scrapers::SummarySource;
use crate::utils::decode_url;
use futures::stream::{self, StreamExt};
use tracing::{debug, instrument, warn};

/// How a batch is enriched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichMode {
    /// One leader at a time, on the calling task.
    Sequential,
    /// Up to `workers` article fetches in flight at once.
    Concurrent { workers: usize },
}

impl EnrichMode {
    /// Map the `--concurrent` flag onto a mode; a worker count of 0 becomes 1.
    pub fn from_flag(concurrent: bool, workers: usize) -> Self {
        if concurrent {
            EnrichMode::Concurrent {
                workers: workers.max(1),
            }
        } else {
            EnrichMode::Sequential
        }
    }
}

/// Enrich a single leader.
///
/// Leaders whose `wikipedia_url` is absent, `null`, empty or not a string
/// come back untouched and cost no request. Otherwise the URL is
/// percent-decoded in place and exactly one summary fetch is made.
///
/// # Arguments
///
/// * `source` - Where summaries come from
/// * `leader` - The record to enrich; every field it carries is kept
///
/// # Returns
///
/// The leader with `summary` set, plus `enrichment_error` if the fetch failed.
#[instrument(level = "debug", skip_all, fields(url = leader.wikipedia_url().unwrap_or_default()))]
pub async fn enrich_leader<S: SummarySource>(source: &S, mut leader: Leader) -> Leader {
    let Some(url) = leader.article_url().map(decode_url) else {
        debug!("No wikipedia_url; leaving leader unchanged");
        return leader;
    };

    match source.first_paragraph(&url).await {
        Ok(summary) => {
            leader.set_summary(summary);
            leader.set_enrichment_error(None);
        }
        Err(e) => {
            warn!(%url, error = %e, "Summary fetch failed; keeping leader with empty summary");
            leader.set_summary("");
            leader.set_enrichment_error(Some(e.to_string()));
        }
    }
    leader.set_wikipedia_url(url);
    leader
}

/// Enrich a whole batch, returning it in input order.
///
/// Returns [`ScraperError::Cancelled`] if `cancel` fires before the batch
/// completes; in-flight fetches are dropped.
#[instrument(level = "info", skip_all, fields(count = batch.len(), mode = ?mode))]
pub async fn enrich_all<S, O>(
    source: &S,
    batch: Vec<Leader>,
    mode: EnrichMode,
    observer: &O,
    cancel: &Cancellation,
) -> Result<Vec<Leader>>
where
    S: SummarySource,
    O: PipelineObserver,
{
    let work = async {
        match mode {
            EnrichMode::Sequential => {
                let mut enriched = Vec::with_capacity(batch.len());
                for leader in batch {
                    let leader = enrich_leader(source, leader).await;
                    report(observer, &leader);
                    enriched.push(leader);
                }
                Ok::<_, ScraperError>(enriched)
            }
            EnrichMode::Concurrent { workers } => {
                let mut slots: Vec<Option<Leader>> = vec![None; batch.len()];
                let mut results = stream::iter(batch.into_iter().enumerate())
                    .map(|(index, leader)| async move { (index, enrich_leader(source, leader).await) })
                    .buffer_unordered(workers.max(1));

                while let Some((index, leader)) = results.next().await {
                    report(observer, &leader);
                    slots[index] = Some(leader);
                }
                Ok(slots.into_iter().flatten().collect())
            }
        }
    };

    let result = cancel.guard(work).await;
    if matches!(result, Err(ScraperError::Cancelled)) {
        warn!("Enrichment cancelled; dropping in-flight fetches");
    }
    result
}

fn report<O: PipelineObserver>(observer: &O, leader: &Leader) {
    match (leader.enrichment_error(), leader.summary()) {
        (Some(error), _) => observer.leader_failed(leader, error),
        (None, Some("")) => observer.summary_missing(leader),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use rand::Rng;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Returns "Bio of <url>" after an optional random delay, failing for
    /// URLs listed in `failing`.
    #[derive(Default)]
    struct StubSource {
        calls: AtomicUsize,
        jitter_ms: u64,
        failing: Vec<String>,
        canned: HashMap<String, String>,
    }

    impl SummarySource for StubSource {
        async fn first_paragraph(&self, url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.jitter_ms > 0 {
                let delay = rand::rng().random_range(0..=self.jitter_ms);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            if self.failing.iter().any(|f| f == url) {
                return Err(ScraperError::Status {
                    endpoint: url.to_string(),
                    status: 503,
                });
            }
            Ok(self
                .canned
                .get(url)
                .cloned()
                .unwrap_or_else(|| format!("Bio of {url}")))
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        failed: Mutex<Vec<String>>,
        missing: Mutex<Vec<String>>,
    }

    impl PipelineObserver for RecordingObserver {
        fn leader_failed(&self, leader: &Leader, _error: &str) {
            self.failed
                .lock()
                .unwrap()
                .push(leader.wikipedia_url().unwrap_or_default().to_string());
        }

        fn summary_missing(&self, leader: &Leader) {
            self.missing
                .lock()
                .unwrap()
                .push(leader.wikipedia_url().unwrap_or_default().to_string());
        }
    }

    fn leader(n: usize, url: Option<&str>) -> Leader {
        let leader = Leader::new(&format!("First{n}"), &format!("Last{n}")).with_field("id", n);
        match url {
            Some(url) => leader.with_url(url),
            None => leader,
        }
    }

    fn batch(n: usize) -> Vec<Leader> {
        (0..n)
            .map(|i| {
                let url = format!("https://en.wikipedia.org/wiki/Leader_{i}");
                leader(i, Some(&url))
            })
            .collect()
    }

    #[tokio::test]
    async fn test_enrich_leader_missing_url_is_noop() {
        let source = StubSource::default();
        let input = leader(1, None);
        let output = enrich_leader(&source, input.clone()).await;
        assert_eq!(output, input);
        assert!(output.summary().is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_enrich_leader_null_or_non_string_url_is_noop() {
        let source = StubSource::default();
        for url in [Value::Null, json!(false), json!(12), json!({"href": "x"})] {
            let input = Leader::new("A", "B").with_field("wikipedia_url", url.clone());
            let output = enrich_leader(&source, input.clone()).await;

            assert_eq!(output, input);
            assert_eq!(output.get("wikipedia_url"), Some(&url));
            assert!(output.get("summary").is_none());
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_enrich_leader_empty_url_is_noop() {
        let source = StubSource::default();
        let input = leader(1, Some(""));
        let output = enrich_leader(&source, input.clone()).await;
        assert_eq!(output, input);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_enrich_leader_adds_summary_and_decodes_url() {
        let source = StubSource::default();
        let input = leader(1, Some("https://fr.wikipedia.org/wiki/Fran%C3%A7ois_Hollande"));
        let output = enrich_leader(&source, input).await;

        assert_eq!(
            output.wikipedia_url(),
            Some("https://fr.wikipedia.org/wiki/François_Hollande")
        );
        assert_eq!(
            output.summary(),
            Some("Bio of https://fr.wikipedia.org/wiki/François_Hollande")
        );
        assert!(output.enrichment_error().is_none());
        assert_eq!(output.get("id"), Some(&Value::from(1)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_enrich_leader_empty_page_keeps_empty_summary() {
        let url = "https://en.wikipedia.org/wiki/Stub";
        let source = StubSource {
            canned: HashMap::from([(url.to_string(), String::new())]),
            ..Default::default()
        };
        let output = enrich_leader(&source, leader(1, Some(url))).await;
        assert_eq!(output.summary(), Some(""));
        assert!(output.enrichment_error().is_none());
    }

    #[tokio::test]
    async fn test_enrich_leader_failure_is_marked_not_raised() {
        let url = "https://en.wikipedia.org/wiki/Broken";
        let source = StubSource {
            failing: vec![url.to_string()],
            ..Default::default()
        };
        let output = enrich_leader(&source, leader(1, Some(url))).await;
        assert_eq!(output.summary(), Some(""));
        assert!(output.enrichment_error().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_enrich_leader_is_idempotent() {
        let source = StubSource::default();
        let once = enrich_leader(&source, leader(1, Some("https://en.wikipedia.org/wiki/A%C3%A9"))).await;
        let twice = enrich_leader(&source, once.clone()).await;
        assert_eq!(once, twice);
    }

    async fn assert_order_preserved(n: usize, mode: EnrichMode) {
        let source = StubSource {
            jitter_ms: 15,
            ..Default::default()
        };
        let input = batch(n);
        let output = enrich_all(&source, input.clone(), mode, &NoopObserver, &Cancellation::new())
            .await
            .unwrap();

        assert_eq!(output.len(), input.len());
        for (before, after) in input.iter().zip(&output) {
            assert_eq!(before.first_name(), after.first_name());
            assert_eq!(before.get("id"), after.get("id"));
            assert_eq!(
                after.summary(),
                Some(format!("Bio of {}", before.wikipedia_url().unwrap()).as_str())
            );
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), n);
    }

    #[tokio::test]
    async fn test_enrich_all_sequential_sizes() {
        for n in [0, 1, 50] {
            assert_order_preserved(n, EnrichMode::Sequential).await;
        }
    }

    #[tokio::test]
    async fn test_enrich_all_concurrent_sizes() {
        for n in [0, 1, 50] {
            assert_order_preserved(n, EnrichMode::Concurrent { workers: 8 }).await;
        }
    }

    #[tokio::test]
    async fn test_enrich_all_concurrent_single_worker() {
        assert_order_preserved(10, EnrichMode::Concurrent { workers: 1 }).await;
    }

    #[tokio::test]
    async fn test_one_failing_leader_does_not_abort_batch() {
        let input = batch(6);
        let broken = input[3].wikipedia_url().unwrap().to_string();
        let source = StubSource {
            jitter_ms: 5,
            failing: vec![broken.clone()],
            ..Default::default()
        };
        let observer = RecordingObserver::default();

        for mode in [EnrichMode::Sequential, EnrichMode::Concurrent { workers: 4 }] {
            let output = enrich_all(&source, input.clone(), mode, &observer, &Cancellation::new())
                .await
                .unwrap();
            assert_eq!(output.len(), 6);
            assert!(output[3].enrichment_error().is_some());
            assert_eq!(output[3].summary(), Some(""));
            assert!(
                output
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != 3)
                    .all(|(_, l)| l.enrichment_error().is_none() && l.summary() != Some(""))
            );
        }
        assert_eq!(*observer.failed.lock().unwrap(), vec![broken.clone(), broken]);
    }

    #[tokio::test]
    async fn test_empty_summary_reported_as_missing() {
        let url = "https://en.wikipedia.org/wiki/Stub";
        let source = StubSource {
            canned: HashMap::from([(url.to_string(), String::new())]),
            ..Default::default()
        };
        let observer = RecordingObserver::default();
        enrich_all(
            &source,
            vec![leader(0, Some(url)), leader(1, None)],
            EnrichMode::Sequential,
            &observer,
            &Cancellation::new(),
        )
        .await
        .unwrap();
        assert_eq!(*observer.missing.lock().unwrap(), vec![url.to_string()]);
        assert!(observer.failed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let source = StubSource::default();
        let cancel = Cancellation::new();
        cancel.cancel();
        let err = enrich_all(&source, batch(3), EnrichMode::Sequential, &NoopObserver, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ScraperError::Cancelled));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_mid_batch() {
        let source = StubSource {
            jitter_ms: 200,
            ..Default::default()
        };
        let cancel = Cancellation::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            enrich_all(
                &source,
                batch(50),
                EnrichMode::Concurrent { workers: 2 },
                &NoopObserver,
                &cancel,
            ),
        )
        .await
        .expect("cancellation should end the batch early");
        assert!(matches!(result, Err(ScraperError::Cancelled)));
    }

    #[test]
    fn test_mode_from_flag() {
        assert_eq!(EnrichMode::from_flag(false, 8), EnrichMode::Sequential);
        assert_eq!(EnrichMode::from_flag(true, 8), EnrichMode::Concurrent { workers: 8 });
        assert_eq!(EnrichMode::from_flag(true, 0), EnrichMode::Concurrent { workers: 1 });
    }
}

//! Wikipedia lead-paragraph scraper.
//!
//! Wikipedia pages open with hatnotes, coordinates and disambiguation blurbs
//! before the real lead paragraph. Those are all short, so the scraper takes
//! the first `<p>` whose text is longer than [`MIN_PARAGRAPH_CHARS`] and
//! strips the `[1]`-style citation markers from it.

use crate::error::{Result, ScraperError};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// A paragraph must be strictly longer than this (in characters) to count.
pub const MIN_PARAGRAPH_CHARS: usize = 80;

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("static selector"));
static CITATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[0-9]+\]").expect("static regex"));

/// Anything that can turn an article URL into a summary paragraph.
pub trait SummarySource {
    /// Return the article's first substantial paragraph, or `""` if it has none.
    async fn first_paragraph(&self, url: &str) -> Result<String>;
}

/// Fetches articles over HTTP with the shared client.
#[derive(Debug, Clone)]
pub struct WikipediaFetcher {
    client: reqwest::Client,
}

impl WikipediaFetcher {
    /// Wrap an existing client; its timeout and user agent apply to every fetch.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl SummarySource for WikipediaFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn first_paragraph(&self, url: &str) -> Result<String> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScraperError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::Status {
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| ScraperError::transport(url, e))?;
        debug!(bytes = html.len(), elapsed_ms = t0.elapsed().as_millis() as u64, "Fetched article");

        match extract_first_paragraph(&html) {
            Some(paragraph) => Ok(paragraph),
            None => {
                warn!(%url, "No suitable paragraph found");
                Ok(String::new())
            }
        }
    }
}

/// Pick the lead paragraph out of an article's HTML.
///
/// Returns `None` when no paragraph is longer than [`MIN_PARAGRAPH_CHARS`].
pub fn extract_first_paragraph(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>())
        .map(|text| text.trim().to_string())
        .find(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
        .map(|text| strip_citations(&text))
}

/// Remove `[n]` citation markers.
pub fn strip_citations(text: &str) -> String {
    CITATION.replace_all(text, "").into_owned()
}

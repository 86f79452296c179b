//! Data models for leaders and the per-country aggregate.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Leader`]: One political leader as returned by the country-leaders API,
//!   optionally enriched with a Wikipedia summary
//! - [`LeadersByCountry`]: The aggregate result, keyed by country code in the
//!   order the API listed the countries
//!
//! A leader is kept as the JSON object the API sent. Fields the scraper reads
//! (`first_name`, `last_name`, `wikipedia_url`) are looked up through typed
//! accessors that only answer for string values, so a `null` or an oddly
//! typed value is written back out exactly as received instead of being
//! dropped or rejected.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys the scraper reads or writes on a [`Leader`].
pub const FIRST_NAME: &str = "first_name";
pub const LAST_NAME: &str = "last_name";
pub const WIKIPEDIA_URL: &str = "wikipedia_url";
pub const SUMMARY: &str = "summary";
pub const ENRICHMENT_ERROR: &str = "enrichment_error";

/// A political leader record.
///
/// # Fields
///
/// Every key of the API object, in the order received. Enrichment adds:
///
/// * `summary` - First substantial paragraph of the article
/// * `enrichment_error` - Set only when the article could not be fetched
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Leader(Map<String, Value>);

impl Leader {
    /// Build a leader with the two name fields set.
    ///
    /// # Examples
    ///
    /// ```
    /// use country_leaders::Leader;
    ///
    /// let leader = Leader::new("Emmanuel", "Macron")
    ///     .with_url("https://fr.wikipedia.org/wiki/Emmanuel_Macron");
    /// assert_eq!(leader.display_name().as_deref(), Some("Emmanuel Macron"));
    /// ```
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self::default()
            .with_field(FIRST_NAME, first_name)
            .with_field(LAST_NAME, last_name)
    }

    /// Set `key` to `value`, returning the leader for chaining.
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Shorthand for `with_field(WIKIPEDIA_URL, url)`.
    pub fn with_url(self, url: &str) -> Self {
        self.with_field(WIKIPEDIA_URL, url)
    }

    /// Raw value of any field, `null` included.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a field, returning the previous value.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.to_string(), value.into())
    }

    /// All fields, in the order received.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The field as text, if it holds a JSON string.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn first_name(&self) -> Option<&str> {
        self.text(FIRST_NAME)
    }

    pub fn last_name(&self) -> Option<&str> {
        self.text(LAST_NAME)
    }

    pub fn wikipedia_url(&self) -> Option<&str> {
        self.text(WIKIPEDIA_URL)
    }

    pub fn summary(&self) -> Option<&str> {
        self.text(SUMMARY)
    }

    pub fn enrichment_error(&self) -> Option<&str> {
        self.text(ENRICHMENT_ERROR)
    }

    /// The article URL, if `wikipedia_url` is a non-empty string.
    ///
    /// Absent, `null`, empty or non-string values all mean "nothing to
    /// enrich".
    pub fn article_url(&self) -> Option<&str> {
        self.wikipedia_url().filter(|url| !url.is_empty())
    }

    /// Replace `wikipedia_url` with a string, e.g. its decoded form.
    pub fn set_wikipedia_url(&mut self, url: impl Into<String>) {
        self.insert(WIKIPEDIA_URL, url.into());
    }

    /// Set `summary`; an empty string means "fetched, nothing usable".
    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.insert(SUMMARY, summary.into());
    }

    /// Record (or clear, with `None`) the reason enrichment failed.
    pub fn set_enrichment_error(&mut self, error: Option<String>) {
        match error {
            Some(error) => {
                self.insert(ENRICHMENT_ERROR, error);
            }
            None => {
                self.0.shift_remove(ENRICHMENT_ERROR);
            }
        }
    }

    /// "First Last", or `None` when the API gave neither name as a string.
    pub fn display_name(&self) -> Option<String> {
        let name = [self.first_name(), self.last_name()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        (!name.is_empty()).then_some(name)
    }
}

/// Leaders per country, in the order countries were returned by the API.
///
/// Serializes as a plain JSON object: `{"fr": [...], "us": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LeadersByCountry(IndexMap<String, Vec<Leader>>);

impl LeadersByCountry {
    /// Create an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a country's batch. Empty batches are recorded too.
    ///
    /// Re-inserting a country replaces its batch and keeps its position.
    pub fn insert(&mut self, country: impl Into<String>, leaders: Vec<Leader>) {
        self.0.insert(country.into(), leaders);
    }

    /// The batch recorded for `country`, if the country was listed.
    pub fn get(&self, country: &str) -> Option<&[Leader]> {
        self.0.get(country).map(Vec::as_slice)
    }

    /// Country codes in insertion order.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `(country, leaders)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Leader])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of countries recorded.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of leaders across all countries.
    pub fn leader_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

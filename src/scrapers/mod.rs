//! Article scrapers used to enrich leader records.
//!
//! # Supported Sources
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | Wikipedia | [`wikipedia`] | HTML scraping of the lead paragraph |

pub mod wikipedia;

pub use wikipedia::{SummarySource, WikipediaFetcher};

//! # Country Leaders
//!
//! Fetches the political leaders of every country listed by the
//! country-leaders API, enriches each one with the lead paragraph of their
//! Wikipedia article, and exports the result to JSON and/or CSV.
//!
//! ## Architecture
//!
//! 1. **Session**: Acquire the API's session cookie ([`session`])
//! 2. **Listing**: Fetch countries, then each country's leaders ([`api`])
//! 3. **Enrichment**: Scrape a summary per leader, sequentially or
//!    concurrently, keeping input order ([`enrich`], [`scrapers`])
//! 4. **Aggregation**: Collect everything per country ([`pipeline`])
//! 5. **Output**: Write the aggregate to files ([`outputs`])
//!
//! ```no_run
//! # async fn run() -> country_leaders::error::Result<()> {
//! use country_leaders::{LeadersPipeline, ScraperConfig};
//!
//! let pipeline = LeadersPipeline::connect(&ScraperConfig::default()).await?;
//! let leaders = pipeline.fetch_leaders(Some(5), true).await?;
//! println!("{} countries", leaders.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod enrich;
pub mod error;
pub mod models;
pub mod observer;
pub mod outputs;
pub mod pipeline;
pub mod report;
pub mod scrapers;
pub mod session;
pub mod utils;

pub use config::ScraperConfig;
pub use error::{Result, ScraperError};
pub use models::{Leader, LeadersByCountry};
pub use pipeline::LeadersPipeline;

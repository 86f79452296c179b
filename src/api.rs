//! Country-leaders API client.
//!
//! # Architecture
//!
//! - [`LeadersApi`]: the two listing calls the pipeline needs
//! - [`HttpLeadersApi`]: the real client, built on a shared `reqwest::Client`
//!   and a [`SessionManager`]
//!
//! # Auth rejection
//!
//! The API's cookie expires without notice. When `/countries` or `/leaders`
//! answers 401 or 403, the client refreshes the cookie once and repeats the
//! request once. A second rejection surfaces as
//! [`ScraperError::Unauthorized`].

use crate::error::{Result, ScraperError};
use crate::models::Leader;
use crate::session::{Credential, SessionManager};
use reqwest::header::COOKIE;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Listing calls against the country-leaders API.
pub trait LeadersApi {
    /// Country codes supported by the API, in API order.
    async fn countries(&self) -> Result<Vec<String>>;

    /// Leaders recorded for one country.
    async fn leaders(&self, country: &str) -> Result<Vec<Leader>>;
}

/// Parse the API root, making sure it ends with `/` so endpoint joins
/// append instead of replacing the last path segment.
pub fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut normalized = base_url.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).map_err(|_| ScraperError::BaseUrl(base_url.to_string()))
}

/// [`LeadersApi`] over HTTP.
///
/// Holds the session for its whole lifetime and sends the current cookie
/// with every request. See the module docs for the rejection policy.
#[derive(Debug)]
pub struct HttpLeadersApi {
    client: reqwest::Client,
    session: SessionManager,
    countries_url: Url,
    leaders_url: Url,
}

impl HttpLeadersApi {
    /// Acquire a session cookie and build the client.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared HTTP client (timeout and user agent already set)
    /// * `base_url` - API root; a trailing `/` is added if missing
    ///
    /// # Returns
    ///
    /// A connected client, or the error from parsing `base_url` or from the
    /// first `/cookie` call.
    #[instrument(level = "info", skip(client))]
    pub async fn connect(client: reqwest::Client, base_url: &str) -> Result<Self> {
        let base = parse_base_url(base_url)?;
        let join = |path: &str| {
            base.join(path)
                .map_err(|_| ScraperError::BaseUrl(base_url.to_string()))
        };
        let countries_url = join("countries")?;
        let leaders_url = join("leaders")?;
        let session = SessionManager::connect(client.clone(), &base).await?;
        info!(%base, "Connected to country-leaders API");
        Ok(Self {
            client,
            session,
            countries_url,
            leaders_url,
        })
    }

    /// The session whose cookie this client sends.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// GET `url` with the session cookie, refreshing and retrying once on
    /// an auth rejection.
    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let credential = self.session.credential();
        match self.get_json_once(url, &credential).await {
            Err(e) if e.is_auth_rejection() => {
                warn!(endpoint = url.path(), error = %e, "Credential rejected; refreshing and retrying once");
                let credential = self.session.refresh().await?;
                self.get_json_once(url, &credential)
                    .await
                    .map_err(|e| match e {
                        e if e.is_auth_rejection() => ScraperError::Unauthorized {
                            endpoint: url.path().to_string(),
                        },
                        other => other,
                    })
            }
            other => other,
        }
    }

    async fn get_json_once<T: DeserializeOwned>(
        &self,
        url: &Url,
        credential: &Credential,
    ) -> Result<T> {
        let endpoint = url.path().to_string();
        let t0 = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .header(COOKIE, credential.header_value())
            .send()
            .await
            .map_err(|e| ScraperError::transport(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ScraperError::transport(&endpoint, e))?;
        debug!(
            %endpoint,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "API response received"
        );
        serde_json::from_slice(&body).map_err(|source| ScraperError::Decode { endpoint, source })
    }
}

impl LeadersApi for HttpLeadersApi {
    #[instrument(level = "info", skip_all)]
    async fn countries(&self) -> Result<Vec<String>> {
        let countries: Vec<String> = self.get_json(&self.countries_url).await?;
        info!(count = countries.len(), "Fetched country list");
        Ok(countries)
    }

    #[instrument(level = "info", skip(self))]
    async fn leaders(&self, country: &str) -> Result<Vec<Leader>> {
        let mut url = self.leaders_url.clone();
        url.query_pairs_mut().append_pair("country", country);
        let leaders: Vec<Leader> = self.get_json(&url).await?;
        debug!(count = leaders.len(), "Fetched leaders");
        Ok(leaders)
    }
}

//! Session cookie management for the country-leaders API.
//!
//! The API hands out a session cookie at `GET /cookie` and expects it on every
//! other request. [`SessionManager`] fetches that cookie, holds the current
//! value, and can fetch a fresh one on demand. It does not track expiry; the
//! API client refreshes when a request is rejected.

use crate::error::{Result, ScraperError};
use reqwest::header::SET_COOKIE;
use std::sync::RwLock;
use tracing::{debug, info, instrument};
use url::Url;

/// Opaque session credential, ready to be sent as a `Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a ready-made `Cookie` header value such as `"user_cookie=abc"`.
    ///
    /// # Arguments
    ///
    /// * `cookie_header` - One or more `name=value` pairs joined by `"; "`
    pub fn new(cookie_header: impl Into<String>) -> Self {
        Self(cookie_header.into())
    }

    /// The value to send in the `Cookie` header.
    pub fn header_value(&self) -> &str {
        &self.0
    }

    /// Build a credential from `Set-Cookie` values, keeping only the
    /// `name=value` pair of each (attributes like `Path` are dropped).
    fn from_set_cookie<'a>(values: impl Iterator<Item = &'a str>) -> Option<Self> {
        let pairs: Vec<&str> = values
            .filter_map(|v| v.split(';').next())
            .map(str::trim)
            .filter(|pair| pair.contains('='))
            .collect();
        (!pairs.is_empty()).then(|| Self(pairs.join("; ")))
    }
}

/// Acquires and refreshes the API session cookie.
#[derive(Debug)]
pub struct SessionManager {
    client: reqwest::Client,
    cookie_url: Url,
    current: RwLock<Credential>,
}

impl SessionManager {
    /// Fetch an initial credential and return a manager holding it.
    #[instrument(level = "info", skip_all, fields(base_url = %base_url))]
    pub async fn connect(client: reqwest::Client, base_url: &Url) -> Result<Self> {
        let cookie_url = base_url
            .join("cookie")
            .map_err(|_| ScraperError::BaseUrl(base_url.to_string()))?;
        let credential = request_cookie(&client, &cookie_url).await?;
        Ok(Self {
            client,
            cookie_url,
            current: RwLock::new(credential),
        })
    }

    /// Call the cookie endpoint and return what it issued, without storing it.
    pub async fn acquire(&self) -> Result<Credential> {
        request_cookie(&self.client, &self.cookie_url).await
    }

    /// Fetch a new credential and replace the held one.
    #[instrument(level = "info", skip_all)]
    pub async fn refresh(&self) -> Result<Credential> {
        let fresh = self.acquire().await?;
        // A poisoned lock still holds a usable credential value.
        let mut held = self.current.write().unwrap_or_else(|e| e.into_inner());
        *held = fresh.clone();
        info!("Session credential refreshed");
        Ok(fresh)
    }

    /// The credential currently in use.
    pub fn credential(&self) -> Credential {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

async fn request_cookie(client: &reqwest::Client, cookie_url: &Url) -> Result<Credential> {
    let endpoint = cookie_url.path().to_string();
    let response = client
        .get(cookie_url.clone())
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

    let credential = Credential::from_set_cookie(
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok()),
    )
    .ok_or_else(|| ScraperError::MissingCredential {
        endpoint: endpoint.clone(),
    })?;

    debug!(%endpoint, "Acquired session cookie");
    Ok(credential)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_from_single_cookie() {
        let credential =
            Credential::from_set_cookie(["user_cookie=abc123; Path=/; HttpOnly"].into_iter()).unwrap();
        assert_eq!(credential.header_value(), "user_cookie=abc123");
    }

    #[test]
    fn test_credential_from_several_cookies() {
        let credential = Credential::from_set_cookie(
            ["a=1; Path=/", "b=2; Secure", "garbage"].into_iter(),
        )
        .unwrap();
        assert_eq!(credential.header_value(), "a=1; b=2");
    }

    #[test]
    fn test_no_cookie_is_none() {
        assert!(Credential::from_set_cookie(std::iter::empty()).is_none());
        assert!(Credential::from_set_cookie(["no-pair-here"].into_iter()).is_none());
    }
}

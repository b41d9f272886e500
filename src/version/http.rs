//! Shared HTTP fetch helper for registry APIs
//!
//! Every adapter goes through [`HttpClient`], which issues exactly one GET per
//! lookup and maps the response status onto [`RegistryError`]:
//!
//! - `404` becomes [`RegistryError::NotFound`] (`"<subject> not found in <registry> registry"`)
//! - any other non-success status becomes [`RegistryError::Upstream`] carrying the body text
//! - a success body that does not decode becomes [`RegistryError::InvalidResponse`]
//!
//! There is no retry, backoff or caching.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::version::error::RegistryError;

/// Default total timeout for one request (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent sent with every request
pub const USER_AGENT: &str = concat!("versionator/", env!("CARGO_PKG_VERSION"));

/// Explicit User-Agent for APIs that reject anonymous clients (GitHub, MetaCPAN)
pub const QUERY_USER_AGENT: &str = concat!(
    "versionator/",
    env!("CARGO_PKG_VERSION"),
    " (Package Version Query Tool)"
);

/// What a request is about, used to build error messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Display label of the registry (e.g. "crates.io", "Terraform Registry")
    pub registry: &'static str,
    /// Subject of the lookup (e.g. "Package 'serde'")
    pub subject: String,
}

impl Target {
    /// `Package '<name>'` in the given registry
    pub fn package(registry: &'static str, name: &str) -> Self {
        Self::new(registry, "Package", name)
    }

    pub fn new(registry: &'static str, noun: &str, name: &str) -> Self {
        Self {
            registry,
            subject: format!("{} '{}'", noun, name),
        }
    }

    fn not_found(&self) -> RegistryError {
        RegistryError::NotFound(format!(
            "{} not found in {} registry",
            self.subject, self.registry
        ))
    }
}

/// HTTP client shared by all registry adapters
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a client whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(RegistryError::Client)?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns a client sharing this connection pool with a different timeout
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            client: self.client.clone(),
            timeout,
        }
    }

    /// GETs `url` and decodes the JSON body into `T`
    ///
    /// `Accept: application/json` is sent unless `headers` carries its own `Accept`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        target: &Target,
    ) -> Result<T, RegistryError> {
        let response = self.send(url, headers, "application/json", target).await?;
        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(|e| {
            warn!("Failed to parse {} response from {}: {}", target.registry, url, e);
            RegistryError::InvalidResponse {
                registry: target.registry.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// GETs `url` and returns the raw body text
    pub async fn get_text(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        target: &Target,
    ) -> Result<String, RegistryError> {
        let response = self.send(url, headers, "text/html", target).await?;
        Ok(response.text().await?)
    }

    async fn send(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        default_accept: &str,
        target: &Target,
    ) -> Result<reqwest::Response, RegistryError> {
        debug!("Fetching {} from {}", target.subject, url);

        let mut request = self.client.get(url).timeout(self.timeout);
        if !headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(ACCEPT.as_str()))
        {
            request = request.header(ACCEPT, default_accept);
        }
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(target.not_found());
        }

        if !status.is_success() {
            warn!("{} returned status {}: {}", target.registry, status, url);
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::Upstream {
                registry: target.registry.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

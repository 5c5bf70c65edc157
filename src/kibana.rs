//! HTTP client for scraping the Kibana status endpoint.
//!
//! The client owns the upstream connection details: base URL, an optional
//! Basic-auth header computed once at construction time, and a reusable
//! `reqwest` connection pool. Each call to [`KibanaClient::scrape`] performs
//! exactly one fetch-and-decode round-trip; there is no caching and no retry.

use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::ScrapeError;
use crate::snapshot::StatusSnapshot;

/// Client for a single Kibana instance. Immutable after construction and
/// shared for the process lifetime.
#[derive(Debug, Clone)]
pub struct KibanaClient {
    base_url: String,
    auth_header: Option<String>,
    client: reqwest::blocking::Client,
}

impl KibanaClient {
    /// Builds a client from the effective configuration.
    ///
    /// The Basic-auth header is only attached when both username and
    /// password are configured, matching how Kibana itself treats partial
    /// credentials.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let base_url = config.kibana_url.clone().unwrap_or_default();
        let timeout = Duration::from_secs(config.effective_scrape_timeout_secs());

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kibana-status-exporter/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let auth_header = match (&config.kibana_username, &config.kibana_password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                info!("using authenticated requests with Kibana");
                Some(basic_auth_header(user, pass))
            }
            _ => {
                info!("Kibana username or password not provided, assuming unauthenticated communication");
                None
            }
        };

        Ok(Self {
            base_url,
            auth_header,
            client,
        })
    }

    /// The URL scraped on every cycle.
    pub fn status_url(&self) -> String {
        format!("{}/api/status?extended", self.base_url)
    }

    /// The precomputed `Authorization` header value, if any.
    pub fn auth_header(&self) -> Option<&str> {
        self.auth_header.as_deref()
    }

    /// Performs one scrape: a single GET against the status endpoint and a
    /// decode of the JSON body into a [`StatusSnapshot`].
    pub fn scrape(&self) -> Result<StatusSnapshot, ScrapeError> {
        let url = self.status_url();
        debug!("scraping {}", url);

        let mut request = self.client.get(&url).header(ACCEPT, "application/json");
        if let Some(header) = &self.auth_header {
            request = request.header(AUTHORIZATION, header.as_str());
        }
        let request = request.build().map_err(ScrapeError::RequestBuild)?;

        let response = self
            .client
            .execute(request)
            .map_err(ScrapeError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UpstreamStatus(status));
        }

        let body = response.text().map_err(ScrapeError::BodyRead)?;

        serde_json::from_str(&body).map_err(|source| ScrapeError::Decode { source, body })
    }
}

/// Encodes `user:pass` into a `Basic …` authorization header value.
fn basic_auth_header(user: &str, pass: &str) -> String {
    let credentials = format!("{}:{}", user, pass);
    format!(
        "Basic {}",
        general_purpose::STANDARD.encode(credentials.as_bytes())
    )
}

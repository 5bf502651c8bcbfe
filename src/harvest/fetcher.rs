//! HTTP access to the directory site
//!
//! This module handles all HTTP requests for the harvest:
//! - Building the HTTP clients: one with the detail page timeout, one with the
//!   longer listing timeout
//! - GET requests for detail pages, wrapped in the retry combinator
//!
//! The listing request lives in `list_loader` because it is never retried.

use crate::config::HarvestConfig;
use crate::harvest::retry::with_retry;
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client used for detail pages
///
/// # Arguments
///
/// * `config` - The harvest configuration (timeout and user agent)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HarvestConfig) -> Result<Client, reqwest::Error> {
    client_with_timeout(config, config.request_timeout())
}

/// Builds the HTTP client used for the listing request
pub fn build_listing_client(config: &HarvestConfig) -> Result<Client, reqwest::Error> {
    client_with_timeout(config, config.listing_timeout())
}

fn client_with_timeout(
    config: &HarvestConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true);

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }

    builder.build()
}

/// Fetches detail pages with a bounded number of attempts
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_attempts: u32,
}

impl Fetcher {
    pub fn new(client: Client, max_attempts: u32) -> Self {
        Self {
            client,
            max_attempts,
        }
    }

    /// Fetches a page body, retrying transient failures
    ///
    /// Timeouts, connection errors, non-2xx statuses and body read errors all
    /// count as failed attempts. Returns `None` once every attempt has failed.
    pub async fn fetch(&self, url: &str) -> Option<String> {
        tracing::info!("fetching {}", url);

        let body = with_retry(self.max_attempts, url, || self.get_once(url)).await?;

        tracing::debug!("received response from {} ({} bytes)", url, body.len());
        Some(body)
    }

    /// A single GET attempt
    async fn get_once(&self, url: &str) -> Result<String, HarvestError> {
        let http_error = |source: reqwest::Error| HarvestError::Http {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(http_error)?
            .error_for_status()
            .map_err(http_error)?;

        response.text().await.map_err(http_error)
    }
}

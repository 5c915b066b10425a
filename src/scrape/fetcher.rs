//! Listings page fetcher
//!
//! This module handles retrieving the listings page, including:
//! - The page source trait the cycle depends on
//! - Building the HTTP client with a browser-like user agent
//! - Classifying HTTP and network failures

use crate::config::SourceConfig;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// A fetched page, ready for extraction
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Final URL after redirects, used to resolve relative links
    pub url: Url,

    /// Page HTML
    pub html: String,
}

/// Trait for page fetching collaborators
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the page at `url`
    async fn fetch(&self, url: &Url) -> Result<RenderedPage, FetchError>;
}

/// Plain HTTP page source
///
/// Listings are read from the served HTML; no scripts are executed.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    timeout_secs: u64,
}

impl HttpPageSource {
    /// Wraps a client whose request timeout is `timeout_secs`
    pub fn new(client: Client, timeout_secs: u64) -> Self {
        Self {
            client,
            timeout_secs,
        }
    }

    /// Builds a page source from the source configuration
    pub fn from_config(config: &SourceConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            build_http_client(config)?,
            config.fetch_timeout_secs,
        ))
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The source configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &SourceConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &Url) -> Result<RenderedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let html = response.text().await.map_err(|e| classify_error(url, e, self.timeout_secs))?;

        tracing::debug!("Fetched {} ({} bytes)", final_url, html.len());

        Ok(RenderedPage {
            url: final_url,
            html,
        })
    }
}

fn classify_error(url: &Url, error: reqwest::Error, timeout_secs: u64) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
            seconds: timeout_secs,
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

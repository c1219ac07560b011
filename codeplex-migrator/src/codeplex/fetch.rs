//! Page retrieval.

use super::SourceError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout for page downloads.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Retrieves rendered HTML pages.
///
/// A fetch is a single round trip; implementations must not retry.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Downloads the page at `url` and returns its body.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failures and non-success statuses.
    async fn fetch(&self, url: &Url) -> Result<String, SourceError>;
}

/// Fetches pages over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a fresh connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Client`] if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(SourceError::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, SourceError> {
        debug!(url = %url, "Fetching page");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| SourceError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| SourceError::Http {
            url: url.to_string(),
            source,
        })
    }
}

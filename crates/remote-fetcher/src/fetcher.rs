//! Outbound HTTP fetching

use crate::error::{FetchError, Result};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A successful (2xx) response from the remote
#[derive(Debug)]
pub struct FetchedResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl FetchedResponse {
    /// Raw `Content-Type` header value, if present and valid UTF-8
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

/// HTTP client issuing single-attempt GET requests
pub struct RemoteFetcher {
    client: Client,
    timeout: Duration,
}

impl RemoteFetcher {
    /// Create a fetcher with the default 30 second timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a fetcher whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("image-cache-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` once; any non-2xx status is an error
    pub async fn fetch(&self, url: &Url) -> Result<FetchedResponse> {
        debug!(url = %url, "Fetching remote resource");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!(status = %status, url = %url, "Remote returned non-success status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        debug!(url = %url, size = body.len(), "Fetched remote resource");

        Ok(FetchedResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "Mozilla/5.0 (compatible; RealEstateNewsBot/1.0)";

/// Failure of a single feed retrieval, scoped to one URL.
///
/// Every failure mode of the HTTP round trip is converted into one of these
/// variants; the fetcher never lets an error escape untyped.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request exceeded the fixed timeout
    #[error("request to {url} timed out")]
    Timeout { url: String },
    /// Network-level error (DNS, connection, TLS, reset, etc.)
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// HTTP response with non-2xx status code
    #[error("{url} returned HTTP status {status}")]
    HttpStatus { url: String, status: u16 },
}

/// Performs bounded-time retrieval of one feed URL.
///
/// One attempt per call; retry policy, if any, belongs to the caller and this
/// system performs none.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch the raw bytes of one feed document.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        Ok(bytes.to_vec())
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn classify_request_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: error,
        }
    }
}

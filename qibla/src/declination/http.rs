//! HTTP client abstraction for testability

use super::DeclinationError;

/// Default request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Trait for HTTP client operations.
///
/// Lets the declination provider be tested with a mock client instead of
/// the network.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, DeclinationError>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Result<Self, DeclinationError> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT_SECS)
    }

    /// Creates a client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, DeclinationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(concat!("qibla/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DeclinationError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, DeclinationError> {
        let response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                DeclinationError::Timeout
            } else {
                DeclinationError::Http(format!("Request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            return Err(DeclinationError::Http(format!(
                "HTTP {} from declination service",
                response.status()
            )));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| DeclinationError::Http(format!("Failed to read response: {}", e)))
    }
}

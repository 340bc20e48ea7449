//! The HTTP capability the feed depends on.
//!
//! The feed only ever needs "GET this URL, give me status and body", so that
//! is all [`Fetch`] asks for. [`HttpFetcher`] is the reqwest implementation;
//! tests use [`MockFetcher`](super::MockFetcher).

use std::time::Duration;

use serde_json::Value;

use super::error::FetchError;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A completed HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Something that can perform a GET request.
pub trait Fetch: Send + Sync + 'static {
    /// Fetch `url`. Any received response, including non-2xx, is `Ok`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchResponse, FetchError>> + Send;
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpFetcherConfig {
    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// [`Fetch`] over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: HttpFetcherConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(FetchResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_is_2xx_only() {
        assert!(FetchResponse::new(200, "").ok());
        assert!(FetchResponse::new(204, "").ok());
        assert!(!FetchResponse::new(199, "").ok());
        assert!(!FetchResponse::new(304, "").ok());
        assert!(!FetchResponse::new(500, "").ok());
    }

    #[test]
    fn json_body() {
        let response = FetchResponse::new(200, r#"[["s"], []]"#);
        assert_eq!(response.json().unwrap(), serde_json::json!([["s"], []]));
        assert!(FetchResponse::new(200, "<html>").json().is_err());
    }

    #[test]
    fn config_defaults() {
        let config = HttpFetcherConfig::default();
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.user_agent.starts_with("departure-board/"));

        let config = config.with_timeout(5);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn fetcher_creation() {
        assert!(HttpFetcher::new(HttpFetcherConfig::default()).is_ok());
    }
}

//! HTTP document fetcher backed by reqwest.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::HttpConfig;

use super::{Document, DocumentFetcher, FetchError};

/// Fetches pages over HTTP with the configured browser-like headers.
///
/// Mirrors tend to serve localized or stripped-down pages to clients that do
/// not look like a browser, so every request carries the configured
/// `User-Agent`, `Accept-Language` and `X-Forwarded-For` values.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a new fetcher from HTTP configuration.
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&config.user_agent)?);
        headers.insert(ACCEPT_LANGUAGE, header_value(&config.accept_language)?);
        if let Some(forwarded) = &config.forwarded_for {
            headers.insert(
                HeaderName::from_static("x-forwarded-for"),
                header_value(forwarded)?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

fn header_value(value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value)
        .map_err(|e| FetchError::Request(format!("Invalid header value {:?}: {}", value, e)))
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Document, FetchError> {
        debug!(url = url, timeout_ms = timeout.as_millis() as u64, "Fetching document");

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(url.to_string())
                } else if e.is_connect() {
                    FetchError::ConnectionFailed(e.to_string())
                } else {
                    FetchError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Body(e.to_string())
            }
        })?;

        debug!(url = url, bytes = body.len(), "Document fetched");

        Ok(Document::new(url, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_default_config() {
        assert!(HttpFetcher::new(&HttpConfig::default()).is_ok());
    }

    #[test]
    fn test_new_rejects_invalid_header() {
        let config = HttpConfig {
            user_agent: "bad\nagent".to_string(),
            ..Default::default()
        };
        let result = HttpFetcher::new(&config);
        assert!(matches!(result, Err(FetchError::Request(_))));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_fails() {
        let fetcher = HttpFetcher::new(&HttpConfig::default()).unwrap();
        // Port 9 on localhost is the discard service, virtually never listening.
        let result = fetcher
            .fetch("http://127.0.0.1:9/", Duration::from_millis(500))
            .await;
        assert!(result.is_err());
    }
}

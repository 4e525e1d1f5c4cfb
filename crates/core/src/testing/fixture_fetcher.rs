//! Fixture-backed document fetcher.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::document::{Document, DocumentFetcher, FetchError};

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// The requested URL.
    pub url: String,
    /// The timeout the caller asked for.
    pub timeout: Duration,
}

/// Serves recorded pages keyed by exact URL.
///
/// URLs without a recorded page or error answer with HTTP 404.
///
/// # Example
///
/// ```rust,ignore
/// use baymirror_core::testing::FixtureFetcher;
///
/// let fetcher = FixtureFetcher::new();
/// fetcher.add_page("https://proxybay.github.io/", PROXY_LIST).await;
///
/// let document = fetcher.fetch("https://proxybay.github.io/", timeout).await?;
/// assert_eq!(fetcher.recorded_requests().await.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct FixtureFetcher {
    responses: Arc<RwLock<HashMap<String, Result<String, FetchError>>>>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub async fn add_page(&self, url: impl Into<String>, body: impl Into<String>) {
        self.responses
            .write()
            .await
            .insert(url.into(), Ok(body.into()));
    }

    /// Fail every fetch of `url` with `error`.
    pub async fn add_error(&self, url: impl Into<String>, error: FetchError) {
        self.responses.write().await.insert(url.into(), Err(error));
    }

    /// All fetches made so far, in order.
    pub async fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    pub async fn clear_requests(&self) {
        self.requests.write().await.clear();
    }
}

#[async_trait]
impl DocumentFetcher for FixtureFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Document, FetchError> {
        self.requests.write().await.push(RecordedRequest {
            url: url.to_string(),
            timeout,
        });

        match self.responses.read().await.get(url) {
            Some(Ok(body)) => Ok(Document::new(url, body.clone())),
            Some(Err(e)) => Err(e.clone()),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_recorded_pages() {
        let fetcher = FixtureFetcher::new();
        fetcher.add_page("https://a.test/", "<p>a</p>").await;

        let document = fetcher
            .fetch("https://a.test/", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(document.url, "https://a.test/");
        assert_eq!(document.body, "<p>a</p>");
    }

    #[tokio::test]
    async fn test_unknown_url_is_not_found() {
        let fetcher = FixtureFetcher::new();
        let result = fetcher.fetch("https://b.test/", Duration::from_secs(1)).await;
        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));

        assert_eq!(fetcher.recorded_requests().await.len(), 1);
        fetcher.clear_requests().await;
        assert!(fetcher.recorded_requests().await.is_empty());
    }
}

//! Fetching HTML documents.
//!
//! Everything that talks to the network goes through the `DocumentFetcher`
//! trait so that directory and search page parsing can be exercised against
//! recorded fixtures.

mod http;

pub use http::HttpFetcher;

use async_trait::async_trait;
use scraper::Html;
use std::time::Duration;
use thiserror::Error;

/// A fetched HTML page.
///
/// The body is kept as text; `parse()` builds the DOM on demand so that
/// documents can cross `.await` points.
#[derive(Debug, Clone)]
pub struct Document {
    /// URL the document was fetched from.
    pub url: String,
    /// Raw HTML body.
    pub body: String,
}

impl Document {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }

    /// Parse the body into a DOM.
    pub fn parse(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Errors that can occur while fetching a document.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Source of HTML documents.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch `url`, giving up after `timeout`.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Document, FetchError>;
}

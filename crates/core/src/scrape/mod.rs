//! Scraping search result pages of a mirror.
//!
//! This module provides the `PageScraper` trait, implemented by
//! `PirateBayScraper` for live mirrors and by `testing::FixtureScraper` for
//! recorded pages, plus the free-text extraction rules used on result rows.

pub mod extract;
mod pirate_bay;

pub use pirate_bay::{PirateBayScraper, PirateBayScraperFactory};
pub(crate) use pirate_bay::parse_result_rows;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::document::{Document, FetchError};
use crate::torrent::Torrent;

/// Errors that can occur while scraping a mirror.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid mirror URL {url}: {reason}")]
    InvalidMirrorUrl { url: String, reason: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Search capability of a single mirror.
#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Base URL of the mirror.
    fn url(&self) -> &str;

    /// URL of the search page for `query`.
    fn search_url(&self, query: &str) -> String;

    /// Fetch and parse the search page for `query`.
    async fn search(&self, query: &str, timeout: Duration) -> Result<Vec<Torrent>, ScrapeError>;

    /// Parse a fetched search page. Malformed pages yield no torrents.
    fn parse_search_page(&self, document: &Document) -> Vec<Torrent>;
}

/// Creates a scraper for a candidate mirror.
pub trait ScraperFactory: Send + Sync {
    fn create(&self, mirror_url: &str) -> Result<Arc<dyn PageScraper>, ScrapeError>;
}

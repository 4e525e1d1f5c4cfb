//! Mirror directory: the page listing known mirrors and their status.

use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::DEFAULT_DIRECTORY_URL;
use crate::document::{Document, DocumentFetcher, FetchError};

use super::{Mirror, MirrorFilters};

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("valid CSS selector")
}

/// Fetches and filters the list of candidate mirrors.
pub struct MirrorDirectory {
    directory_url: Option<String>,
    filters: MirrorFilters,
    fetcher: Arc<dyn DocumentFetcher>,
    timeout: Duration,
}

impl MirrorDirectory {
    pub fn new(filters: MirrorFilters, fetcher: Arc<dyn DocumentFetcher>, timeout: Duration) -> Self {
        Self {
            directory_url: None,
            filters,
            fetcher,
            timeout,
        }
    }

    /// Override the page the mirror list is fetched from.
    pub fn with_directory_url(mut self, url: impl Into<String>) -> Self {
        self.directory_url = Some(url.into());
        self
    }

    /// URL the mirror list is fetched from.
    pub fn directory_url(&self) -> &str {
        self.directory_url.as_deref().unwrap_or(DEFAULT_DIRECTORY_URL)
    }

    pub fn filters(&self) -> &MirrorFilters {
        &self.filters
    }

    /// Fetch the directory and return the mirrors that pass the filters, in
    /// listing order.
    pub async fn get_mirrors(&self) -> Result<Vec<Mirror>, FetchError> {
        let document = self.fetcher.fetch(self.directory_url(), self.timeout).await?;
        let mirrors = self.parse_mirrors(&document);

        debug!(
            source = self.directory_url(),
            mirrors = mirrors.len(),
            "Mirror directory parsed"
        );
        Ok(mirrors)
    }

    /// Parse a directory page. Pages without a mirror table yield no mirrors.
    pub fn parse_mirrors(&self, document: &Document) -> Vec<Mirror> {
        let html = document.parse();
        parse_rows(&html)
            .into_iter()
            .filter(|m| self.filters.is_ok(m))
            .collect()
    }
}

fn parse_rows(html: &Html) -> Vec<Mirror> {
    let row_selector = selector("#proxyList > tbody > tr");
    let site_selector = selector(".site a");
    let country_selector = selector(".country img");
    let status_selector = selector(".status img");

    let first_attr = |row: ElementRef<'_>, sel: &Selector, attr: &str| -> Option<String> {
        row.select(sel)
            .next()
            .and_then(|e| e.value().attr(attr))
            .map(|v| v.trim().to_string())
    };

    html.select(&row_selector)
        .filter_map(|row| {
            let url = first_attr(row, &site_selector, "href").filter(|u| !u.is_empty())?;
            let country = first_attr(row, &country_selector, "alt")
                .unwrap_or_default()
                .to_uppercase();
            let status = first_attr(row, &status_selector, "alt").as_deref() == Some("up");

            Some(Mirror {
                url,
                country,
                status,
            })
        })
        .collect()
}

//! Scraper for the Pirate Bay result page template shared by all mirrors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::document::{Document, DocumentFetcher};
use crate::normalize::normalize_query;
use crate::torrent::Torrent;

use super::extract::{extract_size, extract_upload_time, extract_video_quality};
use super::{PageScraper, ScrapeError, ScraperFactory};

/// Relevance ordering understood by the search page.
const ORDER_BY_RELEVANCE: &str = "99";

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("valid CSS selector")
}

/// Runs searches against a single mirror.
pub struct PirateBayScraper {
    url: Url,
    fetcher: Arc<dyn DocumentFetcher>,
}

impl PirateBayScraper {
    /// Create a scraper for `mirror_url`.
    pub fn new(mirror_url: &str, fetcher: Arc<dyn DocumentFetcher>) -> Result<Self, ScrapeError> {
        let url = Url::parse(mirror_url).map_err(|e| ScrapeError::InvalidMirrorUrl {
            url: mirror_url.to_string(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ScrapeError::InvalidMirrorUrl {
                url: mirror_url.to_string(),
                reason: "not a base URL".to_string(),
            });
        }

        Ok(Self { url, fetcher })
    }

    /// Parse a search page as if it had been fetched at `now`.
    ///
    /// Relative upload times ("Today", "Y-day", "mins ago") are resolved
    /// against `now`.
    pub fn parse_search_page_at(&self, document: &Document, now: DateTime<Utc>) -> Vec<Torrent> {
        let html = document.parse();
        parse_result_rows(&self.url, &html, now)
    }
}

/// Parse the rows of a search result table into torrents scraped from `base`.
pub(crate) fn parse_result_rows(base: &Url, html: &Html, now: DateTime<Utc>) -> Vec<Torrent> {
    let row_selector = selector("#searchResult > tbody > tr");
    let desc_selector = selector(".detDesc");
    let link_selector = selector(".detName > .detLink");
    let badge_selector = selector("img[title='VIP'], img[title='Trusted']");
    let uploader_selector = selector(".detDesc > a.detDesc");

    let mut torrents = Vec::new();

    for row in html.select(&row_selector) {
        let cells: Vec<ElementRef> = child_elements(row, "td").collect();
        if cells.len() < 2 {
            // Pagination row
            continue;
        }
        let details = cells[1];

        let description: String = details
            .select(&desc_selector)
            .next()
            .map(|d| d.text().collect::<String>())
            .unwrap_or_default()
            .replace("&nbsp;", " ")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let link = details.select(&link_selector).next();
        let title = link.map(element_text).unwrap_or_default();
        let torrent_url = link
            .and_then(|l| l.value().attr("href"))
            .map(|href| relative_path(base, href))
            .unwrap_or_default();
        let magnet = child_elements(details, "a")
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or_default()
            .to_string();
        let uploader = details
            .select(&uploader_selector)
            .next()
            .map(element_text)
            .unwrap_or_default();

        let seeders = cells.get(2).map(|c| parse_count(*c)).unwrap_or(0);
        let leeches = cells.get(3).map(|c| parse_count(*c)).unwrap_or(0);
        let verified_uploader = row.select(&badge_selector).next().is_some();

        torrents.push(Torrent {
            size_kb: extract_size(&description),
            upload_time: extract_upload_time(&description, now),
            video_quality: extract_video_quality(&title),
            title,
            seeders,
            leeches,
            verified_uploader,
            mirror_url: base.to_string(),
            torrent_url,
            magnet,
            uploader,
        });
    }

    torrents
}

/// Path component of a detail link, which may be absolute or relative.
fn relative_path(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| href.to_string())
}

fn child_elements<'a>(
    parent: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |e| e.value().name() == name)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_count(cell: ElementRef<'_>) -> u32 {
    element_text(cell).parse().unwrap_or(0)
}

#[async_trait]
impl PageScraper for PirateBayScraper {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    fn search_url(&self, query: &str) -> String {
        let query = normalize_query(query);

        let mut search_url = self.url.clone();
        search_url.set_path("/search.php");
        search_url
            .query_pairs_mut()
            .clear()
            .append_pair("orderby", ORDER_BY_RELEVANCE)
            .append_pair("page", "0")
            .append_pair("q", &query);

        search_url.to_string()
    }

    async fn search(&self, query: &str, timeout: Duration) -> Result<Vec<Torrent>, ScrapeError> {
        let search_url = self.search_url(query);
        debug!(url = %search_url, "Searching mirror");

        let document = self.fetcher.fetch(&search_url, timeout).await?;
        let torrents = self.parse_search_page(&document);

        debug!(mirror = %self.url, results = torrents.len(), "Search page parsed");
        Ok(torrents)
    }

    fn parse_search_page(&self, document: &Document) -> Vec<Torrent> {
        self.parse_search_page_at(document, Utc::now())
    }
}

/// Builds `PirateBayScraper`s that share one document fetcher.
pub struct PirateBayScraperFactory {
    fetcher: Arc<dyn DocumentFetcher>,
}

impl PirateBayScraperFactory {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>) -> Self {
        Self { fetcher }
    }
}

impl ScraperFactory for PirateBayScraperFactory {
    fn create(&self, mirror_url: &str) -> Result<Arc<dyn PageScraper>, ScrapeError> {
        let scraper = PirateBayScraper::new(mirror_url, Arc::clone(&self.fetcher))?;
        Ok(Arc::new(scraper))
    }
}

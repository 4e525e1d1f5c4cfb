//! Fixture-backed page scrapers for resolver tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use url::Url;

use crate::document::{Document, FetchError};
use crate::normalize::normalize_query;
use crate::scrape::{parse_result_rows, PageScraper, ScrapeError, ScraperFactory};
use crate::torrent::Torrent;

/// A recorded probe of a mirror.
#[derive(Debug, Clone)]
pub struct RecordedProbe {
    /// Mirror that was searched.
    pub mirror_url: String,
    /// Query as passed by the caller.
    pub query: String,
    /// Timeout the caller asked for.
    pub timeout: Duration,
}

#[derive(Debug, Default)]
struct FixtureState {
    outcomes: HashMap<String, Result<Vec<Torrent>, FetchError>>,
    probes: Vec<RecordedProbe>,
}

fn lock(state: &Mutex<FixtureState>) -> MutexGuard<'_, FixtureState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Hands out `FixtureScraper`s that answer from a shared table of results.
///
/// Mirrors without recorded results fail every search with a connection
/// error. Every search, successful or not, is recorded as a probe.
#[derive(Debug, Default)]
pub struct FixtureScraperFactory {
    state: Arc<Mutex<FixtureState>>,
}

impl FixtureScraperFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer searches on `mirror_url` with `torrents`.
    pub fn add_results(&self, mirror_url: impl Into<String>, torrents: Vec<Torrent>) {
        lock(&self.state)
            .outcomes
            .insert(mirror_url.into(), Ok(torrents));
    }

    /// Answer searches on `mirror_url` with the rows of a recorded search page.
    pub fn add_page(&self, mirror_url: &str, html: &str) {
        let torrents = FixtureScraper::parse_page(mirror_url, html);
        self.add_results(mirror_url, torrents);
    }

    /// Fail searches on `mirror_url` with `error`.
    pub fn add_error(&self, mirror_url: impl Into<String>, error: FetchError) {
        lock(&self.state)
            .outcomes
            .insert(mirror_url.into(), Err(error));
    }

    /// All probes made so far, in order.
    pub fn recorded_probes(&self) -> Vec<RecordedProbe> {
        lock(&self.state).probes.clone()
    }
}

impl ScraperFactory for FixtureScraperFactory {
    fn create(&self, mirror_url: &str) -> Result<Arc<dyn PageScraper>, ScrapeError> {
        Ok(Arc::new(FixtureScraper {
            url: mirror_url.to_string(),
            state: Arc::clone(&self.state),
        }))
    }
}

/// A scraper replaying recorded results for one mirror.
#[derive(Debug)]
pub struct FixtureScraper {
    url: String,
    state: Arc<Mutex<FixtureState>>,
}

impl FixtureScraper {
    fn parse_page(mirror_url: &str, html: &str) -> Vec<Torrent> {
        match Url::parse(mirror_url) {
            Ok(base) => parse_result_rows(&base, &Document::new(mirror_url, html).parse(), Utc::now()),
            Err(_) => Vec::new(),
        }
    }

    fn replay(&self, query: &str, timeout: Duration) -> Result<Vec<Torrent>, ScrapeError> {
        let mut state = lock(&self.state);
        state.probes.push(RecordedProbe {
            mirror_url: self.url.clone(),
            query: query.to_string(),
            timeout,
        });

        match state.outcomes.get(&self.url) {
            Some(Ok(torrents)) => Ok(torrents.clone()),
            Some(Err(e)) => Err(e.clone().into()),
            None => Err(FetchError::ConnectionFailed(self.url.clone()).into()),
        }
    }
}

#[async_trait]
impl PageScraper for FixtureScraper {
    fn url(&self) -> &str {
        &self.url
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search.php?q={}",
            self.url.trim_end_matches('/'),
            normalize_query(query)
        )
    }

    async fn search(&self, query: &str, timeout: Duration) -> Result<Vec<Torrent>, ScrapeError> {
        self.replay(query, timeout)
    }

    fn parse_search_page(&self, document: &Document) -> Vec<Torrent> {
        Self::parse_page(&self.url, &document.body)
    }
}

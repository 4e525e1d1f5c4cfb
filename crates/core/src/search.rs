//! Searching torrents through whichever mirror currently works.
//!
//! `MirrorSearch` wires the mirror directory, the resolver and the default
//! filters from a `Config`. The free function `search_video_torrents` runs
//! the video pipeline against an already chosen scraper.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{validate_config, Config, ConfigError};
use crate::document::{DocumentFetcher, FetchError, HttpFetcher};
use crate::filter::{filter_by_title, search_video_torrent_list, FilterError, SearchFilters};
use crate::mirrors::{Mirror, MirrorDirectory, MirrorError, MirrorResolver, ResolveSchedule, Resolution};
use crate::scrape::{PageScraper, PirateBayScraperFactory, ScrapeError, ScraperFactory};
use crate::torrent::Torrent;

/// Errors that can occur while searching.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Mirror(#[from] MirrorError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Run the video pipeline on one mirror.
///
/// Searches `query`, applies the size and uploader constraints, keeps titles
/// containing every term of `contains`, then returns the best candidate per
/// quality tier, lowest tier first.
pub async fn search_video_torrents<S: AsRef<str>>(
    scraper: &dyn PageScraper,
    query: &str,
    filters: &SearchFilters,
    contains: &[S],
    timeout: Duration,
) -> Result<Vec<Torrent>, SearchError> {
    let torrents = scraper.search(query, timeout).await?;
    debug!(mirror = scraper.url(), results = torrents.len(), "Search page scraped");
    Ok(select_video_torrents(&torrents, filters, contains)?)
}

/// Filtering half of `search_video_torrents`, for results already in hand.
pub fn select_video_torrents<S: AsRef<str>>(
    torrents: &[Torrent],
    filters: &SearchFilters,
    contains: &[S],
) -> Result<Vec<Torrent>, FilterError> {
    let filtered = filters.filter_torrents(torrents)?;
    let titled = filter_by_title(&filtered, contains);
    Ok(search_video_torrent_list(&titled, filters)?
        .into_values()
        .collect())
}

/// Entry point tying mirror discovery, resolution and filtering together.
pub struct MirrorSearch {
    directory: MirrorDirectory,
    resolver: MirrorResolver,
    factory: Arc<dyn ScraperFactory>,
    filters: SearchFilters,
}

impl MirrorSearch {
    /// Validate `config` and build a search over live mirrors.
    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        validate_config(config)?;
        let fetcher = Arc::new(HttpFetcher::new(&config.http)?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Build a search that fetches every page through `fetcher`.
    pub fn with_fetcher(config: &Config, fetcher: Arc<dyn DocumentFetcher>) -> Self {
        let factory: Arc<dyn ScraperFactory> =
            Arc::new(PirateBayScraperFactory::new(Arc::clone(&fetcher)));
        Self::with_factory(config, fetcher, factory)
    }

    /// Build a search with an explicit scraper factory.
    pub fn with_factory(
        config: &Config,
        fetcher: Arc<dyn DocumentFetcher>,
        factory: Arc<dyn ScraperFactory>,
    ) -> Self {
        let directory = MirrorDirectory::new(
            config.mirrors.filters.clone(),
            fetcher,
            Duration::from_secs(config.http.directory_timeout_secs),
        )
        .with_directory_url(config.mirrors.directory_url.clone());

        let resolver = MirrorResolver::new(
            Arc::clone(&factory),
            config.mirrors.filters.clone(),
            config.mirrors.fallback.clone(),
        )
        .with_schedule(ResolveSchedule::from(&config.resolver));

        Self {
            directory,
            resolver,
            factory,
            filters: config.search.clone(),
        }
    }

    pub fn directory(&self) -> &MirrorDirectory {
        &self.directory
    }

    pub fn resolver(&self) -> &MirrorResolver {
        &self.resolver
    }

    /// Default filters from configuration.
    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    /// Mirrors listed by the directory that pass the configured filters.
    pub async fn get_mirrors(&self) -> Result<Vec<Mirror>, SearchError> {
        Ok(self.directory.get_mirrors().await.map_err(MirrorError::from)?)
    }

    /// Results for `query` from the first mirror that answers.
    pub async fn get_torrents(&self, query: &str) -> Result<Resolution, SearchError> {
        let mirrors = self.get_mirrors().await?;
        let resolution = self.resolver.resolve(query, &mirrors).await?;
        info!(
            mirror = %resolution.mirror.url,
            results = resolution.torrents.len(),
            "Torrents found"
        );
        Ok(resolution)
    }

    /// The first mirror that answers `query` with results.
    pub async fn pick_mirror(&self, query: &str) -> Result<Mirror, SearchError> {
        Ok(self.get_torrents(query).await?.mirror)
    }

    /// A scraper bound to the first mirror that answers `query`.
    pub async fn find_scraper(&self, query: &str) -> Result<Arc<dyn PageScraper>, SearchError> {
        let mirror = self.pick_mirror(query).await?;
        Ok(self.factory.create(&mirror.url)?)
    }

    /// Best torrent per quality tier for `query`, using the configured
    /// filters and requiring every term of `contains` in the title.
    pub async fn search_videos<S: AsRef<str>>(
        &self,
        query: &str,
        contains: &[S],
    ) -> Result<Vec<Torrent>, SearchError> {
        let resolution = self.get_torrents(query).await?;
        Ok(select_video_torrents(&resolution.torrents, &self.filters, contains)?)
    }
}

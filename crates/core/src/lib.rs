pub mod config;
pub mod document;
pub mod filter;
pub mod mirrors;
pub mod normalize;
pub mod scrape;
pub mod search;
pub mod testing;
pub mod torrent;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config, ConfigError,
    HttpConfig, MirrorConfig, ResolverConfig, DEFAULT_DIRECTORY_URL,
};
pub use document::{Document, DocumentFetcher, FetchError, HttpFetcher};
pub use filter::{
    filter_by_title, parse_size_kb, pick_video_torrent, search_video_torrent_list, FilterError,
    SearchFilters,
};
pub use mirrors::{
    Mirror, MirrorDirectory, MirrorError, MirrorFilters, MirrorResolver, Resolution,
    ResolveSchedule, ResolveStep,
};
pub use normalize::normalize_query;
pub use scrape::{PageScraper, PirateBayScraper, PirateBayScraperFactory, ScrapeError, ScraperFactory};
pub use search::{search_video_torrents, select_video_torrents, MirrorSearch, SearchError};
pub use torrent::{Torrent, UnknownQuality, VideoQuality};

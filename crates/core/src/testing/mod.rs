//! Testing utilities and fixture-backed implementations.
//!
//! `FixtureFetcher` replays recorded HTML pages in place of the network and
//! `FixtureScraperFactory` replays per-mirror search results, so directory
//! parsing and mirror resolution can be exercised without real mirrors.
//!
//! # Example
//!
//! ```rust,ignore
//! use baymirror_core::testing::{fixtures, FixtureScraperFactory};
//!
//! let factory = FixtureScraperFactory::new();
//! factory.add_results("https://m1.test/", vec![fixtures::torrent("Movie.2020.1080p")]);
//!
//! let resolver = MirrorResolver::new(Arc::new(factory), filters, fallback);
//! ```

mod fixture_fetcher;
mod fixture_scraper;

pub use fixture_fetcher::{FixtureFetcher, RecordedRequest};
pub use fixture_scraper::{FixtureScraper, FixtureScraperFactory, RecordedProbe};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::mirrors::Mirror;
    use crate::scrape::extract::extract_video_quality;
    use crate::torrent::Torrent;

    /// Create a test torrent with reasonable defaults.
    ///
    /// The quality is classified from the title the same way scraped rows are.
    pub fn torrent(title: &str) -> Torrent {
        torrent_with_size(title, 1024 * 1024) // 1 GiB
    }

    /// Create a test torrent of `size_kb` kilobytes.
    pub fn torrent_with_size(title: &str, size_kb: u64) -> Torrent {
        Torrent {
            title: title.to_string(),
            size_kb,
            seeders: 10,
            leeches: 2,
            verified_uploader: false,
            video_quality: extract_video_quality(title),
            mirror_url: "https://mirror.test/".to_string(),
            torrent_url: format!("/torrent/1/{}", title),
            magnet: format!("magnet:?xt=urn:btih:{}", title.len()),
            upload_time: None,
            uploader: "uploader".to_string(),
        }
    }

    /// Create a test torrent from a verified uploader.
    pub fn verified_torrent(title: &str) -> Torrent {
        Torrent {
            verified_uploader: true,
            ..torrent(title)
        }
    }

    /// Create a test mirror that is reported up.
    pub fn mirror(url: &str, country: &str) -> Mirror {
        Mirror::new(url, country, true)
    }
}

//! Filtering and per-quality selection of scraped torrents.
//!
//! Filters are applied in a fixed order: size and uploader constraints first
//! (`SearchFilters::filter_torrents`), then title containment
//! (`filter_by_title`), then bucketing by quality tier
//! (`search_video_torrent_list`) or picking a single result
//! (`pick_video_torrent`). Input order is treated as the source's relevance
//! order and is never re-sorted.

mod select;
mod size;
mod types;

pub use select::{filter_by_title, pick_video_torrent, search_video_torrent_list};
pub use size::parse_size_kb;
pub use types::SearchFilters;

use thiserror::Error;

/// Errors that can occur while filtering torrents.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid size filter: {0}")]
    InvalidSize(String),

    #[error("No torrent found with the specified filters")]
    NotFound,
}

use serde::{Deserialize, Serialize};

use crate::torrent::{Torrent, VideoQuality};

use super::size::parse_size_kb;
use super::FilterError;

/// Constraints a torrent has to satisfy to be selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Lower size bound, e.g. `"500 MB"`. Unbounded when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<String>,
    /// Upper size bound, e.g. `"4 GB"`. Unbounded when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<String>,
    /// Only accept torrents from VIP or trusted uploaders.
    #[serde(default)]
    pub verified_uploader: bool,
    /// Desired quality tier; `Default` accepts any tier.
    #[serde(default)]
    pub video_quality: VideoQuality,
}

impl SearchFilters {
    /// Lower size bound in kilobytes.
    pub fn min_size_kb(&self) -> Result<u64, FilterError> {
        match &self.min_size {
            Some(size) => parse_size_kb(size),
            None => Ok(0),
        }
    }

    /// Upper size bound in kilobytes.
    pub fn max_size_kb(&self) -> Result<u64, FilterError> {
        match &self.max_size {
            Some(size) => parse_size_kb(size),
            None => Ok(u64::MAX),
        }
    }

    /// Check that both size bounds parse.
    pub fn validate(&self) -> Result<(), FilterError> {
        self.min_size_kb()?;
        self.max_size_kb()?;
        Ok(())
    }

    /// Keep the torrents that satisfy the size and uploader constraints,
    /// preserving input order.
    pub fn filter_torrents(&self, torrents: &[Torrent]) -> Result<Vec<Torrent>, FilterError> {
        let bounds = self.size_bounds()?;

        Ok(torrents
            .iter()
            .filter(|t| self.accepts(t, bounds))
            .cloned()
            .collect())
    }

    pub(crate) fn size_bounds(&self) -> Result<(u64, u64), FilterError> {
        Ok((self.min_size_kb()?, self.max_size_kb()?))
    }

    pub(crate) fn accepts(&self, torrent: &Torrent, (min_kb, max_kb): (u64, u64)) -> bool {
        if self.verified_uploader && !torrent.verified_uploader {
            return false;
        }
        torrent.size_kb >= min_kb && torrent.size_kb <= max_kb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_unbounded_by_default() {
        let filters = SearchFilters::default();
        assert_eq!(filters.min_size_kb(), Ok(0));
        assert_eq!(filters.max_size_kb(), Ok(u64::MAX));
    }

    #[test]
    fn test_filter_by_size() {
        let torrents = vec![
            fixtures::torrent_with_size("small", 100),
            fixtures::torrent_with_size("medium", 700 * 1024),
            fixtures::torrent_with_size("large", 9 * 1024 * 1024),
        ];
        let filters = SearchFilters {
            min_size: Some("500 MB".to_string()),
            max_size: Some("4 GB".to_string()),
            ..Default::default()
        };

        let kept = filters.filter_torrents(&torrents).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "medium");
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let torrents = vec![fixtures::torrent_with_size("exact", 1024)];
        let filters = SearchFilters {
            min_size: Some("1 MB".to_string()),
            max_size: Some("1 MB".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.filter_torrents(&torrents).unwrap().len(), 1);
    }

    #[test]
    fn test_filter_verified_uploader() {
        let trusted = fixtures::verified_torrent("trusted");
        let anonymous = fixtures::torrent("anonymous");

        let filters = SearchFilters {
            verified_uploader: true,
            ..Default::default()
        };
        let kept = filters
            .filter_torrents(&[anonymous.clone(), trusted.clone()])
            .unwrap();
        assert_eq!(kept, vec![trusted.clone()]);

        let everything = SearchFilters::default()
            .filter_torrents(&[anonymous, trusted])
            .unwrap();
        assert_eq!(everything.len(), 2);
    }

    #[test]
    fn test_malformed_size_is_an_error() {
        let filters = SearchFilters {
            min_size: Some("big".to_string()),
            ..Default::default()
        };
        assert!(filters.validate().is_err());
        assert_eq!(
            filters.filter_torrents(&[]),
            Err(FilterError::InvalidSize("big".to_string()))
        );
    }
}

use std::collections::BTreeMap;

use tracing::debug;

use crate::normalize::normalize_query;
use crate::torrent::{Torrent, VideoQuality};

use super::{FilterError, SearchFilters};

/// Keep the torrents whose normalized title contains every normalized term.
///
/// An empty term list keeps everything.
pub fn filter_by_title<S: AsRef<str>>(torrents: &[Torrent], terms: &[S]) -> Vec<Torrent> {
    let terms: Vec<String> = terms
        .iter()
        .map(|t| normalize_query(t.as_ref()))
        .collect();

    torrents
        .iter()
        .filter(|torrent| {
            let title = normalize_query(&torrent.title);
            let matched = terms.iter().all(|term| title.contains(term.as_str()));
            if !matched {
                debug!(title = %torrent.title, terms = ?terms, "Title does not match");
            }
            matched
        })
        .cloned()
        .collect()
}

/// Select at most one torrent per quality tier.
///
/// The list is first narrowed with `SearchFilters::filter_torrents`; within
/// each tier the earliest torrent in input order wins.
pub fn search_video_torrent_list(
    torrents: &[Torrent],
    filters: &SearchFilters,
) -> Result<BTreeMap<VideoQuality, Torrent>, FilterError> {
    let filtered = filters.filter_torrents(torrents)?;

    let mut per_quality = BTreeMap::new();
    for torrent in filtered {
        per_quality.entry(torrent.video_quality).or_insert(torrent);
    }

    Ok(per_quality)
}

/// Pick the first torrent that satisfies the filters.
///
/// When `filters.video_quality` names a tier other than `Default`, only
/// torrents of that tier qualify.
pub fn pick_video_torrent(
    torrents: &[Torrent],
    filters: &SearchFilters,
) -> Result<Torrent, FilterError> {
    let bounds = filters.size_bounds()?;

    torrents
        .iter()
        .filter(|t| {
            filters.video_quality == VideoQuality::Default
                || t.video_quality == filters.video_quality
        })
        .find(|t| filters.accepts(t, bounds))
        .cloned()
        .ok_or(FilterError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn quality_list() -> Vec<Torrent> {
        vec![
            fixtures::torrent("Movie.2020.1080p.BluRay.x264"),
            fixtures::torrent("Movie.2020.720p.WEB"),
            fixtures::torrent("Movie.2020.1080p.WEB-DL"),
            fixtures::torrent("Movie 2020 2160p UHD"),
            fixtures::torrent("Movie 2020 CAM"),
            fixtures::torrent("Movie.2020.720p.HDTV"),
        ]
    }

    #[test]
    fn test_filter_by_title_requires_all_terms() {
        let torrents = vec![
            fixtures::torrent("The.Matrix.1999.1080p"),
            fixtures::torrent("The.Matrix.Reloaded.2003.720p"),
            fixtures::torrent("Matrix Documentary 1999"),
        ];

        let kept = filter_by_title(&torrents, &["The Matrix", "1999"]);
        let titles: Vec<_> = kept.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["The.Matrix.1999.1080p"]);
    }

    #[test]
    fn test_filter_by_title_is_case_insensitive() {
        let torrents = vec![fixtures::torrent("AMELIE.2001.720p")];
        assert_eq!(filter_by_title(&torrents, &["amelie"]).len(), 1);
    }

    #[test]
    fn test_filter_by_title_without_terms_keeps_all() {
        let torrents = quality_list();
        let no_terms: [&str; 0] = [];
        assert_eq!(filter_by_title(&torrents, &no_terms).len(), torrents.len());
    }

    #[test]
    fn test_one_torrent_per_quality() {
        let per_quality =
            search_video_torrent_list(&quality_list(), &SearchFilters::default()).unwrap();

        assert_eq!(per_quality.len(), 4);
        assert_eq!(
            per_quality[&VideoQuality::High].title,
            "Movie.2020.1080p.BluRay.x264"
        );
        assert_eq!(per_quality[&VideoQuality::Medium].title, "Movie.2020.720p.WEB");
        assert_eq!(per_quality[&VideoQuality::Uhd].title, "Movie 2020 2160p UHD");
        assert_eq!(per_quality[&VideoQuality::Default].title, "Movie 2020 CAM");
        assert!(!per_quality.contains_key(&VideoQuality::Low));
    }

    #[test]
    fn test_per_quality_applies_filters_first() {
        let mut list = quality_list();
        list[0].size_kb = 50 * 1024 * 1024;
        let filters = SearchFilters {
            max_size: Some("10 GB".to_string()),
            ..Default::default()
        };

        let per_quality = search_video_torrent_list(&list, &filters).unwrap();
        assert_eq!(
            per_quality[&VideoQuality::High].title,
            "Movie.2020.1080p.WEB-DL"
        );
    }

    #[test]
    fn test_per_quality_empty_input() {
        let per_quality = search_video_torrent_list(&[], &SearchFilters::default()).unwrap();
        assert!(per_quality.is_empty());
    }

    #[test]
    fn test_pick_first_matching() {
        let mut list = quality_list();
        list[0].verified_uploader = false;
        list[1].verified_uploader = true;
        let filters = SearchFilters {
            verified_uploader: true,
            ..Default::default()
        };

        let picked = pick_video_torrent(&list, &filters).unwrap();
        assert_eq!(picked.title, "Movie.2020.720p.WEB");
    }

    #[test]
    fn test_pick_honors_desired_quality() {
        let filters = SearchFilters {
            video_quality: VideoQuality::Uhd,
            ..Default::default()
        };
        let picked = pick_video_torrent(&quality_list(), &filters).unwrap();
        assert_eq!(picked.title, "Movie 2020 2160p UHD");
    }

    #[test]
    fn test_pick_not_found() {
        let filters = SearchFilters {
            min_size: Some("1 TB".to_string()),
            ..Default::default()
        };
        assert_eq!(
            pick_video_torrent(&quality_list(), &filters),
            Err(FilterError::NotFound)
        );
        assert_eq!(
            pick_video_torrent(&[], &SearchFilters::default()),
            Err(FilterError::NotFound)
        );
    }
}

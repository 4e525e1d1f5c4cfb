//! Mirror records and allow/deny filters.

use serde::{Deserialize, Serialize};

use crate::torrent::Torrent;

/// A mirror of the index site, as listed by the mirror directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mirror {
    pub url: String,
    #[serde(default)]
    pub country: String,
    /// Liveness as reported by the directory, not probed.
    #[serde(default)]
    pub status: bool,
}

impl Mirror {
    pub fn new(url: impl Into<String>, country: impl Into<String>, status: bool) -> Self {
        Self {
            url: url.into(),
            country: country.into(),
            status,
        }
    }
}

/// Filters for picking mirrors.
///
/// Whitelist and blacklist entries are matched as case-insensitive substrings
/// against a mirror's URL or country.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorFilters {
    /// Mirror tried before any directory entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred: Option<String>,
    #[serde(default)]
    pub whitelist: Vec<String>,
    #[serde(default)]
    pub blacklist: Vec<String>,
}

impl MirrorFilters {
    /// Whether `mirror` passes the filters.
    ///
    /// The blacklist always wins: a blacklisted mirror is rejected even when
    /// it is also whitelisted.
    pub fn is_ok(&self, mirror: &Mirror) -> bool {
        let listed = |list: &[String]| {
            let url = mirror.url.to_lowercase();
            let country = mirror.country.to_lowercase();
            list.iter().any(|entry| {
                let entry = entry.to_lowercase();
                url.contains(&entry) || country.contains(&entry)
            })
        };

        (self.blacklist.is_empty() || !listed(&self.blacklist))
            && (self.whitelist.is_empty() || listed(&self.whitelist))
    }
}

/// Outcome of a successful mirror resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// First mirror, in priority order, that returned results.
    pub mirror: Mirror,
    /// Results of that mirror, in the mirror's relevance order.
    pub torrents: Vec<Torrent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mirrors() -> Vec<Mirror> {
        vec![
            Mirror::new("https://piratebay.party", "US", true),
            Mirror::new("https://thepiratebay0.org", "NL", true),
            Mirror::new("https://pirateproxy.live", "UK", true),
            Mirror::new("https://tpb.skynet.example", "UK", false),
        ]
    }

    fn kept(filters: &MirrorFilters) -> Vec<String> {
        mirrors()
            .into_iter()
            .filter(|m| filters.is_ok(m))
            .map(|m| m.url)
            .collect()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_filters_keep_everything() {
        assert_eq!(kept(&MirrorFilters::default()).len(), 4);
    }

    #[test]
    fn test_blacklist_by_country() {
        let filters = MirrorFilters {
            blacklist: strings(&["uk"]),
            ..Default::default()
        };
        assert_eq!(
            kept(&filters),
            vec!["https://piratebay.party", "https://thepiratebay0.org"]
        );
    }

    #[test]
    fn test_blacklist_beats_whitelist() {
        let filters = MirrorFilters {
            whitelist: strings(&["UK", "pirateproxy"]),
            blacklist: strings(&["UK"]),
            ..Default::default()
        };
        assert!(kept(&filters).is_empty());
    }

    #[test]
    fn test_whitelist_by_url_substring() {
        let filters = MirrorFilters {
            whitelist: strings(&["PirateBay"]),
            ..Default::default()
        };
        assert_eq!(
            kept(&filters),
            vec!["https://piratebay.party", "https://thepiratebay0.org"]
        );
    }

    #[test]
    fn test_whitelist_and_blacklist_combined() {
        let filters = MirrorFilters {
            whitelist: strings(&["uk"]),
            blacklist: strings(&["skynet"]),
            ..Default::default()
        };
        assert_eq!(kept(&filters), vec!["https://pirateproxy.live"]);
    }
}

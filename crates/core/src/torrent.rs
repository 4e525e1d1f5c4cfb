//! Scraped torrent records and video quality tiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Video quality tier inferred from a title, or requested by the caller.
///
/// Tiers are ordered: `Default < Low < Medium < High < Uhd`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VideoQuality {
    /// No quality keyword recognized.
    #[default]
    #[serde(rename = "default", alias = "any")]
    Default,
    #[serde(rename = "480p", alias = "low")]
    Low,
    #[serde(rename = "720p", alias = "medium")]
    Medium,
    #[serde(rename = "1080p", alias = "high")]
    High,
    #[serde(rename = "2160p", alias = "4k", alias = "4K", alias = "uhd", alias = "ultrahd")]
    Uhd,
}

impl VideoQuality {
    /// All tiers in ascending order.
    pub const ALL: [VideoQuality; 5] = [
        VideoQuality::Default,
        VideoQuality::Low,
        VideoQuality::Medium,
        VideoQuality::High,
        VideoQuality::Uhd,
    ];

    /// Canonical name, as it appears in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoQuality::Default => "default",
            VideoQuality::Low => "480p",
            VideoQuality::Medium => "720p",
            VideoQuality::High => "1080p",
            VideoQuality::Uhd => "2160p",
        }
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a quality name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown video quality: {0}")]
pub struct UnknownQuality(pub String);

impl FromStr for VideoQuality {
    type Err = UnknownQuality;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "default" | "any" => Ok(VideoQuality::Default),
            "480p" | "low" => Ok(VideoQuality::Low),
            "720p" | "medium" => Ok(VideoQuality::Medium),
            "1080p" | "high" => Ok(VideoQuality::High),
            "2160p" | "4k" | "uhd" | "ultrahd" => Ok(VideoQuality::Uhd),
            other => Err(UnknownQuality(other.to_string())),
        }
    }
}

/// A single search result scraped from a mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Torrent {
    pub title: String,
    /// Size in kilobytes.
    #[serde(rename = "size")]
    pub size_kb: u64,
    pub seeders: u32,
    pub leeches: u32,
    pub verified_uploader: bool,
    pub video_quality: VideoQuality,
    /// Mirror the torrent was scraped from.
    pub mirror_url: String,
    /// Detail page path, relative to `mirror_url`.
    pub torrent_url: String,
    pub magnet: String,
    /// `None` when the listing's upload date could not be parsed.
    pub upload_time: Option<DateTime<Utc>>,
    pub uploader: String,
}

impl Torrent {
    /// Absolute URL of the torrent's detail page on the mirror it came from.
    pub fn full_url(&self) -> String {
        format!(
            "{}/{}",
            self.mirror_url.trim_matches('/'),
            self.torrent_url.trim_matches('/')
        )
    }

    /// Connected peers in `seeders / total` form.
    pub fn peers_string(&self) -> String {
        let total = u64::from(self.seeders) + u64::from(self.leeches);
        format!("{} / {}", self.seeders, total)
    }

    /// Human readable size using decimal units.
    pub fn size_string(&self) -> String {
        const UNIT: u128 = 1000;
        let size_bytes = u128::from(self.size_kb) * UNIT;
        if size_bytes < UNIT {
            return format!("{} B", size_bytes);
        }

        let mut div = UNIT;
        let mut exp = 0;
        let mut n = size_bytes / UNIT;
        while n >= UNIT {
            div *= UNIT;
            exp += 1;
            n /= UNIT;
        }

        let prefix = ['K', 'M', 'G', 'T', 'P', 'E', 'Z'][exp];
        format!("{:.1} {}B", size_bytes as f64 / div as f64, prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_torrent(size_kb: u64) -> Torrent {
        Torrent {
            title: "Some.Movie.2019.1080p".to_string(),
            size_kb,
            seeders: 12,
            leeches: 3,
            verified_uploader: true,
            video_quality: VideoQuality::High,
            mirror_url: "https://mirror.example/".to_string(),
            torrent_url: "/torrent/42/Some.Movie".to_string(),
            magnet: "magnet:?xt=urn:btih:abc".to_string(),
            upload_time: None,
            uploader: "someone".to_string(),
        }
    }

    #[test]
    fn test_quality_ordering() {
        assert!(VideoQuality::Default < VideoQuality::Low);
        assert!(VideoQuality::Low < VideoQuality::Medium);
        assert!(VideoQuality::Medium < VideoQuality::High);
        assert!(VideoQuality::High < VideoQuality::Uhd);
    }

    #[test]
    fn test_quality_from_str() {
        assert_eq!("720p".parse::<VideoQuality>().unwrap(), VideoQuality::Medium);
        assert_eq!("4K".parse::<VideoQuality>().unwrap(), VideoQuality::Uhd);
        assert_eq!("".parse::<VideoQuality>().unwrap(), VideoQuality::Default);
        assert!("8k".parse::<VideoQuality>().is_err());
    }

    #[test]
    fn test_canonical_names_parse_back() {
        for quality in VideoQuality::ALL {
            assert_eq!(quality.as_str().parse::<VideoQuality>().unwrap(), quality);
            let json = serde_json::to_string(&quality).unwrap();
            assert_eq!(serde_json::from_str::<VideoQuality>(&json).unwrap(), quality);
        }
    }

    #[test]
    fn test_quality_deserializes_aliases() {
        for (alias, quality) in [
            ("\"4k\"", VideoQuality::Uhd),
            ("\"uhd\"", VideoQuality::Uhd),
            ("\"high\"", VideoQuality::High),
            ("\"medium\"", VideoQuality::Medium),
            ("\"low\"", VideoQuality::Low),
            ("\"any\"", VideoQuality::Default),
        ] {
            assert_eq!(serde_json::from_str::<VideoQuality>(alias).unwrap(), quality);
        }
    }

    #[test]
    fn test_quality_serialization() {
        assert_eq!(serde_json::to_string(&VideoQuality::High).unwrap(), "\"1080p\"");
        assert_eq!(
            serde_json::to_string(&VideoQuality::Default).unwrap(),
            "\"default\""
        );
    }

    #[test]
    fn test_torrent_serialized_field_names() {
        let json = serde_json::to_value(make_torrent(2048)).unwrap();
        for field in [
            "title",
            "size",
            "seeders",
            "leeches",
            "verified_uploader",
            "video_quality",
            "mirror_url",
            "torrent_url",
            "magnet",
            "upload_time",
            "uploader",
        ] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }
        assert_eq!(json["size"], 2048);
    }

    #[test]
    fn test_full_url() {
        let torrent = make_torrent(1);
        assert_eq!(
            torrent.full_url(),
            "https://mirror.example/torrent/42/Some.Movie"
        );
    }

    #[test]
    fn test_peers_string() {
        assert_eq!(make_torrent(1).peers_string(), "12 / 15");
    }

    #[test]
    fn test_size_string() {
        assert_eq!(make_torrent(0).size_string(), "0 B");
        assert_eq!(make_torrent(1).size_string(), "1.0 KB");
        assert_eq!(make_torrent(1_500).size_string(), "1.5 MB");
        assert_eq!(make_torrent(1_572_864).size_string(), "1.6 GB");
    }

    #[test]
    fn test_size_string_largest_size() {
        assert_eq!(make_torrent(u64::MAX).size_string(), "18.4 ZB");
    }

    #[test]
    fn test_peers_string_does_not_overflow() {
        let mut torrent = make_torrent(1);
        torrent.seeders = u32::MAX;
        torrent.leeches = u32::MAX;
        assert_eq!(torrent.peers_string(), "4294967295 / 8589934590");
    }
}

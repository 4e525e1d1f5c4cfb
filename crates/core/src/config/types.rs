use serde::{Deserialize, Serialize};

use crate::filter::SearchFilters;
use crate::mirrors::{Mirror, MirrorFilters};

/// Default page listing known mirrors and their reported status.
pub const DEFAULT_DIRECTORY_URL: &str = "https://proxybay.github.io/";

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub mirrors: MirrorConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub http: HttpConfig,
    /// Default filters applied to searches.
    #[serde(default)]
    pub search: SearchFilters,
}

/// Mirror discovery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MirrorConfig {
    /// Page listing candidate mirrors.
    #[serde(default = "default_directory_url")]
    pub directory_url: String,
    /// Preferred mirror plus allow/deny lists.
    #[serde(flatten)]
    pub filters: MirrorFilters,
    /// Last-resort mirror appended after every directory entry.
    #[serde(default = "default_fallback_mirror")]
    pub fallback: Mirror,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            directory_url: default_directory_url(),
            filters: MirrorFilters::default(),
            fallback: default_fallback_mirror(),
        }
    }
}

fn default_directory_url() -> String {
    DEFAULT_DIRECTORY_URL.to_string()
}

fn default_fallback_mirror() -> Mirror {
    Mirror {
        url: "https://pirateproxy.mx/".to_string(),
        country: "UK".to_string(),
        status: false,
    }
}

/// Mirror resolution schedule
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Timeout of the first round, doubled after every failed round.
    #[serde(default = "default_initial_timeout_ms")]
    pub initial_timeout_ms: u64,
    /// Rounds stop once the doubled timeout exceeds this value.
    #[serde(default = "default_max_timeout_ms")]
    pub max_timeout_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            initial_timeout_ms: default_initial_timeout_ms(),
            max_timeout_ms: default_max_timeout_ms(),
        }
    }
}

fn default_initial_timeout_ms() -> u64 {
    3_000
}

fn default_max_timeout_ms() -> u64 {
    10_000
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    /// Value of the `X-Forwarded-For` header, omitted when unset.
    #[serde(default = "default_forwarded_for")]
    pub forwarded_for: Option<String>,
    /// Timeout for fetching the mirror directory (default: 30)
    #[serde(default = "default_directory_timeout")]
    pub directory_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            forwarded_for: default_forwarded_for(),
            directory_timeout_secs: default_directory_timeout(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.8,gd;q=0.6".to_string()
}

fn default_forwarded_for() -> Option<String> {
    Some("165.234.102.177".to_string())
}

fn default_directory_timeout() -> u64 {
    30
}

use url::Url;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Directory, fallback and preferred mirror URLs parse
/// - Resolver timeouts are non-zero and ordered
/// - Size filters parse, so malformed values fail before any request is made
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    check_url("mirrors.directory_url", &config.mirrors.directory_url)?;
    check_url("mirrors.fallback.url", &config.mirrors.fallback.url)?;
    if let Some(preferred) = &config.mirrors.filters.preferred {
        check_url("mirrors.preferred", preferred)?;
    }

    let resolver = &config.resolver;
    if resolver.initial_timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.initial_timeout_ms cannot be 0".to_string(),
        ));
    }
    if resolver.initial_timeout_ms > resolver.max_timeout_ms {
        return Err(ConfigError::ValidationError(format!(
            "resolver.initial_timeout_ms ({}) exceeds resolver.max_timeout_ms ({})",
            resolver.initial_timeout_ms, resolver.max_timeout_ms
        )));
    }

    if config.http.directory_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "http.directory_timeout_secs cannot be 0".to_string(),
        ));
    }

    config
        .search
        .validate()
        .map_err(|e| ConfigError::ValidationError(format!("search: {}", e)))?;

    Ok(())
}

fn check_url(field: &str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::ValidationError(format!("{} is not a valid URL: {}", field, e)))
}

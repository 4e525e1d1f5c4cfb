//! Parsing of human-written size limits such as `"1.5 GB"` or `"700MiB"`.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::FilterError;

static SIZE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*([A-Za-z]*)\s*$").expect("valid size pattern")
});

/// Parse a size string into kilobytes.
///
/// Decimal and binary unit names are both read with binary multipliers
/// (`1 GB == 1 GiB == 1048576 KB`). A bare number is taken as kilobytes.
pub fn parse_size_kb(value: &str) -> Result<u64, FilterError> {
    let caps = SIZE_PATTERN
        .captures(value)
        .ok_or_else(|| FilterError::InvalidSize(value.to_string()))?;

    let amount: f64 = caps[1]
        .parse()
        .map_err(|_| FilterError::InvalidSize(value.to_string()))?;

    let multiplier = match caps[2].to_lowercase().as_str() {
        "b" | "bytes" => 1.0 / 1024.0,
        "" | "k" | "kb" | "kib" => 1.0,
        "m" | "mb" | "mib" => 1024.0,
        "g" | "gb" | "gib" => 1024.0 * 1024.0,
        "t" | "tb" | "tib" => 1024.0 * 1024.0 * 1024.0,
        _ => return Err(FilterError::InvalidSize(value.to_string())),
    };

    Ok((amount * multiplier).round() as u64)
}

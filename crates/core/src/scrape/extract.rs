//! Free-text extraction rules for search result rows.
//!
//! Each extractor is an ordered list of independent rules; the first rule that
//! yields a value wins. Rules never see HTML, only the whitespace-stripped
//! description text or the title, and time rules take `now` explicitly.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};

use crate::normalize::normalize_query;
use crate::torrent::VideoQuality;

/// Extracts a size in kilobytes from description text.
pub type SizeRule = fn(&str) -> Option<u64>;

/// Extracts an upload timestamp from description text.
pub type UploadTimeRule = fn(&str, DateTime<Utc>) -> Option<DateTime<Utc>>;

/// Size rules in priority order.
pub const SIZE_RULES: [SizeRule; 3] = [size_gib, size_mib, size_kib];

/// Upload time rules in priority order.
pub const UPLOAD_TIME_RULES: [UploadTimeRule; 5] = [
    uploaded_month_day_time,
    uploaded_month_day_year,
    uploaded_today,
    uploaded_yesterday,
    uploaded_minutes_ago,
];

/// Title keywords per quality tier, tested from the best tier down.
const QUALITY_TERMS: [(VideoQuality, &[&str]); 4] = [
    (VideoQuality::Uhd, &["2160p", "4k", "uhd", "ultrahd"]),
    (VideoQuality::High, &["1080p"]),
    (VideoQuality::Medium, &["720p"]),
    (VideoQuality::Low, &["480p"]),
];

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("valid extraction pattern")
}

static SIZE_GIB: Lazy<Regex> = Lazy::new(|| pattern(r"Size\s*(\d+(?:\.\d+)?)\s*GiB"));
static SIZE_MIB: Lazy<Regex> = Lazy::new(|| pattern(r"Size\s*(\d+(?:\.\d+)?)\s*MiB"));
static SIZE_KIB: Lazy<Regex> = Lazy::new(|| pattern(r"Size\s*(\d+(?:\.\d+)?)\s*KiB"));

static UPLOADED_MONTH_DAY_TIME: Lazy<Regex> =
    Lazy::new(|| pattern(r"Uploaded\s*(\d\d)-(\d\d)\s*(\d\d):(\d\d)"));
static UPLOADED_MONTH_DAY_YEAR: Lazy<Regex> =
    Lazy::new(|| pattern(r"Uploaded\s*(\d\d)-(\d\d)\s*(\d{4})"));
static UPLOADED_TODAY: Lazy<Regex> = Lazy::new(|| pattern(r"Uploaded\s*Today\s*(\d\d):(\d\d)"));
static UPLOADED_YESTERDAY: Lazy<Regex> =
    Lazy::new(|| pattern(r"Uploaded\s*Y-day\s*(\d\d):(\d\d)"));
static UPLOADED_MINUTES_AGO: Lazy<Regex> =
    Lazy::new(|| pattern(r"Uploaded\s*(\d+)\s*mins?\s*ago"));

/// Size of a listing in kilobytes, 0 when no rule matches.
pub fn extract_size(description: &str) -> u64 {
    SIZE_RULES
        .iter()
        .find_map(|rule| rule(description))
        .unwrap_or(0)
}

/// Upload time of a listing, `None` when no rule matches.
pub fn extract_upload_time(description: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    UPLOAD_TIME_RULES
        .iter()
        .find_map(|rule| rule(description, now))
}

/// Quality tier of a title, matched on whole normalized tokens.
pub fn extract_video_quality(title: &str) -> VideoQuality {
    let normalized = normalize_query(title);
    let words: Vec<&str> = normalized.split_whitespace().collect();

    QUALITY_TERMS
        .iter()
        .find(|(_, terms)| words.iter().any(|w| terms.contains(w)))
        .map(|(quality, _)| *quality)
        .unwrap_or_default()
}

fn size_in_unit(re: &Regex, kb_per_unit: f64, description: &str) -> Option<u64> {
    let caps = re.captures(description)?;
    let amount: f64 = caps[1].parse().ok()?;
    Some((amount * kb_per_unit).round() as u64)
}

pub fn size_gib(description: &str) -> Option<u64> {
    size_in_unit(&SIZE_GIB, 1024.0 * 1024.0, description)
}

pub fn size_mib(description: &str) -> Option<u64> {
    size_in_unit(&SIZE_MIB, 1024.0, description)
}

pub fn size_kib(description: &str) -> Option<u64> {
    size_in_unit(&SIZE_KIB, 1.0, description)
}

fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

fn at(date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    Some(date.and_hms_opt(hour, minute, 0)?.and_utc())
}

/// `MM-DD HH:MM`, in the current year.
pub fn uploaded_month_day_time(description: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let caps = UPLOADED_MONTH_DAY_TIME.captures(description)?;
    let date = NaiveDate::from_ymd_opt(now.year(), number(&caps, 1)?, number(&caps, 2)?)?;
    at(date, number(&caps, 3)?, number(&caps, 4)?)
}

/// `MM-DD YYYY`, at midnight.
pub fn uploaded_month_day_year(description: &str, _now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let caps = UPLOADED_MONTH_DAY_YEAR.captures(description)?;
    let year: i32 = caps[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, number(&caps, 1)?, number(&caps, 2)?)?;
    at(date, 0, 0)
}

/// `Today HH:MM`.
pub fn uploaded_today(description: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let caps = UPLOADED_TODAY.captures(description)?;
    at(now.date_naive(), number(&caps, 1)?, number(&caps, 2)?)
}

/// `Y-day HH:MM`.
pub fn uploaded_yesterday(description: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let caps = UPLOADED_YESTERDAY.captures(description)?;
    let yesterday = (now - Duration::days(1)).date_naive();
    at(yesterday, number(&caps, 1)?, number(&caps, 2)?)
}

/// `<N> mins ago`.
pub fn uploaded_minutes_ago(description: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let caps = UPLOADED_MINUTES_AGO.captures(description)?;
    let minutes: i64 = caps[1].parse().ok()?;
    now.checked_sub_signed(Duration::try_minutes(minutes)?)
}

//! Permissive parsing of CodePlex timestamps.
//!
//! CodePlex shows dates in several culture-dependent shapes (usually in the
//! `title` attribute of a "smart date" element). All of them are read as UTC.
//! Values that match none of the known shapes fall back to
//! [`SENTINEL_TIMESTAMP`] so a bad date never aborts a migration.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

/// Substituted for timestamps that cannot be parsed.
pub const SENTINEL_TIMESTAMP: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

const DATE_TIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%B %d, %Y %I:%M %p",
    "%b %d, %Y %I:%M %p",
    "%a %b %d, %Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%B %d, %Y", "%b %d, %Y"];

/// Parses a timestamp in any of the shapes CodePlex uses.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&value) {
        return Some(parsed.with_timezone(&Utc));
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&value, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(&value, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Parses a timestamp, substituting [`SENTINEL_TIMESTAMP`] on failure.
///
/// `context` names what the timestamp belongs to and is only used for logging.
#[must_use]
pub fn parse_timestamp_or_sentinel(value: &str, context: &str) -> DateTime<Utc> {
    parse_timestamp(value).unwrap_or_else(|| {
        warn!(
            value = %value,
            context,
            sentinel = %SENTINEL_TIMESTAMP,
            "Unparsable timestamp, using sentinel"
        );
        SENTINEL_TIMESTAMP
    })
}

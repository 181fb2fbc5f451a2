//! Timestamp helpers.
//!
//! All database writes are RFC-3339 UTC strings with millisecond precision and a
//! `Z` suffix, so lexical order in SQLite matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC datetime as an RFC-3339 string with millisecond precision.
pub fn to_rfc3339_millis(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// RFC-3339 with any offset -> UTC.
pub fn parse_ts_to_utc(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

//! ISO-8601 handling for `dt-*` property candidates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats tried for naive candidates, most specific first.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 candidate and render it as `YYYY-MM-DD HH:MM:SS`.
///
/// Total: any parse failure yields `None`, and the caller skips the
/// property. Candidates carrying a UTC offset keep their civil time as
/// written; bare dates land on midnight.
pub(crate) fn canonicalize_iso8601(candidate: &str) -> Option<String> {
    let parsed = parse_candidate(candidate.trim())?;
    Some(parsed.format("%Y-%m-%d %H:%M:%S").to_string())
}

fn parse_candidate(candidate: &str) -> Option<NaiveDateTime> {
    if candidate.is_empty() {
        return None;
    }
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(candidate) {
        return Some(with_offset.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(candidate, format) {
            return Some(datetime);
        }
    }
    NaiveDate::parse_from_str(candidate, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

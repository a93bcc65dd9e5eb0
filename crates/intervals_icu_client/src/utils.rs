//! Date helpers for wellness ids and API parameters.

use chrono::NaiveDate;

/// Parse a wellness date.
///
/// Accepts:
/// - YYYY-MM-DD
/// - RFC3339 datetime (date part, in its own offset)
/// - Naive datetime YYYY-MM-DDTHH:MM:SS (date part)
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(ndt.date());
    }
    None
}

/// Every date from `oldest` to `newest`, both included.
pub fn date_range(oldest: NaiveDate, newest: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    oldest.iter_days().take_while(move |d| *d <= newest)
}

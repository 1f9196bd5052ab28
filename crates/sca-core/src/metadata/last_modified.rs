//! `Last-Modified` date parsing.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse an HTTP date. Accepts IMF-fixdate / RFC 2822, the obsolete
/// RFC 850 and asctime forms, and RFC 3339 as a lenient fallback.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    // RFC 850: Sunday, 06-Nov-94 08:49:37 GMT
    // asctime: Sun Nov  6 08:49:37 1994
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %d %H:%M:%S %Y"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&collapsed, fmt).ok())
        .map(|naive| naive.and_utc())
}

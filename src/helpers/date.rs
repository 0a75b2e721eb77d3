//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

/// Formats tried, in order, for dates without an explicit offset
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Parse a front-matter date string.
///
/// Strings carrying an offset (RFC 3339, RFC 2822) keep it; everything else
/// is read as wall-clock time in `tz`. Returns `None` for empty or
/// unrecognised input.
pub fn parse_date(s: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(dt, tz);
        }
        // Try parsing date only
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return localize(d.and_hms_opt(0, 0, 0)?, tz);
        }
    }

    None
}

fn localize(dt: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&dt)
        .earliest()
        .map(|d| d.with_timezone(&Utc))
}

/// RSS `pubDate` format, e.g. `Mon, 01 Jan 2024 00:00:00 GMT`
pub fn rfc822(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Sitemap `lastmod` format (W3C datetime)
pub fn date_xml(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format date in full format (like "January 01, 2024")
pub fn full_date<Z: TimeZone>(date: &DateTime<Z>) -> String
where
    Z::Offset: std::fmt::Display,
{
    date.format("%B %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only() {
        let dt = parse_date("2024-01-15", Tz::UTC).unwrap();
        assert_eq!(date_xml(&dt), "2024-01-15T00:00:00Z");
    }

    #[test]
    fn test_parse_uses_timezone_for_naive_dates() {
        let dt = parse_date("2024-01-15 05:30:00", chrono_tz::Asia::Kolkata).unwrap();
        assert_eq!(date_xml(&dt), "2024-01-15T00:00:00Z");
    }

    #[test]
    fn test_parse_keeps_explicit_offset() {
        let dt = parse_date("2024-01-15T10:00:00+02:00", chrono_tz::Asia::Kolkata).unwrap();
        assert_eq!(date_xml(&dt), "2024-01-15T08:00:00Z");
    }

    #[test]
    fn test_parse_long_form() {
        assert!(parse_date("January 5, 2024", Tz::UTC).is_some());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_date("", Tz::UTC).is_none());
        assert!(parse_date("someday", Tz::UTC).is_none());
        assert!(parse_date("2024-13-40", Tz::UTC).is_none());
    }

    #[test]
    fn test_rfc822() {
        let dt = parse_date("2024-01-01", Tz::UTC).unwrap();
        assert_eq!(rfc822(&dt), "Mon, 01 Jan 2024 00:00:00 GMT");
    }

    #[test]
    fn test_full_date() {
        let dt = parse_date("2024-01-15", Tz::UTC).unwrap();
        assert_eq!(full_date(&dt), "January 15, 2024");
    }
}

//! Freshness deadline for fetched ads.txt files
//!
//! The IAB specification gives an ads.txt file a default validity of seven
//! days. Servers can shorten or extend that with standard HTTP caching headers.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use reqwest::header::{HeaderMap, CACHE_CONTROL, EXPIRES};

/// Default validity window of an ads.txt file
pub const DEFAULT_EXPIRATION_DAYS: i64 = 7;

/// RFC 9111 caps delta-seconds at 2^31
const MAX_AGE_CAP: u64 = 2_147_483_648;

/// Obsolete HTTP-date formats still seen in the wild (RFC 850 and asctime)
const OBSOLETE_HTTP_DATE_FORMATS: &[&str] =
    &["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"];

/// Computes when a successful fetch stops being fresh
///
/// Resolution order:
/// 1. `Cache-Control: max-age=N` → `now + N seconds`
/// 2. `Expires: <HTTP-date>` → that instant
/// 3. `now + 7 days`
///
/// Unparsable headers are ignored.
///
/// # Examples
///
/// ```
/// use adstxt::crawler::resolve_expires;
/// use chrono::{Duration, Utc};
/// use reqwest::header::HeaderMap;
///
/// let now = Utc::now();
/// assert_eq!(resolve_expires(&HeaderMap::new(), now), now + Duration::days(7));
/// ```
pub fn resolve_expires(headers: &HeaderMap, now: DateTime<Utc>) -> DateTime<Utc> {
    if let Some(max_age) = max_age(headers) {
        return now + max_age;
    }

    if let Some(expires) = expires_header(headers) {
        return expires;
    }

    now + Duration::days(DEFAULT_EXPIRATION_DAYS)
}

/// Extracts `max-age` from every Cache-Control header value
fn max_age(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get_all(CACHE_CONTROL)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|directive| directive.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("max-age"))
        .and_then(|(_, seconds)| seconds.trim().trim_matches('"').parse::<u64>().ok())
        .map(|seconds| Duration::seconds(seconds.min(MAX_AGE_CAP) as i64))
}

fn expires_header(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let value = headers.get(EXPIRES)?.to_str().ok()?.trim();
    parse_http_date(value)
}

/// Parses an HTTP-date in IMF-fixdate or one of the obsolete formats
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }

    OBSOLETE_HTTP_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

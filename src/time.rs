//! Time handling
//!
//! Clock abstraction plus HTTP-date parsing and formatting (RFC 7231 §7.1.1.1).
//! Dates are always rendered as IMF-fixdate in GMT, e.g.
//! `Mon, 10 Aug 2015 18:30:12 GMT`.

use crate::error::ArgumentError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::time::SystemTime;

/// IMF-fixdate output format
const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Zone-less formats accepted on input, interpreted as UTC
const NAIVE_FORMATS: &[&str] = &[
    // RFC 850 (obsolete)
    "%A, %d-%b-%y %H:%M:%S GMT",
    // asctime(), whitespace collapsed before matching
    "%a %b %d %H:%M:%S %Y",
    // IMF-fixdate without the zone suffix
    "%a, %d %b %Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Source of the current time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Current unix timestamp in seconds
    fn timestamp(&self) -> i64 {
        self.now().timestamp()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant, for tests and replays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }

    /// Freeze at a unix timestamp
    ///
    /// # Returns
    /// `None` when the timestamp is outside the range chrono can represent
    pub fn at(timestamp: i64) -> Option<Self> {
        DateTime::from_timestamp(timestamp, 0).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Point in time accepted by the header builders
///
/// Built from a unix timestamp, a date string or any `chrono::DateTime`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeValue {
    Timestamp(i64),
    Text(String),
    DateTime(DateTime<Utc>),
}

impl TimeValue {
    /// Normalize to a UTC date-time
    ///
    /// # Returns
    /// `ArgumentError::InvalidDate` for an unreadable string or a timestamp
    /// out of chrono's range
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, ArgumentError> {
        match self {
            Self::Timestamp(ts) => {
                DateTime::from_timestamp(*ts, 0).ok_or_else(|| ArgumentError::InvalidDate {
                    input: ts.to_string(),
                })
            }
            Self::Text(text) => parse_http_date(text).ok_or_else(|| ArgumentError::InvalidDate {
                input: text.clone(),
            }),
            Self::DateTime(dt) => Ok(*dt),
        }
    }
}

impl From<i64> for TimeValue {
    fn from(ts: i64) -> Self {
        Self::Timestamp(ts)
    }
}

impl From<i32> for TimeValue {
    fn from(ts: i32) -> Self {
        Self::Timestamp(i64::from(ts))
    }
}

impl From<&str> for TimeValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for TimeValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for TimeValue {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::DateTime(dt.with_timezone(&Utc))
    }
}

impl From<SystemTime> for TimeValue {
    fn from(time: SystemTime) -> Self {
        Self::DateTime(DateTime::<Utc>::from(time))
    }
}

/// Format a date as IMF-fixdate
///
/// # Returns
/// HTTP-date string, e.g., `Mon, 10 Aug 2015 18:30:12 GMT`
pub fn format_http_date(dt: &DateTime<Utc>) -> String {
    dt.format(IMF_FIXDATE).to_string()
}

/// Parse an HTTP-date or one of the lenient fallbacks
///
/// Accepts IMF-fixdate (and any RFC 2822 date), RFC 850, asctime, RFC 3339,
/// `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD`. Zone-less inputs are taken as UTC.
///
/// # Arguments
/// * `value` - Header value, surrounding whitespace ignored
///
/// # Returns
/// The instant in UTC, or `None` when no format matches
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

    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&collapsed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(&collapsed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Parse an HTTP-date into a unix timestamp
pub fn parse_http_timestamp(value: &str) -> Option<i64> {
    parse_http_date(value).map(|dt| dt.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Mon, 10 Aug 2015 18:30:12 GMT
    const AUG_10: i64 = 1_439_231_412;

    #[test]
    fn test_format_http_date() {
        let dt = DateTime::from_timestamp(AUG_10, 0).unwrap();
        assert_eq!(format_http_date(&dt), "Mon, 10 Aug 2015 18:30:12 GMT");
    }

    #[test]
    fn test_parse_imf_fixdate() {
        assert_eq!(
            parse_http_timestamp("Mon, 10 Aug 2015 18:30:12 GMT"),
            Some(AUG_10)
        );
    }

    #[test]
    fn test_parse_obsolete_formats() {
        assert_eq!(
            parse_http_timestamp("Monday, 10-Aug-15 18:30:12 GMT"),
            Some(AUG_10)
        );
        assert_eq!(parse_http_timestamp("Mon Aug 10 18:30:12 2015"), Some(AUG_10));
    }

    #[test]
    fn test_parse_lenient_formats() {
        assert_eq!(parse_http_timestamp("2015-08-10 18:30:12"), Some(AUG_10));
        assert_eq!(parse_http_timestamp("2015-08-10T20:30:12+02:00"), Some(AUG_10));
        assert_eq!(parse_http_timestamp("Mon, 10 Aug 2015 18:30:12"), Some(AUG_10));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_http_date(""), None);
        assert_eq!(parse_http_date("foo"), None);
        assert_eq!(parse_http_date("Mon, 99 Aug 2015 18:30:12 GMT"), None);
    }

    #[test]
    fn test_time_value_conversions() {
        let expected = DateTime::from_timestamp(AUG_10, 0).unwrap();
        assert_eq!(TimeValue::from(AUG_10).to_datetime(), Ok(expected));
        assert_eq!(
            TimeValue::from("Mon, 10 Aug 2015 18:30:12 GMT").to_datetime(),
            Ok(expected)
        );

        let offset = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
        let local = expected.with_timezone(&offset);
        assert_eq!(TimeValue::from(local).to_datetime(), Ok(expected));
    }

    #[test]
    fn test_time_value_invalid_string() {
        let err = TimeValue::from("foo").to_datetime().unwrap_err();
        assert_eq!(
            err,
            ArgumentError::InvalidDate {
                input: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::at(AUG_10).unwrap();
        assert_eq!(clock.timestamp(), AUG_10);
        assert_eq!(clock.now(), DateTime::from_timestamp(AUG_10, 0).unwrap());
    }

    #[test]
    fn test_fixed_clock_out_of_range() {
        assert_eq!(FixedClock::at(i64::MAX), None);
        assert_eq!(FixedClock::at(i64::MIN), None);
    }
}

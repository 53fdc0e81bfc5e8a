//! Timestamp formatting for log events
//!
//! Events carry a local, offset-aware timestamp rendered with microsecond
//! precision and a numeric offset: `2025-01-08T10:30:45.123456+0200`.

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use std::fmt::Display;

/// strftime pattern for the `timestamp` field
pub const EVENT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f%z";

/// Current local time with its UTC offset
#[must_use]
pub fn now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Render a timestamp in the event format
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use rust_log_stream::core::timestamp::format_timestamp;
///
/// let offset = FixedOffset::east_opt(2 * 3600).unwrap();
/// let datetime = offset.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(format_timestamp(&datetime), "2025-01-08T10:30:45.000000+0200");
/// ```
#[must_use]
pub fn format_timestamp<Tz>(datetime: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    datetime.format(EVENT_TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp produced by [`format_timestamp`]
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value, EVENT_TIMESTAMP_FORMAT).ok()
}

//! Timestamp rendering for the time decoration

use chrono::{DateTime, Local, TimeZone};

/// strftime pattern of the time decoration: `2025/01/08 10:30:45`
pub const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Format `datetime` with [`TIME_FORMAT`].
#[must_use]
pub fn format_timestamp<Tz: TimeZone>(datetime: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    datetime.format(TIME_FORMAT).to_string()
}

/// Current local time rendered with [`TIME_FORMAT`].
#[must_use]
pub fn now() -> String {
    format_timestamp(&Local::now())
}

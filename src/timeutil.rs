use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone, Utc,
};

/// Units accepted by [`add_to_date`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

/// Which component of a date/time entry failed to parse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormatError {
    Date,
    Time,
}

/// Seconds since the Unix epoch, sub-second precision truncated.
pub fn to_unix_time(date: DateTime<Utc>) -> i64 {
    date.timestamp()
}

/// Adds `amount` of `unit` to a date.
///
/// Month and year additions use calendar arithmetic, so adding a month to
/// Jan 31 lands on the last day of February rather than an invalid date.
pub fn add_to_date(date: DateTime<Utc>, amount: u32, unit: TimeUnit) -> DateTime<Utc> {
    match unit {
        TimeUnit::Minute => date + Duration::minutes(amount as i64),
        TimeUnit::Hour => date + Duration::hours(amount as i64),
        TimeUnit::Day => date + Duration::days(amount as i64),
        TimeUnit::Week => date + Duration::weeks(amount as i64),
        TimeUnit::Month => date + Months::new(amount),
        TimeUnit::Year => date + Months::new(amount * 12),
    }
}

/// Parses a `YYYY-MM-DD` date entry. Calendar-invalid dates (month 13,
/// Feb 30) are rejected along with shape mismatches.
pub fn parse_date(date: &str) -> Result<NaiveDate, FormatError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| FormatError::Date)
}

/// Parses an `HH:MM` time entry.
pub fn parse_time(time: &str) -> Result<NaiveTime, FormatError> {
    NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| FormatError::Time)
}

/// Combines a `YYYY-MM-DD` date and `HH:MM` time under a fixed UTC offset
/// into Unix seconds.
pub fn combine(date: &str, time: &str, offset: FixedOffset) -> Result<i64, FormatError> {
    let naive = NaiveDateTime::new(parse_date(date)?, parse_time(time)?);
    match naive.and_local_timezone(offset) {
        LocalResult::Single(dt) => Ok(dt.timestamp()),
        _ => Err(FormatError::Date),
    }
}

/// Renders Unix seconds as `YYYY-MM-DD HH:MM` under the given offset.
/// Inverse of [`combine`] for in-range timestamps.
pub fn format_unix_time(secs: i64, offset: FixedOffset) -> String {
    match Utc.timestamp_opt(secs, 0) {
        LocalResult::Single(dt) => dt.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string(),
        _ => String::new(),
    }
}

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

/// Timestamp of a detection from its acquisition date and `HHMM` time.
///
/// Only the first four characters of `time` are read: two digits of hour,
/// then two digits of minute. Returns `None` when either part is unusable.
pub fn acquisition_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = parse_date(date)?;

    let digits = time.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour = digits[..2].parse().ok()?;
    let minute = digits[2..].parse().ok()?;

    Some(date.and_time(NaiveTime::from_hms_opt(hour, minute, 0)?))
}

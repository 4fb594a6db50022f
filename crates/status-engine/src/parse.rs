//! String parsing for dates, times, instants and day masks.
//!
//! The resolver only consumes typed values. Everything that arrives as text
//! (CLI arguments, JSON documents) goes through these functions first, and
//! every failure is reported rather than guessed around.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::day_mask::{DayMask, WeekStartDay};
use crate::error::{Result, StatusError};
use crate::record::{end_of_day, START_OF_DAY};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| StatusError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Parse a time of day.
///
/// Accepts `H:MM`, `HH:MM` and `HH:MM:SS[.fff]`, plus the keywords `min` /
/// `start of day` and `max` / `end of day`.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let normalized = s.trim().to_lowercase();
    match normalized.as_str() {
        "min" | "start of day" => return Ok(START_OF_DAY),
        "max" | "end of day" => return Ok(end_of_day()),
        _ => {}
    }

    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&normalized, fmt).ok())
        .ok_or_else(|| StatusError::InvalidTime(format!("'{}'", s.trim())))
}

/// Parse a date and time, separated by a space or `T`, seconds optional.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| StatusError::InvalidDatetime(format!("'{}'", s)))
}

/// Parse a query interval, requiring `end` to be strictly after `start`.
///
/// The resolver tolerates an empty interval (it resolves to nothing); this is
/// the stricter check for callers that want one.
pub fn parse_interval(start: &str, end: &str) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let start_dt = parse_datetime(start)?;
    let end_dt = parse_datetime(end)?;
    if end_dt <= start_dt {
        return Err(StatusError::InvalidInterval(format!(
            "end '{}' must be after start '{}'",
            end.trim(),
            start.trim()
        )));
    }
    Ok((start_dt, end_dt))
}

/// Parse a day-of-week mask.
///
/// Accepted forms:
/// - weekday names, comma separated: `"mon,wed,fri"`, `"Tuesday"`; mapped to
///   bits with `week_start`;
/// - a binary literal: `"0b1000000"`;
/// - a decimal integer in `0..=127`.
///
/// An empty mask is accepted; it never applies.
pub fn parse_day_mask(s: &str, week_start: WeekStartDay) -> Result<DayMask> {
    let normalized = s.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(StatusError::InvalidDayMask("empty day mask".to_string()));
    }

    if let Some(binary) = normalized.strip_prefix("0b") {
        let digits: String = binary.chars().filter(|c| *c != '_').collect();
        return u8::from_str_radix(&digits, 2)
            .ok()
            .and_then(checked_mask)
            .ok_or_else(|| StatusError::InvalidDayMask(format!("'{}'", s.trim())));
    }

    if normalized.chars().all(|c| c.is_ascii_digit()) {
        return normalized
            .parse::<u8>()
            .ok()
            .and_then(checked_mask)
            .ok_or_else(|| {
                StatusError::InvalidDayMask(format!("'{}' is outside 0..=127", s.trim()))
            });
    }

    let weekdays = normalized
        .split(',')
        .map(|part| {
            parse_weekday(part.trim()).ok_or_else(|| {
                StatusError::InvalidDayMask(format!("unknown weekday '{}'", part.trim()))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DayMask::from_weekdays(weekdays, week_start))
}

/// Parse a weekday name (full or abbreviated, lowercase).
fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

fn checked_mask(bits: u8) -> Option<DayMask> {
    (bits <= DayMask::ALL.bits()).then(|| DayMask::from_bits(bits))
}

//! Status resolution over a half-open datetime interval.
//!
//! Given a query interval `[start, end)` and a set of [`StatusRecord`]s, the
//! resolver returns the union of every status whose record applies for some
//! portion of the interval on at least one selected weekday.
//!
//! Resolution is a pure function of its inputs. It never fails: a malformed
//! record (empty status, empty day mask, inverted dates or times) contributes
//! nothing and the remaining records are still evaluated.
//!
//! # Per-day test
//!
//! For every calendar day touched by the query whose weekday is in the
//! record's [`DayMask`](crate::DayMask), the record's effective bound is
//! compared with the query clipped to that day:
//!
//! - a record with no dates projects its time-of-day window onto the day;
//! - a record with any date bound uses `[start_date + start_time,
//!   end_date + end_time]`, substituting the query bounds for a missing side.
//!
//! The record applies when `bound_end > range_start && bound_start <= range_end`.
//! The test is asymmetric: a bound that ends exactly where the
//! clipped day begins does not match, a bound that starts exactly where it ends
//! does.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::day_mask::WeekStartDay;
use crate::record::{end_of_day, StatusRecord, START_OF_DAY};
use crate::status::Status;

// ── Options ─────────────────────────────────────────────────────────────────

/// Which calendar days a query interval is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayEnumeration {
    /// Exactly the days whose `[00:00, 24:00)` span intersects the query.
    #[default]
    Exact,
    /// `(end - start)` whole days plus two, counted from the start date.
    ///
    /// Also checks the day after an interval ending at midnight, where a
    /// recurring window starting at `00:00` still matches.
    Padded,
}

/// Options for [`resolve_with_options`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Which weekday is bit 0 of every record's day mask.
    pub week_start: WeekStartDay,
    /// Which days of the query are enumerated.
    pub days: DayEnumeration,
}

// ── Verdicts ────────────────────────────────────────────────────────────────

/// Why a single record does or does not contribute to a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum RecordVerdict {
    /// The record applies; `day` is the first matching day.
    Applies { day: NaiveDate },
    EmptyStatus,
    EmptyDayMask,
    /// `start_date` is after `end_date`.
    InvertedDates,
    /// The record's effective start is at or after the query end.
    StartsAfterQuery,
    /// The record's effective end is at or before the query start.
    EndsBeforeQuery,
    /// Every selected day had an inverted bound (start after end).
    InvertedBound,
    NoMatchingDay,
}

impl RecordVerdict {
    pub fn applies(&self) -> bool {
        matches!(self, Self::Applies { .. })
    }

    /// Stable label for logs.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Applies { .. } => "applies",
            Self::EmptyStatus => "empty_status",
            Self::EmptyDayMask => "empty_day_mask",
            Self::InvertedDates => "inverted_dates",
            Self::StartsAfterQuery => "starts_after_query",
            Self::EndsBeforeQuery => "ends_before_query",
            Self::InvertedBound => "inverted_bound",
            Self::NoMatchingDay => "no_matching_day",
        }
    }
}

// ── resolve ─────────────────────────────────────────────────────────────────

/// Resolve the statuses that apply during `[start, end)`.
///
/// Uses Monday as bit 0 of day masks and exact day enumeration. See
/// [`resolve_with_options`] to change either.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use status_engine::{resolve, Status, StatusRecord};
///
/// let day = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
/// let start = day.and_hms_opt(3, 0, 0).unwrap();
/// let end = day.and_hms_opt(9, 0, 0).unwrap();
///
/// let always = StatusRecord::new(Status::from_bits(0x4));
/// assert_eq!(resolve(start, end, &[always]), Status::from_bits(0x4));
/// assert_eq!(resolve(start, end, &[]), Status::EMPTY);
/// ```
pub fn resolve(start: NaiveDateTime, end: NaiveDateTime, records: &[StatusRecord]) -> Status {
    resolve_with_options(start, end, records, &ResolveOptions::default())
}

/// Resolve the statuses that apply during `[start, end)` with options.
///
/// Returns [`Status::EMPTY`] when `records` is empty or when `end <= start`.
/// The result does not depend on record order.
pub fn resolve_with_options(
    start: NaiveDateTime,
    end: NaiveDateTime,
    records: &[StatusRecord],
    options: &ResolveOptions,
) -> Status {
    if records.is_empty() {
        return Status::EMPTY;
    }

    let days = query_days(start, end, options.days);
    let mut result = Status::EMPTY;

    for record in records {
        let verdict = evaluate_on_days(start, end, record, &days, options.week_start);
        trace!(
            status = %record.status,
            reason = verdict.reason(),
            "record evaluated"
        );
        if verdict.applies() {
            result |= record.status;
        }
    }

    debug!(
        records = records.len(),
        days = days.len(),
        mask = %result,
        "status resolved"
    );
    result
}

/// Evaluate a single record against `[start, end)`.
///
/// `resolve_with_options` is the union of the statuses of every record for
/// which this returns [`RecordVerdict::Applies`].
pub fn evaluate(
    start: NaiveDateTime,
    end: NaiveDateTime,
    record: &StatusRecord,
    options: &ResolveOptions,
) -> RecordVerdict {
    let days = query_days(start, end, options.days);
    evaluate_on_days(start, end, record, &days, options.week_start)
}

/// The calendar days checked for the query `[start, end)`.
///
/// Empty when `end <= start`.
pub fn query_days(
    start: NaiveDateTime,
    end: NaiveDateTime,
    mode: DayEnumeration,
) -> Vec<NaiveDate> {
    if end <= start {
        return Vec::new();
    }

    let first = start.date();
    match mode {
        DayEnumeration::Exact => {
            // An interval ending exactly at midnight does not touch that day.
            let last = if end.time() == NaiveTime::MIN {
                end.date().pred_opt().unwrap_or(first)
            } else {
                end.date()
            };
            first.iter_days().take_while(|d| *d <= last).collect()
        }
        DayEnumeration::Padded => {
            let count = (end - start).num_days() + 2;
            first.iter_days().take(count as usize).collect()
        }
    }
}

// ── Internal helpers ────────────────────────────────────────────────────────

fn evaluate_on_days(
    start: NaiveDateTime,
    end: NaiveDateTime,
    record: &StatusRecord,
    days: &[NaiveDate],
    week_start: WeekStartDay,
) -> RecordVerdict {
    if record.status.is_empty() {
        return RecordVerdict::EmptyStatus;
    }

    let day_mask = record.effective_day_mask();
    if day_mask.is_empty() {
        return RecordVerdict::EmptyDayMask;
    }

    if let (Some(first), Some(last)) = (record.start_date, record.end_date) {
        if first > last {
            return RecordVerdict::InvertedDates;
        }
    }

    let start_time = record.effective_start_time();
    let end_time = record.effective_end_time();
    let record_start = record.start_instant();
    let record_end = record.end_instant();

    // Coarse reject before any per-day work.
    if record_start.is_some_and(|rs| rs >= end) {
        return RecordVerdict::StartsAfterQuery;
    }
    if record_end.is_some_and(|re| re <= start) {
        return RecordVerdict::EndsBeforeQuery;
    }

    let mut saw_inverted = false;
    for &day in days {
        if !day_mask.contains(day.weekday(), week_start) {
            continue;
        }

        let day_start = day.and_time(START_OF_DAY);
        let day_end = day.and_time(end_of_day());

        let (bound_start, bound_end) = match (record_start, record_end) {
            (None, None) => (day.and_time(start_time), day.and_time(end_time)),
            _ => (record_start.unwrap_or(start), record_end.unwrap_or(end)),
        };

        if bound_start > bound_end {
            saw_inverted = true;
            continue;
        }

        let range_start = start.max(day_start);
        let range_end = end.min(day_end);

        if bound_end > range_start && bound_start <= range_end {
            return RecordVerdict::Applies { day };
        }
    }

    if saw_inverted {
        RecordVerdict::InvertedBound
    } else {
        RecordVerdict::NoMatchingDay
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

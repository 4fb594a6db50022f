//! Status records: one applicability rule per record.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::day_mask::DayMask;
use crate::status::Status;

/// Earliest time of day, used when a record has no start time.
pub const START_OF_DAY: NaiveTime = NaiveTime::MIN;

/// Latest representable time of day, used when a record has no end time.
pub fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN)
}

/// A recurring or bounded status rule.
///
/// Every bound is optional:
/// - no `start_date` / `end_date` means unbounded in that direction (dates are
///   inclusive);
/// - no `start_time` means start of day, no `end_time` means end of day;
/// - no `day_mask` means every day of the week.
///
/// A record whose `status` is empty never applies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_mask: Option<DayMask>,
}

impl StatusRecord {
    /// An unbounded record: applies at every instant.
    pub fn new(status: Status) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Bound the record to a single inclusive date range.
    pub fn with_dates(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.with_start_date(start).with_end_date(end)
    }

    pub fn with_start_time(mut self, time: NaiveTime) -> Self {
        self.start_time = Some(time);
        self
    }

    pub fn with_end_time(mut self, time: NaiveTime) -> Self {
        self.end_time = Some(time);
        self
    }

    pub fn with_times(self, start: NaiveTime, end: NaiveTime) -> Self {
        self.with_start_time(start).with_end_time(end)
    }

    pub fn with_day_mask(mut self, mask: DayMask) -> Self {
        self.day_mask = Some(mask);
        self
    }

    pub fn effective_start_time(&self) -> NaiveTime {
        self.start_time.unwrap_or(START_OF_DAY)
    }

    pub fn effective_end_time(&self) -> NaiveTime {
        self.end_time.unwrap_or_else(end_of_day)
    }

    pub fn effective_day_mask(&self) -> DayMask {
        self.day_mask.unwrap_or(DayMask::ALL)
    }

    /// `start_date` combined with the effective start time.
    pub fn start_instant(&self) -> Option<NaiveDateTime> {
        self.start_date
            .map(|d| d.and_time(self.effective_start_time()))
    }

    /// `end_date` combined with the effective end time.
    pub fn end_instant(&self) -> Option<NaiveDateTime> {
        self.end_date.map(|d| d.and_time(self.effective_end_time()))
    }

    /// True when neither date bound is present, so the time-of-day window
    /// recurs on every selected day.
    pub fn is_recurring(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }
}

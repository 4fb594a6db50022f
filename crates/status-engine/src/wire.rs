//! JSON shapes for records and query documents.
//!
//! A query document bundles an interval, an optional catalog of named status
//! flags and a list of records whose fields are still text:
//!
//! ```json
//! {
//!   "start": "2017-01-01 03:00",
//!   "end": "2017-01-03 02:00",
//!   "statuses": { "upholder": 1, "questioner": 2 },
//!   "records": [
//!     { "status": "questioner" },
//!     { "status": 1, "start_date": "2017-01-01", "end_date": "2017-01-01",
//!       "start_time": "02:30", "end_time": "04:00" }
//!   ]
//! }
//! ```
//!
//! Record keys also accept their camelCase spellings (`startDate`,
//! `dayOfWeekBits`, ...).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::day_mask::{DayMask, WeekStartDay};
use crate::error::{Result, StatusError};
use crate::parse::{parse_date, parse_day_mask, parse_interval, parse_time};
use crate::record::StatusRecord;
use crate::resolver::{
    evaluate, resolve_with_options, DayEnumeration, RecordVerdict, ResolveOptions,
};
use crate::status::{Status, StatusCatalog};

/// A record's status: raw bits or a catalog name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusRef {
    Bits(u32),
    Name(String),
}

/// A record's weekday selection: raw bits or text for [`parse_day_mask`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DaysInput {
    Bits(u8),
    Text(String),
}

/// An unparsed status record.
///
/// A missing or `null` status yields a record with [`Status::EMPTY`], which
/// the resolver ignores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusRef>,
    #[serde(default, alias = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, alias = "endDate", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, alias = "startTime", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, alias = "endTime", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(
        default,
        alias = "dayOfWeekBits",
        alias = "day_mask",
        skip_serializing_if = "Option::is_none"
    )]
    pub days: Option<DaysInput>,
}

impl RecordInput {
    /// Parse every field into a typed [`StatusRecord`].
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::UnknownStatus`] for a status name missing from
    /// `catalog`, or the matching parse error for a malformed date, time or
    /// day mask.
    pub fn to_record(
        &self,
        catalog: &StatusCatalog,
        week_start: WeekStartDay,
    ) -> Result<StatusRecord> {
        let status = match &self.status {
            None => Status::EMPTY,
            Some(StatusRef::Bits(bits)) => Status::from_bits(*bits),
            Some(StatusRef::Name(name)) => catalog
                .get(name)
                .ok_or_else(|| StatusError::UnknownStatus(format!("'{}'", name.trim())))?,
        };

        let day_mask = match &self.days {
            None => None,
            Some(DaysInput::Bits(bits)) if *bits <= DayMask::ALL.bits() => {
                Some(DayMask::from_bits(*bits))
            }
            Some(DaysInput::Bits(bits)) => {
                return Err(StatusError::InvalidDayMask(format!(
                    "{bits} is outside 0..=127"
                )));
            }
            Some(DaysInput::Text(text)) => Some(parse_day_mask(text, week_start)?),
        };

        Ok(StatusRecord {
            status,
            start_date: self.start_date.as_deref().map(parse_date).transpose()?,
            end_date: self.end_date.as_deref().map(parse_date).transpose()?,
            start_time: self.start_time.as_deref().map(parse_time).transpose()?,
            end_time: self.end_time.as_deref().map(parse_time).transpose()?,
            day_mask,
        })
    }
}

/// A complete query: interval, options, named statuses and records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryDocument {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub week_start: WeekStartDay,
    #[serde(default)]
    pub days: DayEnumeration,
    #[serde(default)]
    pub statuses: StatusCatalog,
    #[serde(default)]
    pub records: Vec<RecordInput>,
}

/// The outcome of evaluating a [`QueryDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub mask: Status,
    /// Catalog names of the flags set in `mask`.
    pub names: Vec<String>,
    /// Bits set in `mask` that the catalog does not name.
    pub unnamed_bits: Status,
    /// One verdict per record, in document order. Only filled by
    /// [`QueryDocument::explain`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub verdicts: Vec<RecordVerdict>,
}

impl QueryDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| StatusError::InvalidDocument(e.to_string()))
    }

    pub fn options(&self) -> ResolveOptions {
        ResolveOptions {
            week_start: self.week_start,
            days: self.days,
        }
    }

    /// The query interval, which must be present and non-empty.
    pub fn interval(&self) -> Result<(NaiveDateTime, NaiveDateTime)> {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => parse_interval(start, end),
            _ => Err(StatusError::InvalidDocument(
                "both 'start' and 'end' are required".to_string(),
            )),
        }
    }

    /// Parse every record, failing on the first malformed one.
    pub fn records(&self) -> Result<Vec<StatusRecord>> {
        self.records
            .iter()
            .enumerate()
            .map(|(idx, input)| {
                input
                    .to_record(&self.statuses, self.week_start)
                    .map_err(|e| StatusError::InvalidDocument(format!("record #{idx}: {e}")))
            })
            .collect()
    }

    pub fn evaluate(&self) -> Result<Evaluation> {
        let (start, end) = self.interval()?;
        let records = self.records()?;
        let mask = resolve_with_options(start, end, &records, &self.options());
        Ok(self.describe(mask, Vec::new()))
    }

    /// Like [`evaluate`](Self::evaluate), with a verdict for every record.
    pub fn explain(&self) -> Result<Evaluation> {
        let (start, end) = self.interval()?;
        let records = self.records()?;
        let options = self.options();
        let mask = resolve_with_options(start, end, &records, &options);
        let verdicts = records
            .iter()
            .map(|record| evaluate(start, end, record, &options))
            .collect();
        Ok(self.describe(mask, verdicts))
    }

    fn describe(&self, mask: Status, verdicts: Vec<RecordVerdict>) -> Evaluation {
        Evaluation {
            mask,
            names: self
                .statuses
                .names(mask)
                .into_iter()
                .map(str::to_string)
                .collect(),
            unnamed_bits: self.statuses.unnamed_bits(mask),
            verdicts,
        }
    }
}

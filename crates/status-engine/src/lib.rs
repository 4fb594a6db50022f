//! # status-engine
//!
//! Deterministic status resolution over datetime intervals.
//!
//! Given a half-open interval `[start, end)` and a set of status records, each
//! optionally bounded by dates, times of day and a day-of-week mask, the engine
//! computes the bitwise union of every status that applies for some portion of
//! the interval.
//!
//! ## Modules
//!
//! - [`resolver`] — per-day interval intersection, the core of the crate
//! - [`record`] — the [`StatusRecord`] rule type
//! - [`status`] — [`Status`] bitsets and caller-defined [`StatusCatalog`]s
//! - [`day_mask`] — weekday recurrence masks and their bit origin
//! - [`parse`] — text → dates, times, instants, day masks
//! - [`wire`] — JSON query documents
//! - [`error`] — Error types

pub mod day_mask;
pub mod error;
pub mod parse;
pub mod record;
pub mod resolver;
pub mod status;
pub mod wire;

pub use day_mask::{DayMask, WeekStartDay};
pub use error::StatusError;
pub use parse::{parse_date, parse_datetime, parse_day_mask, parse_interval, parse_time};
pub use record::StatusRecord;
pub use resolver::{
    evaluate, query_days, resolve, resolve_with_options, DayEnumeration, RecordVerdict,
    ResolveOptions,
};
pub use status::{Status, StatusCatalog};
pub use wire::{Evaluation, QueryDocument, RecordInput};

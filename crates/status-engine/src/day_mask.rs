//! Day-of-week recurrence masks.

use std::ops::BitOr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Which weekday occupies bit 0 of a [`DayMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStartDay {
    /// ISO 8601 ordering (Monday = bit 0 … Sunday = bit 6).
    #[default]
    Monday,
    /// US/Canada ordering (Sunday = bit 0 … Saturday = bit 6).
    Sunday,
}

/// How many days `weekday` is from the week-start day.
fn days_from_week_start(weekday: Weekday, week_start: WeekStartDay) -> u32 {
    match week_start {
        WeekStartDay::Monday => weekday.num_days_from_monday(),
        WeekStartDay::Sunday => weekday.num_days_from_sunday(),
    }
}

/// A 7-bit set of weekdays.
///
/// Bit *i* selects the *i*-th day counted from a [`WeekStartDay`]. The mask
/// itself does not know its origin; every weekday lookup takes it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayMask(u8);

impl DayMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b111_1111);

    /// Build a mask from raw bits. Bit 7 is discarded.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The single-bit mask for `weekday`.
    pub fn bit_for(weekday: Weekday, week_start: WeekStartDay) -> Self {
        Self(1 << days_from_week_start(weekday, week_start))
    }

    pub fn from_weekdays<I>(weekdays: I, week_start: WeekStartDay) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        weekdays
            .into_iter()
            .fold(Self::NONE, |acc, day| acc | Self::bit_for(day, week_start))
    }

    pub fn contains(self, weekday: Weekday, week_start: WeekStartDay) -> bool {
        self.0 & Self::bit_for(weekday, week_start).0 != 0
    }
}

impl Default for DayMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for DayMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

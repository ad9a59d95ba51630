//! Day-index mapping: calendar dates to integer day offsets and back.
//!
//! Offsets are relative to an origin day in an origin timezone. Offset `0` is
//! the origin itself; days before it map to negative offsets.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

use crate::timezone;

/// Reference point that offset `0` maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayIndex {
    origin: NaiveDate,
    timezone: Tz,
}

impl DayIndex {
    pub fn new(origin: NaiveDate, timezone: Tz) -> Self {
        Self { origin, timezone }
    }

    pub fn origin(&self) -> NaiveDate {
        self.origin
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Offset of a calendar date.
    pub fn offset_of(&self, date: NaiveDate) -> i64 {
        (date - self.origin).num_days()
    }

    /// Offset of the day an instant falls on, in the origin timezone.
    pub fn to_offset(&self, instant: DateTime<Utc>) -> i64 {
        self.offset_of(timezone::local_date(instant, &self.timezone))
    }

    /// Calendar date at `offset`. Saturates at chrono's representable range.
    pub fn to_date(&self, offset: i64) -> NaiveDate {
        Duration::try_days(offset)
            .and_then(|delta| self.origin.checked_add_signed(delta))
            .unwrap_or(if offset < 0 {
                NaiveDate::MIN
            } else {
                NaiveDate::MAX
            })
    }

    /// Start of the day at `offset`, in the origin timezone.
    pub fn to_instant(&self, offset: i64) -> DateTime<Utc> {
        timezone::start_of_day(self.to_date(offset), &self.timezone)
    }

    pub fn weekday(&self, offset: i64) -> Weekday {
        self.to_date(offset).weekday()
    }

    /// Day of week at `offset` as `0..=6`, Sunday first.
    pub fn day_of_week(&self, offset: i64) -> u32 {
        self.weekday(offset).num_days_from_sunday()
    }

    /// Translate an offset in this index into the equivalent offset of `other`.
    pub fn rebase(&self, offset: i64, other: &DayIndex) -> i64 {
        other.offset_of(self.to_date(offset))
    }
}

//! Timezone helpers and the explicit [`TzNormal`] conversion value.
//!
//! The engine works at day granularity, so every timestamp it emits is the
//! local start of a calendar day. Re-expressing a descriptor in another
//! timezone keeps the calendar day and moves the instant: a selection of
//! "March 3rd" stays March 3rd in the output timezone.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, ScheduleError};

/// Parse an IANA timezone name.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| ScheduleError::InvalidTimezone(format!("'{}'", s)))
}

/// The instant at which `date` begins in `tz`.
///
/// A few zones skip midnight on DST transition days; in that case the first
/// valid local time of the day is used.
pub fn start_of_day(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    for hour in 0..=3 {
        let local = midnight + Duration::hours(hour);
        if let Some(dt) = tz.from_local_datetime(&local).earliest() {
            return dt.with_timezone(&Utc);
        }
    }
    midnight.and_utc()
}

/// The calendar day an instant falls on in `tz`.
pub fn local_date(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Converts day-start instants from a source timezone to a target timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TzNormal {
    pub source: Tz,
    pub target: Tz,
}

impl TzNormal {
    pub fn new(source: Tz, target: Option<Tz>) -> Self {
        Self {
            source,
            target: target.unwrap_or(source),
        }
    }

    /// No conversion: source and target are the same zone.
    pub fn identity(tz: Tz) -> Self {
        Self {
            source: tz,
            target: tz,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }

    /// Start of `date` in the target timezone.
    pub fn day_start(&self, date: NaiveDate) -> DateTime<Utc> {
        start_of_day(date, &self.target)
    }

    /// Re-express an instant from the source zone as the start of the same
    /// calendar day in the target zone.
    pub fn normalize(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        if self.is_identity() {
            return instant;
        }
        self.day_start(local_date(instant, &self.source))
    }
}

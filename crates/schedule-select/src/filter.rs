//! Availability filters and hard date bounds.
//!
//! An [`AvailabilityFilter`] is supplied from outside the engine (typically
//! the recurrence descriptor of an existing schedule the user must pick
//! from). It is merged with externally supplied exclusions and the hard
//! [`Bounds`] into a single [`MergedFilter`] expressed in origin offsets.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::day_index::DayIndex;
use crate::schedule_days::{DaySet, WeekMask};
use crate::synthesize::SelectionValue;
use crate::timezone;

/// A day excluded by a filter, either as an offset from the filter's start
/// (or from the origin when the filter has none) or as a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Exclusion {
    Offset(i64),
    Date(NaiveDate),
}

/// Externally supplied availability constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AvailabilityFilter {
    /// Allowed days of the week. `None` allows every day.
    pub day_mask: Option<WeekMask>,
    pub exclusions: Vec<Exclusion>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub timezone: Option<Tz>,
}

impl From<&SelectionValue> for AvailabilityFilter {
    fn from(value: &SelectionValue) -> Self {
        Self {
            day_mask: Some(value.week_mask.clone()),
            exclusions: value
                .excluded_offsets
                .iter()
                .copied()
                .map(Exclusion::Offset)
                .collect(),
            start: Some(timezone::local_date(value.starts_at, &value.timezone)),
            end: Some(timezone::local_date(value.end, &value.timezone)),
            timezone: Some(value.timezone),
        }
    }
}

/// Hard floor and ceiling for any selection, inclusive.
///
/// Deserialization goes through [`Bounds::new`], so an inverted pair is
/// swapped rather than rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBounds")]
pub struct Bounds {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawBounds {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl From<RawBounds> for Bounds {
    fn from(raw: RawBounds) -> Self {
        Bounds::new(raw.start, raw.end)
    }
}

impl Bounds {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(s), Some(e)) if e < s => Self {
                start: Some(e),
                end: Some(s),
            },
            _ => Self { start, end },
        }
    }

    /// Both a floor and a ceiling are configured.
    pub fn complete(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start.zip(self.end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }

    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        let date = self.start.map_or(date, |s| date.max(s));
        self.end.map_or(date, |e| date.min(e))
    }
}

/// Filter, external exclusions and bounds folded together in origin offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedFilter {
    pub days: DaySet,
    pub excluded: BTreeSet<i64>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    /// The filter's own start, used for re-basing emitted descriptors.
    pub start: Option<NaiveDate>,
}

impl Default for MergedFilter {
    fn default() -> Self {
        Self {
            days: DaySet::ALL,
            excluded: BTreeSet::new(),
            min: None,
            max: None,
            start: None,
        }
    }
}

impl MergedFilter {
    /// Merge a filter, extra exclusions and bounds against `index`.
    ///
    /// Offset exclusions count from the filter's start when it has one, else
    /// from the index origin.
    pub fn merge(
        filter: Option<&AvailabilityFilter>,
        external: &[Exclusion],
        bounds: &Bounds,
        index: &DayIndex,
    ) -> Self {
        let anchor = filter
            .and_then(|f| f.start)
            .unwrap_or_else(|| index.origin());
        let resolve = |exclusion: &Exclusion| match *exclusion {
            Exclusion::Date(date) => Some(index.offset_of(date)),
            Exclusion::Offset(offset) => Duration::try_days(offset)
                .and_then(|delta| anchor.checked_add_signed(delta))
                .map(|date| index.offset_of(date)),
        };

        let own = filter.map(|f| f.exclusions.as_slice()).unwrap_or(&[]);
        let excluded = own.iter().chain(external).filter_map(resolve).collect();

        let lower = [filter.and_then(|f| f.start), bounds.start]
            .into_iter()
            .flatten()
            .max();
        let upper = [filter.and_then(|f| f.end), bounds.end]
            .into_iter()
            .flatten()
            .min();

        Self {
            days: filter
                .and_then(|f| f.day_mask.as_ref())
                .map_or(DaySet::ALL, WeekMask::day_set),
            excluded,
            min: lower.map(|d| index.offset_of(d)),
            max: upper.map(|d| index.offset_of(d)),
            start: filter.and_then(|f| f.start),
        }
    }

    pub fn in_bounds(&self, offset: i64) -> bool {
        self.min.is_none_or(|m| offset >= m) && self.max.is_none_or(|m| offset <= m)
    }
}

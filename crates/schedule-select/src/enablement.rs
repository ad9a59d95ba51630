//! Enablement predicates: which day offsets are selected, and which the
//! filter allows.
//!
//! Both predicates are plain values capturing the state they were built
//! from. They are rebuilt on every transition and never outlive it.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::day_index::DayIndex;
use crate::filter::MergedFilter;
use crate::schedule_days::DaySet;

/// `isEnabledDay`: allowed weekday, and inside the input range XOR toggled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnabledDays {
    index: DayIndex,
    allowed: DaySet,
    range: Option<(i64, i64)>,
    toggled: BTreeSet<i64>,
}

impl EnabledDays {
    pub fn build(
        index: DayIndex,
        allowed: DaySet,
        input: Option<(NaiveDate, NaiveDate)>,
        toggled: &BTreeSet<i64>,
    ) -> Self {
        Self {
            index,
            allowed,
            range: input.map(|(start, end)| (index.offset_of(start), index.offset_of(end))),
            toggled: toggled.clone(),
        }
    }

    /// Offsets covered by the input range, inclusive.
    pub fn range(&self) -> Option<(i64, i64)> {
        self.range
    }

    pub fn toggled(&self) -> &BTreeSet<i64> {
        &self.toggled
    }

    pub fn allowed(&self) -> DaySet {
        self.allowed
    }

    pub fn in_range(&self, offset: i64) -> bool {
        self.range
            .is_some_and(|(from, to)| offset >= from && offset <= to)
    }

    pub fn is_allowed_weekday(&self, offset: i64) -> bool {
        self.allowed.contains(self.index.weekday(offset))
    }

    pub fn is_enabled(&self, offset: i64) -> bool {
        self.is_allowed_weekday(offset) && (self.in_range(offset) ^ self.toggled.contains(&offset))
    }
}

/// `isEnabledByFilter`: within bounds, on a filter weekday, not excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPredicate {
    index: DayIndex,
    filter: MergedFilter,
}

impl FilterPredicate {
    pub fn build(index: DayIndex, filter: &MergedFilter) -> Self {
        Self {
            index,
            filter: filter.clone(),
        }
    }

    pub fn filter(&self) -> &MergedFilter {
        &self.filter
    }

    pub fn is_enabled(&self, offset: i64) -> bool {
        self.filter.in_bounds(offset)
            && self.filter.days.contains(self.index.weekday(offset))
            && !self.filter.excluded.contains(&offset)
    }
}

/// Both predicates together; a day is selected when both agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enablement {
    pub day: EnabledDays,
    pub filter: FilterPredicate,
}

impl Enablement {
    pub fn is_selected(&self, offset: i64) -> bool {
        self.filter.is_enabled(offset) && self.day.is_enabled(offset)
    }
}

//! Selection synthesis: fold the selected days into one recurrence descriptor.
//!
//! The descriptor is a start/end span, a week mask and the day offsets inside
//! the span that are not selected. Offsets in the descriptor count from its
//! own `starts_at`, not from the engine's origin.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::day_index::DayIndex;
use crate::enablement::Enablement;
use crate::range::resolve_range;
use crate::schedule_days::WeekMask;
use crate::timezone::{self, TzNormal};

/// The canonical, externally consumed selection descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionValue {
    /// Start of the first day of the span, in `timezone`.
    pub starts_at: DateTime<Utc>,
    /// Start of the last day of the span, in `timezone`.
    pub end: DateTime<Utc>,
    pub week_mask: WeekMask,
    /// Offsets from `starts_at` inside the span that are not selected.
    pub excluded_offsets: Vec<i64>,
    pub timezone: Tz,
}

impl SelectionValue {
    pub fn start_date(&self) -> NaiveDate {
        timezone::local_date(self.starts_at, &self.timezone)
    }

    pub fn end_date(&self) -> NaiveDate {
        timezone::local_date(self.end, &self.timezone)
    }

    /// Number of calendar days covered by the span.
    pub fn span_days(&self) -> i64 {
        (self.end_date() - self.start_date()).num_days() + 1
    }

    /// Whether `date` is one of the selected days this descriptor stands for.
    pub fn includes(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;

        let offset = (date - self.start_date()).num_days();
        offset >= 0
            && date <= self.end_date()
            && self.week_mask.day_set().contains(date.weekday())
            && !self.excluded_offsets.contains(&offset)
    }

    /// Every selected calendar day, in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        use chrono::Datelike;

        let start = self.start_date();
        let days = self.week_mask.day_set();
        let excluded: BTreeSet<i64> = self.excluded_offsets.iter().copied().collect();
        (0..self.span_days())
            .filter(|offset| !excluded.contains(offset))
            .filter_map(|offset| start.checked_add_signed(Duration::days(offset)))
            .filter(|date| days.contains(date.weekday()))
            .collect()
    }
}

/// Everything the synthesizer reads from a selection state.
#[derive(Debug, Clone)]
pub struct SynthesisInput<'a> {
    pub enablement: &'a Enablement,
    pub index: DayIndex,
    pub week_mask: WeekMask,
    /// Re-base the descriptor to the filter's start when it has one.
    pub relative_to_filter: bool,
    pub normal: TzNormal,
}

/// Build the descriptor, or `None` when no day is selected.
pub fn synthesize(input: &SynthesisInput<'_>) -> Option<SelectionValue> {
    let enablement = input.enablement;
    let index = &input.index;
    let range = resolve_range(enablement)?;

    let excluded: Vec<i64> = range
        .offsets()
        .filter(|&offset| !enablement.is_selected(offset))
        .collect();

    let filter_anchor = input
        .relative_to_filter
        .then_some(enablement.filter.filter().start)
        .flatten()
        .map(|start| (start, index.offset_of(start)))
        .filter(|&(_, anchor)| anchor <= range.from);

    let (start_day, excluded_offsets) = match filter_anchor {
        Some((start, anchor)) => {
            let shift = range.from - anchor;
            let gap = 0..shift;
            let rebased = excluded.iter().map(|&offset| offset - anchor);
            (start, gap.chain(rebased).collect::<Vec<_>>())
        }
        None => {
            let rebased = excluded.iter().map(|&offset| offset - range.from);
            (index.to_date(range.from), rebased.collect())
        }
    };

    let end_day = index.to_date(range.to).max(start_day);

    debug!(
        from = range.from,
        to = range.to,
        excluded = excluded_offsets.len(),
        rebased = filter_anchor.is_some(),
        "synthesized selection"
    );

    Some(SelectionValue {
        starts_at: input.normal.day_start(start_day),
        end: input.normal.day_start(end_day),
        week_mask: input.week_mask.clone(),
        excluded_offsets,
        timezone: input.normal.target,
    })
}

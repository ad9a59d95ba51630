//! Range resolution: the tightest offset span that holds every selected day.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::enablement::Enablement;

/// Inclusive span of day offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub from: i64,
    pub to: i64,
}

impl SelectionRange {
    pub fn len(&self) -> u64 {
        self.to.abs_diff(self.from).saturating_add(1)
    }

    pub fn contains(&self, offset: i64) -> bool {
        offset >= self.from && offset <= self.to
    }

    pub fn offsets(&self) -> impl DoubleEndedIterator<Item = i64> {
        self.from..=self.to
    }
}

/// Raw scan window: the input range unioned with the toggles on allowed
/// weekdays, clipped to the filter's bounds.
pub fn scan_window(enablement: &Enablement) -> Option<SelectionRange> {
    let day = &enablement.day;
    let mut toggled = day
        .toggled()
        .iter()
        .copied()
        .filter(|&offset| day.is_allowed_weekday(offset));
    let first_toggle = toggled.next();
    let last_toggle = toggled.next_back().or(first_toggle);

    let lows = [day.range().map(|(from, _)| from), first_toggle];
    let highs = [day.range().map(|(_, to)| to), last_toggle];
    let mut from = lows.into_iter().flatten().min()?;
    let mut to = highs.into_iter().flatten().max()?;

    let filter = enablement.filter.filter();
    if let Some(min) = filter.min {
        from = from.max(min);
    }
    if let Some(max) = filter.max {
        to = to.min(max);
    }
    (from <= to).then_some(SelectionRange { from, to })
}

/// Find the first and last selected offsets.
///
/// Returns `None` when nothing is selected: no range and no toggles, or every
/// day inside the raw window is excluded.
pub fn resolve_range(enablement: &Enablement) -> Option<SelectionRange> {
    let window = scan_window(enablement)?;
    trace!(from = window.from, to = window.to, "scanning selection window");

    let from = window.offsets().find(|&o| enablement.is_selected(o))?;
    let to = window.offsets().rev().find(|&o| enablement.is_selected(o))?;
    (from <= to).then_some(SelectionRange { from, to })
}

//! Named transitions as data, and the reducer that dispatches them.
//!
//! Adapters (the WASM session, the CLI replay) receive actions as JSON and
//! feed them through [`reduce`]. The wire shape is internally tagged:
//!
//! ```json
//! {"type": "range-change", "start": "2026-03-02", "end": "2026-03-05"}
//! {"type": "toggle", "op": "toggle", "offsets": [2, 3]}
//! {"type": "schedule-days-change", "days": ["WEEKDAY"]}
//! ```

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::filter::{AvailabilityFilter, Bounds, Exclusion};
use crate::schedule_days::ScheduleDays;
use crate::state::{SelectionState, ToggleOp, ToggleOptions};
use crate::synthesize::SelectionValue;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SelectionAction {
    RangeChange {
        #[serde(default)]
        start: Option<NaiveDate>,
        #[serde(default)]
        end: Option<NaiveDate>,
    },
    Toggle {
        op: ToggleOp,
        offsets: Vec<i64>,
        #[serde(default)]
        options: ToggleOptions,
    },
    ToggleDates {
        op: ToggleOp,
        dates: Vec<NaiveDate>,
        #[serde(default)]
        options: ToggleOptions,
    },
    SelectAll,
    SelectNone,
    ScheduleDaysChange {
        #[serde(default)]
        days: Option<ScheduleDays>,
    },
    DefaultScheduleDaysChange {
        days: ScheduleDays,
    },
    FilterChange {
        #[serde(default)]
        filter: Option<AvailabilityFilter>,
    },
    ExclusionsChange {
        #[serde(default)]
        exclusions: Vec<Exclusion>,
    },
    BoundsChange {
        #[serde(default)]
        bounds: Bounds,
    },
    OutputTimezoneChange {
        #[serde(default)]
        timezone: Option<Tz>,
    },
    DescriptorSet {
        #[serde(default)]
        value: Option<SelectionValue>,
    },
}

impl SelectionAction {
    pub fn name(&self) -> &'static str {
        match self {
            SelectionAction::RangeChange { .. } => "range-change",
            SelectionAction::Toggle { .. } => "toggle",
            SelectionAction::ToggleDates { .. } => "toggle-dates",
            SelectionAction::SelectAll => "select-all",
            SelectionAction::SelectNone => "select-none",
            SelectionAction::ScheduleDaysChange { .. } => "schedule-days-change",
            SelectionAction::DefaultScheduleDaysChange { .. } => "default-schedule-days-change",
            SelectionAction::FilterChange { .. } => "filter-change",
            SelectionAction::ExclusionsChange { .. } => "exclusions-change",
            SelectionAction::BoundsChange { .. } => "bounds-change",
            SelectionAction::OutputTimezoneChange { .. } => "output-timezone-change",
            SelectionAction::DescriptorSet { .. } => "descriptor-set",
        }
    }
}

/// Apply one action and return the next state.
pub fn reduce(state: &SelectionState, action: &SelectionAction) -> SelectionState {
    let next = match action {
        SelectionAction::RangeChange { start, end } => state.with_range(*start, *end),
        SelectionAction::Toggle {
            op,
            offsets,
            options,
        } => state.with_toggles(*op, offsets.iter().copied(), *options),
        SelectionAction::ToggleDates { op, dates, options } => {
            state.with_toggled_dates(*op, dates.iter().copied(), *options)
        }
        SelectionAction::SelectAll => state.select_all(),
        SelectionAction::SelectNone => state.select_none(),
        SelectionAction::ScheduleDaysChange { days } => state.with_schedule_days(days.clone()),
        SelectionAction::DefaultScheduleDaysChange { days } => {
            state.with_default_schedule_days(days.clone())
        }
        SelectionAction::FilterChange { filter } => state.with_filter(filter.clone()),
        SelectionAction::ExclusionsChange { exclusions } => {
            state.with_exclusions(exclusions.clone())
        }
        SelectionAction::BoundsChange { bounds } => state.with_bounds(*bounds),
        SelectionAction::OutputTimezoneChange { timezone } => {
            state.with_output_timezone(*timezone)
        }
        SelectionAction::DescriptorSet { value } => state.with_value(value.clone()),
    };
    debug!(
        action = action.name(),
        selected = next.has_selection(),
        toggled = next.toggled_offsets().len(),
        "applied selection action"
    );
    next
}

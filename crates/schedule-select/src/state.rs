//! Selection state and its transitions.
//!
//! A [`SelectionState`] is an immutable value. Every transition borrows the
//! current state and returns a brand-new one with the enablement predicates
//! and the [`SelectionValue`] already re-derived, so callers never observe a
//! half-updated state.
//!
//! The user's selection is stored as a coarse input range plus a set of
//! toggled offsets. Toggles are exceptions to the range, not the selection
//! itself: a day is selected when its weekday is allowed and it is either in
//! the range or toggled, but not both.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{InitialSelection, SelectionConfig};
use crate::day_index::DayIndex;
use crate::enablement::{EnabledDays, Enablement, FilterPredicate};
use crate::filter::{AvailabilityFilter, Bounds, Exclusion, MergedFilter};
use crate::schedule_days::{DaySet, ScheduleDays, WeekMask};
use crate::synthesize::{synthesize, SelectionValue, SynthesisInput};
use crate::timezone::TzNormal;

/// How a batch of offsets is applied to the toggled set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOp {
    /// Symmetric difference.
    Toggle,
    /// Union into the toggled set.
    Add,
    /// Difference from the toggled set.
    Remove,
    /// Replace the toggled set.
    Set,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToggleOptions {
    /// Swap `Add`/`Remove`, and read a `Set` batch as the days to keep.
    pub invert_set_behavior: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    index: DayIndex,
    input: Option<(NaiveDate, NaiveDate)>,
    toggled: BTreeSet<i64>,
    default_schedule_days: ScheduleDays,
    schedule_days_override: Option<ScheduleDays>,
    filter: Option<AvailabilityFilter>,
    external_exclusions: Vec<Exclusion>,
    bounds: Bounds,
    merged_filter: MergedFilter,
    output_timezone: Option<Tz>,
    compute_relative_to_filter: bool,
    initial_selection: Option<InitialSelection>,
    enablement: Enablement,
    current: Option<SelectionValue>,
}

impl SelectionState {
    /// Create an empty state from a config, then apply its initial selection.
    pub fn new(config: SelectionConfig) -> Self {
        let bounds = Bounds::new(config.bounds.start, config.bounds.end);
        let index = DayIndex::new(config.resolved_origin(), config.timezone);
        let default_schedule_days = config.default_schedule_days.canonical();
        let merged_filter = MergedFilter::merge(None, &[], &bounds, &index);
        let enablement = Enablement {
            day: EnabledDays::build(
                index,
                default_schedule_days.day_set(),
                None,
                &BTreeSet::new(),
            ),
            filter: FilterPredicate::build(index, &merged_filter),
        };
        let mut state = Self {
            index,
            input: None,
            toggled: BTreeSet::new(),
            default_schedule_days,
            schedule_days_override: None,
            filter: None,
            external_exclusions: Vec::new(),
            bounds,
            merged_filter,
            output_timezone: config.output_timezone,
            compute_relative_to_filter: config.compute_relative_to_filter,
            initial_selection: config.initial_selection,
            enablement,
            current: None,
        };
        state.apply_initial_selection();
        state.finalize()
    }

    // ── Observables ─────────────────────────────────────────────────────────

    pub fn index(&self) -> &DayIndex {
        &self.index
    }

    pub fn origin(&self) -> NaiveDate {
        self.index.origin()
    }

    pub fn origin_timezone(&self) -> Tz {
        self.index.timezone()
    }

    pub fn input_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.input
    }

    pub fn toggled_offsets(&self) -> &BTreeSet<i64> {
        &self.toggled
    }

    pub fn default_schedule_days(&self) -> &ScheduleDays {
        &self.default_schedule_days
    }

    pub fn schedule_days_override(&self) -> Option<&ScheduleDays> {
        self.schedule_days_override.as_ref()
    }

    /// The override layer if present, else the default layer.
    pub fn effective_schedule_days(&self) -> &ScheduleDays {
        self.schedule_days_override
            .as_ref()
            .unwrap_or(&self.default_schedule_days)
    }

    pub fn allowed_days_of_week(&self) -> DaySet {
        self.effective_schedule_days().day_set()
    }

    pub fn filter(&self) -> Option<&AvailabilityFilter> {
        self.filter.as_ref()
    }

    pub fn merged_filter(&self) -> &MergedFilter {
        &self.merged_filter
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn output_timezone(&self) -> Option<Tz> {
        self.output_timezone
    }

    pub fn compute_relative_to_filter(&self) -> bool {
        self.compute_relative_to_filter
    }

    pub fn enablement(&self) -> &Enablement {
        &self.enablement
    }

    pub fn is_enabled_day(&self, offset: i64) -> bool {
        self.enablement.day.is_enabled(offset)
    }

    pub fn is_enabled_by_filter(&self, offset: i64) -> bool {
        self.enablement.filter.is_enabled(offset)
    }

    /// Whether a calendar cell for `date` renders as selected.
    pub fn is_enabled_date(&self, date: NaiveDate) -> bool {
        self.enablement.is_selected(self.index.offset_of(date))
    }

    pub fn selection_value(&self) -> Option<&SelectionValue> {
        self.current.as_ref()
    }

    /// Run the synthesizer again over this state's predicates.
    pub fn synthesize(&self) -> Option<SelectionValue> {
        synthesize(&self.synthesis_input())
    }

    pub fn has_selection(&self) -> bool {
        self.current.is_some()
    }

    /// Origin offsets of every selected day.
    pub fn selected_offsets(&self) -> Vec<i64> {
        crate::range::resolve_range(&self.enablement)
            .map(|range| {
                range
                    .offsets()
                    .filter(|&offset| self.enablement.is_selected(offset))
                    .collect()
            })
            .unwrap_or_default()
    }

    // ── Range ───────────────────────────────────────────────────────────────

    /// range-change: set the coarse range by calendar day.
    ///
    /// A single missing end makes a one-day range; both missing clears the
    /// range. Out-of-bounds or unchanged ranges leave the state as it is.
    /// Toggles outside the new range are dropped.
    pub fn with_range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let Some(range) = normalize_range(start, end) else {
            if self.input.is_none() && self.toggled.is_empty() {
                return self.clone();
            }
            let mut next = self.clone();
            next.input = None;
            next.toggled.clear();
            return next.finalize();
        };

        if !self.bounds.contains(range.0) || !self.bounds.contains(range.1) {
            warn!(start = %range.0, end = %range.1, "range outside bounds ignored");
            return self.clone();
        }
        if self.input == Some(range) {
            return self.clone();
        }

        let mut next = self.clone();
        next.apply_range(range);
        next.finalize()
    }

    /// range-change addressed by instants, truncated to days in the origin
    /// timezone.
    pub fn with_range_instants(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.with_range(
            Some(self.index.to_date(self.index.to_offset(start))),
            Some(self.index.to_date(self.index.to_offset(end))),
        )
    }

    // ── Toggles ─────────────────────────────────────────────────────────────

    /// toggle / add / remove / set on origin offsets.
    pub fn with_toggles<I>(&self, op: ToggleOp, offsets: I, options: ToggleOptions) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let batch: BTreeSet<i64> = offsets.into_iter().collect();
        let mut next = self.clone();
        match (op, options.invert_set_behavior) {
            (ToggleOp::Toggle, _) => {
                next.toggled = next.toggled.symmetric_difference(&batch).copied().collect();
            }
            (ToggleOp::Add, false) | (ToggleOp::Remove, true) => next.toggled.extend(batch),
            (ToggleOp::Remove, false) | (ToggleOp::Add, true) => {
                next.toggled.retain(|offset| !batch.contains(offset));
            }
            (ToggleOp::Set, false) => next.toggled = batch,
            (ToggleOp::Set, true) => next.apply_kept(&batch),
        }
        next.finalize()
    }

    /// The toggle family addressed by calendar dates.
    pub fn with_toggled_dates<I>(&self, op: ToggleOp, dates: I, options: ToggleOptions) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let index = self.index;
        self.with_toggles(op, dates.into_iter().map(|d| index.offset_of(d)), options)
    }

    /// The toggle family driven by a per-day decision function: `op` is
    /// applied to every day of `window` (inclusive, either order) for which
    /// `decide` returns `true`.
    pub fn with_toggles_where<F>(
        &self,
        op: ToggleOp,
        window: (NaiveDate, NaiveDate),
        decide: F,
        options: ToggleOptions,
    ) -> Self
    where
        F: Fn(NaiveDate) -> bool,
    {
        let (first, last) = if window.1 < window.0 {
            (window.1, window.0)
        } else {
            window
        };
        let dates = first
            .iter_days()
            .take_while(|&date| date <= last)
            .filter(|&date| decide(date));
        self.with_toggled_dates(op, dates, options)
    }

    pub fn toggle(&self, offset: i64) -> Self {
        self.with_toggles(ToggleOp::Toggle, [offset], ToggleOptions::default())
    }

    /// Select the whole bounded window, or clear when it is open-ended.
    pub fn select_all(&self) -> Self {
        let mut next = self.clone();
        next.apply_select_all();
        next.finalize()
    }

    pub fn select_none(&self) -> Self {
        let mut next = self.clone();
        next.input = None;
        next.toggled.clear();
        next.finalize()
    }

    // ── Schedule days ───────────────────────────────────────────────────────

    /// schedule-days-change: replace (or drop, with `None`) the override layer.
    pub fn with_schedule_days(&self, days: Option<ScheduleDays>) -> Self {
        let days = days.map(|d| d.canonical());
        if days == self.schedule_days_override {
            return self.clone();
        }
        let mut next = self.clone();
        next.schedule_days_override = days;
        next.finalize()
    }

    /// default-schedule-days-change: replace the default layer.
    pub fn with_default_schedule_days(&self, days: ScheduleDays) -> Self {
        let days = days.canonical();
        if days == self.default_schedule_days {
            return self.clone();
        }
        let mut next = self.clone();
        next.default_schedule_days = days;
        next.finalize()
    }

    // ── Filter ──────────────────────────────────────────────────────────────

    /// filter-change: replace the availability filter.
    pub fn with_filter(&self, filter: Option<AvailabilityFilter>) -> Self {
        let mut next = self.clone();
        next.filter = filter;
        next.refilter(self.has_selection())
    }

    /// exclusions-change: replace the externally supplied exclusions.
    pub fn with_exclusions(&self, exclusions: Vec<Exclusion>) -> Self {
        let mut next = self.clone();
        next.external_exclusions = exclusions;
        next.refilter(self.has_selection())
    }

    /// bounds-change: replace the hard floor and ceiling. Inverted bounds
    /// are swapped.
    pub fn with_bounds(&self, bounds: Bounds) -> Self {
        let mut next = self.clone();
        next.bounds = Bounds::new(bounds.start, bounds.end);
        next.refilter(self.has_selection())
    }

    // ── Output ──────────────────────────────────────────────────────────────

    /// output-timezone-change: emit descriptors in `timezone` (`None` for the
    /// origin timezone). The selected calendar days do not move.
    pub fn with_output_timezone(&self, timezone: Option<Tz>) -> Self {
        let mut next = self.clone();
        next.output_timezone = timezone;
        match &self.current {
            Some(value) => {
                let target = timezone.unwrap_or(self.index.timezone());
                let normal = TzNormal::new(value.timezone, Some(target));
                let moved = SelectionValue {
                    starts_at: normal.normalize(value.starts_at),
                    end: normal.normalize(value.end),
                    timezone: target,
                    ..value.clone()
                };
                next.with_value(Some(moved))
            }
            None => next.finalize(),
        }
    }

    /// descriptor-set: restore a selection from a descriptor.
    ///
    /// The range becomes the descriptor's span, its exclusions become toggles
    /// and its week mask becomes the schedule-day override (dropped when it
    /// matches the default layer). `None` clears the selection.
    pub fn with_value(&self, value: Option<SelectionValue>) -> Self {
        let Some(value) = value else {
            return self.select_none();
        };
        if self.current.as_ref() == Some(&value) {
            return self.clone();
        }

        let mut next = self.clone();
        let days = value.week_mask.decode();
        next.schedule_days_override = (days != next.default_schedule_days).then_some(days);

        let start = value.start_date();
        let end = value.end_date().max(start);
        let (from, to) = (next.index.offset_of(start), next.index.offset_of(end));
        next.input = Some((start, end));
        next.toggled = value
            .excluded_offsets
            .iter()
            .map(|&e| from + e)
            .filter(|&offset| offset >= from && offset <= to)
            .collect();
        next.finalize()
    }

    // ── Internals ───────────────────────────────────────────────────────────

    fn apply_range(&mut self, (start, end): (NaiveDate, NaiveDate)) {
        let (from, to) = (self.index.offset_of(start), self.index.offset_of(end));
        self.input = Some((start, end));
        self.toggled.retain(|&offset| offset >= from && offset <= to);
    }

    /// Range-select the window spanned by the merged filter bounds, or by
    /// `kept` when the window is open, toggling off everything not kept.
    fn apply_kept(&mut self, kept: &BTreeSet<i64>) {
        let allowed = self.allowed_days_of_week();
        let index = self.index;
        let kept: BTreeSet<i64> = kept
            .iter()
            .copied()
            .filter(|&offset| allowed.contains(index.weekday(offset)))
            .collect();
        let (Some(&first), Some(&last)) = (kept.first(), kept.last()) else {
            self.input = None;
            self.toggled.clear();
            return;
        };

        let from = self.merged_filter.min.map_or(first, |min| min.min(first));
        let to = self.merged_filter.max.map_or(last, |max| max.max(last));
        self.input = Some((index.to_date(from), index.to_date(to)));
        self.toggled = (from..=to)
            .filter(|offset| !kept.contains(offset))
            .collect();
    }

    fn apply_select_all(&mut self) {
        self.toggled.clear();
        self.input = match (self.merged_filter.min, self.merged_filter.max) {
            (Some(min), Some(max)) if min <= max => {
                Some((self.index.to_date(min), self.index.to_date(max)))
            }
            _ => None,
        };
    }

    fn apply_initial_selection(&mut self) {
        match self.initial_selection {
            Some(InitialSelection::All) => self.apply_select_all(),
            Some(InitialSelection::None) => {
                self.input = None;
                self.toggled.clear();
            }
            None => {}
        }
    }

    /// Re-merge the filter after any of its inputs changed, moving the
    /// origin to the filter's own start when it has one.
    fn refilter(mut self, had_selection: bool) -> Self {
        if let Some(start) = self.filter.as_ref().and_then(|f| f.start) {
            let timezone = self
                .filter
                .as_ref()
                .and_then(|f| f.timezone)
                .unwrap_or(self.index.timezone());
            let index = DayIndex::new(start, timezone);
            if index != self.index {
                debug!(origin = %start, timezone = %timezone, "origin moved to filter start");
                let old = self.index;
                self.toggled = self
                    .toggled
                    .iter()
                    .map(|&offset| old.rebase(offset, &index))
                    .collect();
                self.index = index;
            }
        }
        self.merged_filter = MergedFilter::merge(
            self.filter.as_ref(),
            &self.external_exclusions,
            &self.bounds,
            &self.index,
        );

        if !had_selection {
            self.apply_initial_selection();
        }
        self.reconcile_range();
        self.finalize()
    }

    /// Clamp the input range into the bounds and drop toggles that no longer
    /// fit. A range entirely outside the bounds is cleared.
    fn reconcile_range(&mut self) {
        match self.input {
            Some((start, end)) => {
                let overlaps = self.bounds.end.is_none_or(|e| start <= e)
                    && self.bounds.start.is_none_or(|s| end >= s);
                if overlaps {
                    self.apply_range((self.bounds.clamp(start), self.bounds.clamp(end)));
                } else {
                    self.input = None;
                    self.toggled.clear();
                }
            }
            None => {
                let index = self.index;
                let bounds = self.bounds;
                self.toggled.retain(|&offset| bounds.contains(index.to_date(offset)));
            }
        }
    }

    fn build_enablement(&self) -> Enablement {
        Enablement {
            day: EnabledDays::build(
                self.index,
                self.allowed_days_of_week(),
                self.input,
                &self.toggled,
            ),
            filter: FilterPredicate::build(self.index, &self.merged_filter),
        }
    }

    fn synthesis_input(&self) -> SynthesisInput<'_> {
        SynthesisInput {
            enablement: &self.enablement,
            index: self.index,
            week_mask: WeekMask::encode(self.effective_schedule_days()),
            relative_to_filter: self.compute_relative_to_filter,
            normal: TzNormal::new(self.index.timezone(), self.output_timezone),
        }
    }

    /// Purge toggles on disallowed weekdays, rebuild the predicates and the
    /// descriptor. An empty result resets the range and toggles.
    fn finalize(mut self) -> Self {
        let allowed = self.allowed_days_of_week();
        let index = self.index;
        self.toggled
            .retain(|&offset| allowed.contains(index.weekday(offset)));

        self.enablement = self.build_enablement();
        let current = synthesize(&self.synthesis_input());
        self.current = current;

        if self.current.is_none() && (self.input.is_some() || !self.toggled.is_empty()) {
            debug!("selection fully excluded, resetting range and toggles");
            self.input = None;
            self.toggled.clear();
            self.enablement = self.build_enablement();
        }
        self
    }
}

/// Order a possibly half-open range; `None` when both ends are missing.
fn normalize_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<(NaiveDate, NaiveDate)> {
    let (start, end) = match (start, end) {
        (Some(s), Some(e)) => (s, e),
        (Some(d), None) | (None, Some(d)) => (d, d),
        (None, None) => return None,
    };
    if end < start {
        warn!(start = %start, end = %end, "range end before start, swapping");
        Some((end, start))
    } else {
        Some((start, end))
    }
}

//! Range resolution through the public state API.
//!
//! Offsets are relative to Monday 2026-03-02 in UTC throughout.

use chrono::{Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;
use schedule_select::{
    resolve_range, ScheduleDay, ScheduleDays, SelectionConfig, SelectionRange, SelectionState,
    ToggleOp, ToggleOptions,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn empty_state() -> SelectionState {
    SelectionState::new(SelectionConfig::default().with_origin(monday(), Tz::UTC))
}

fn range_state(from: i64, to: i64) -> SelectionState {
    let state = empty_state();
    let index = *state.index();
    state.with_range(Some(index.to_date(from)), Some(index.to_date(to)))
}

fn add(state: &SelectionState, offsets: &[i64]) -> SelectionState {
    state.with_toggles(ToggleOp::Add, offsets.iter().copied(), ToggleOptions::default())
}

// ── Containment ─────────────────────────────────────────────────────────────

#[test]
fn four_day_range_resolves_to_itself() {
    let state = range_state(0, 3);
    assert_eq!(
        resolve_range(state.enablement()),
        Some(SelectionRange { from: 0, to: 3 })
    );
}

#[test]
fn range_away_from_origin_keeps_its_offsets() {
    let state = range_state(10, 13);
    assert_eq!(
        resolve_range(state.enablement()),
        Some(SelectionRange { from: 10, to: 13 })
    );
    let value = state.selection_value().unwrap();
    assert_eq!(value.start_date(), NaiveDate::from_ymd_opt(2026, 3, 12).unwrap());
    assert_eq!(value.span_days(), 4);
}

#[test]
fn no_range_and_no_toggles_is_empty() {
    let state = empty_state();
    assert_eq!(resolve_range(state.enablement()), None);
    assert!(!state.has_selection());
}

// ── Exclusion ───────────────────────────────────────────────────────────────

#[test]
fn fully_excluded_range_is_empty() {
    let state = add(&range_state(0, 3), &[0, 1, 2, 3]);
    assert_eq!(resolve_range(state.enablement()), None);
    assert!(state.selection_value().is_none());
    // The empty selection resets range and toggles.
    assert_eq!(state.input_range(), None);
    assert!(state.toggled_offsets().is_empty());
}

#[test]
fn toggle_outside_range_extends_then_range_is_cleared() {
    let state = add(&range_state(0, 2), &[3]);
    assert_eq!(
        resolve_range(state.enablement()),
        Some(SelectionRange { from: 0, to: 3 })
    );

    let state = add(&state, &[0, 1, 2]);
    assert_eq!(
        resolve_range(state.enablement()),
        Some(SelectionRange { from: 3, to: 3 })
    );
    let value = state.selection_value().unwrap();
    assert_eq!(value.start_date(), NaiveDate::from_ymd_opt(2026, 3, 5).unwrap());
    assert!(value.excluded_offsets.is_empty());
}

#[test]
fn excluded_tail_trims_the_end() {
    let state = range_state(0, 3).with_toggles(
        ToggleOp::Toggle,
        [2, 3],
        ToggleOptions::default(),
    );
    assert_eq!(
        resolve_range(state.enablement()),
        Some(SelectionRange { from: 0, to: 1 })
    );
    let value = state.selection_value().unwrap();
    assert_eq!(value.span_days(), 2);
    assert!(value.excluded_offsets.is_empty());
}

#[test]
fn excluded_middle_is_listed() {
    let state = range_state(0, 4).toggle(2);
    let value = state.selection_value().unwrap();
    assert_eq!(value.excluded_offsets, vec![2]);
    assert_eq!(value.span_days(), 5);
}

#[test]
fn excluded_head_trims_the_start() {
    let state = add(&range_state(0, 4), &[0, 1]);
    assert_eq!(
        resolve_range(state.enablement()),
        Some(SelectionRange { from: 2, to: 4 })
    );
}

// ── Weekday filtering ───────────────────────────────────────────────────────

#[test]
fn weekday_schedule_over_two_years() {
    let state = empty_state()
        .with_schedule_days(Some(ScheduleDays::new([ScheduleDay::Weekday])))
        .with_range(Some(monday()), NaiveDate::from_ymd_opt(2028, 3, 1));

    let index = *state.index();
    let last = index.offset_of(NaiveDate::from_ymd_opt(2028, 3, 1).unwrap());
    for offset in 0..=last {
        let weekend = matches!(index.to_date(offset).weekday(), Weekday::Sat | Weekday::Sun);
        assert_eq!(state.is_enabled_day(offset), !weekend, "offset {}", offset);
    }

    // Toggling weekend days has no effect: they are purged on the spot.
    let saturdays: Vec<i64> = (0..=last)
        .filter(|&o| index.to_date(o).weekday() == Weekday::Sat)
        .collect();
    let toggled = state.with_toggles(ToggleOp::Toggle, saturdays.iter().copied(), ToggleOptions::default());
    assert!(toggled.toggled_offsets().is_empty());
    for &offset in &saturdays {
        assert!(!toggled.is_enabled_day(offset));
    }
    assert_eq!(toggled.selection_value(), state.selection_value());
}

#[test]
fn range_starting_on_weekend_trims_to_monday() {
    // Saturday 2026-03-07 through Wednesday 2026-03-11.
    let state = empty_state()
        .with_schedule_days(Some(ScheduleDays::weekdays()))
        .with_range(NaiveDate::from_ymd_opt(2026, 3, 7), NaiveDate::from_ymd_opt(2026, 3, 11));
    assert_eq!(
        resolve_range(state.enablement()),
        Some(SelectionRange { from: 7, to: 9 })
    );
}

#[test]
fn weekend_only_range_on_weekday_schedule_is_empty() {
    let state = empty_state()
        .with_schedule_days(Some(ScheduleDays::weekdays()))
        .with_range(NaiveDate::from_ymd_opt(2026, 3, 7), NaiveDate::from_ymd_opt(2026, 3, 8));
    assert!(!state.has_selection());
}

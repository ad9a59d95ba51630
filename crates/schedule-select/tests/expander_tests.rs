//! Tests for descriptor expansion through RFC 5545 text.

use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use schedule_select::expander::rrule_text;
use schedule_select::{
    expand_selection, ScheduleDays, SelectionConfig, SelectionState, SelectionValue, ToggleOp,
    ToggleOptions, WeekMask,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Two working weeks from Monday 2026-03-02 with Wednesday 4th and Tuesday
/// 10th toggled off.
fn two_weeks(tz: Tz) -> SelectionValue {
    SelectionState::new(SelectionConfig::default().with_origin(date(2026, 3, 2), tz))
        .with_schedule_days(Some(ScheduleDays::weekdays()))
        .with_range(Some(date(2026, 3, 2)), Some(date(2026, 3, 13)))
        .with_toggles(ToggleOp::Toggle, [2, 8], ToggleOptions::default())
        .selection_value()
        .cloned()
        .expect("selection should not be empty")
}

// ---------------------------------------------------------------------------
// RFC 5545 rendering
// ---------------------------------------------------------------------------

#[test]
fn renders_daily_rule_with_exdates() {
    let text = rrule_text(&two_weeks(Tz::UTC)).unwrap();
    assert_eq!(
        text,
        "DTSTART;TZID=UTC:20260302T000000\n\
         RRULE:FREQ=DAILY;BYDAY=MO,TU,WE,TH,FR;COUNT=10\n\
         EXDATE;TZID=UTC:20260304T000000,20260310T000000"
    );
}

#[test]
fn empty_week_mask_has_no_rule() {
    let value = SelectionValue {
        starts_at: Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2026, 3, 6, 0, 0, 0).unwrap(),
        week_mask: WeekMask::default(),
        excluded_offsets: vec![],
        timezone: Tz::UTC,
    };
    assert_eq!(rrule_text(&value), None);
    assert!(expand_selection(&value).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

#[test]
fn expansion_matches_descriptor_dates_utc() {
    let value = two_weeks(Tz::UTC);
    let expanded = expand_selection(&value).expect("should expand");
    assert_eq!(expanded, value.dates());
    assert_eq!(expanded.len(), 8);
    assert_eq!(expanded[0], date(2026, 3, 2));
    assert!(!expanded.contains(&date(2026, 3, 4)));
    assert!(!expanded.contains(&date(2026, 3, 7)));
}

#[test]
fn expansion_matches_descriptor_dates_across_dst() {
    // US spring forward happens on Sunday 2026-03-08, inside the span.
    let value = two_weeks(chrono_tz::America::New_York);
    let expanded = expand_selection(&value).expect("should expand");
    assert_eq!(expanded, value.dates());
    assert_eq!(expanded.last(), Some(&date(2026, 3, 13)));
}

#[test]
fn single_day_expands_to_one_date() {
    let value = SelectionState::new(SelectionConfig::default().with_origin(date(2026, 3, 2), Tz::UTC))
        .with_range(Some(date(2026, 3, 7)), None)
        .selection_value()
        .cloned()
        .unwrap();
    assert_eq!(expand_selection(&value).unwrap(), vec![date(2026, 3, 7)]);
}

#[test]
fn year_long_descriptor_dates_match_expansion() {
    let value = SelectionValue {
        starts_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap(),
        week_mask: WeekMask::encode(&ScheduleDays::weekdays()),
        excluded_offsets: (0..365).step_by(2).collect(),
        timezone: Tz::UTC,
    };
    let dates = value.dates();
    assert!(dates.iter().all(|&d| value.includes(d)));
    assert!(!dates.contains(&date(2026, 1, 1)));
    assert!(dates.contains(&date(2026, 1, 2)));
    assert_eq!(dates, expand_selection(&value).unwrap());
}

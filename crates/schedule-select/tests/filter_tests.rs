//! Filter merge, the enablement predicates and the raw scan window.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use chrono_tz::Tz;
use schedule_select::enablement::{EnabledDays, Enablement, FilterPredicate};
use schedule_select::filter::MergedFilter;
use schedule_select::range::scan_window;
use schedule_select::{
    resolve_range, AvailabilityFilter, Bounds, DayIndex, DaySet, Exclusion, ScheduleDays,
    SelectionRange, WeekMask,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Origin is Monday 2026-03-02 in UTC.
fn index() -> DayIndex {
    DayIndex::new(date(2026, 3, 2), Tz::UTC)
}

fn enablement(range: Option<(i64, i64)>, toggled: &[i64]) -> Enablement {
    let index = index();
    let input = range.map(|(a, b)| (index.to_date(a), index.to_date(b)));
    let toggled: BTreeSet<i64> = toggled.iter().copied().collect();
    Enablement {
        day: EnabledDays::build(index, DaySet::ALL, input, &toggled),
        filter: FilterPredicate::build(index, &MergedFilter::default()),
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

#[test]
fn no_filter_allows_everything() {
    let merged = MergedFilter::merge(None, &[], &Bounds::default(), &index());
    assert_eq!(merged, MergedFilter::default());
    assert!(merged.in_bounds(i64::MIN));
}

#[test]
fn offsets_count_from_filter_start() {
    let filter = AvailabilityFilter {
        start: Some(date(2026, 3, 4)),
        exclusions: vec![Exclusion::Offset(1), Exclusion::Date(date(2026, 3, 10))],
        ..Default::default()
    };
    let merged = MergedFilter::merge(
        Some(&filter),
        &[Exclusion::Offset(0)],
        &Bounds::default(),
        &index(),
    );
    assert_eq!(merged.excluded, BTreeSet::from([2, 3, 8]));
    assert_eq!(merged.min, Some(2));
    assert_eq!(merged.max, None);
}

#[test]
fn bounds_tighten_filter_range() {
    let index = DayIndex::new(date(2026, 3, 1), Tz::UTC);
    let filter = AvailabilityFilter {
        start: Some(date(2026, 3, 5)),
        end: Some(date(2026, 3, 31)),
        day_mask: Some(WeekMask::encode(&ScheduleDays::weekdays())),
        ..Default::default()
    };
    let bounds = Bounds::new(Some(date(2026, 3, 1)), Some(date(2026, 3, 20)));
    let merged = MergedFilter::merge(Some(&filter), &[], &bounds, &index);
    assert_eq!(merged.min, Some(4));
    assert_eq!(merged.max, Some(19));
    assert_eq!(merged.days, DaySet::WEEKDAYS);
}

#[test]
fn inverted_bounds_are_swapped() {
    let bounds = Bounds::new(Some(date(2026, 5, 1)), Some(date(2026, 4, 1)));
    assert_eq!(bounds.start, Some(date(2026, 4, 1)));
    assert_eq!(bounds.clamp(date(2026, 6, 1)), date(2026, 5, 1));
    assert!(bounds.contains(date(2026, 4, 15)));
}

#[test]
fn inverted_bounds_are_swapped_when_deserialized() {
    let bounds: Bounds =
        serde_json::from_str(r#"{"start":"2026-05-01","end":"2026-04-01"}"#).unwrap();
    assert_eq!(bounds, Bounds::new(Some(date(2026, 4, 1)), Some(date(2026, 5, 1))));

    let open: Bounds = serde_json::from_str(r#"{"end":"2026-04-01"}"#).unwrap();
    assert_eq!(open, Bounds::new(None, Some(date(2026, 4, 1))));
}

#[test]
fn exclusions_deserialize_from_mixed_json() {
    let filter: AvailabilityFilter = serde_json::from_str(
        r#"{"dayMask":"WEEKDAY","exclusions":[3,"2026-03-10"],"start":"2026-03-02","timezone":"Europe/Berlin"}"#,
    )
    .unwrap();
    assert_eq!(
        filter.exclusions,
        vec![Exclusion::Offset(3), Exclusion::Date(date(2026, 3, 10))]
    );
    assert_eq!(filter.timezone, Some(chrono_tz::Europe::Berlin));
}

// ---------------------------------------------------------------------------
// Enablement
// ---------------------------------------------------------------------------

#[test]
fn toggles_flip_range_membership() {
    let toggled = BTreeSet::from([1, 9]);
    let days = EnabledDays::build(
        index(),
        DaySet::ALL,
        Some((date(2026, 3, 2), date(2026, 3, 5))),
        &toggled,
    );
    assert!(days.is_enabled(0));
    assert!(!days.is_enabled(1));
    assert!(days.is_enabled(3));
    assert!(!days.is_enabled(4));
    assert!(days.is_enabled(9));
}

#[test]
fn disallowed_weekday_is_never_enabled() {
    let toggled = BTreeSet::from([12]);
    let days = EnabledDays::build(
        index(),
        DaySet::WEEKDAYS,
        Some((date(2026, 3, 2), date(2026, 3, 8))),
        &toggled,
    );
    assert!(!days.is_enabled(5));
    assert!(!days.is_enabled(12));
    assert!(days.is_enabled(4));
}

#[test]
fn filter_exclusions_always_disable() {
    let filter = AvailabilityFilter {
        exclusions: vec![Exclusion::Offset(2)],
        ..Default::default()
    };
    let merged = MergedFilter::merge(
        Some(&filter),
        &[],
        &Bounds::new(None, Some(date(2026, 3, 10))),
        &index(),
    );
    let predicate = FilterPredicate::build(index(), &merged);
    assert!(predicate.is_enabled(1));
    assert!(!predicate.is_enabled(2));
    assert!(predicate.is_enabled(8));
    assert!(!predicate.is_enabled(9));
}

// ---------------------------------------------------------------------------
// Scan window
// ---------------------------------------------------------------------------

#[test]
fn nothing_to_scan() {
    assert_eq!(resolve_range(&enablement(None, &[])), None);
}

#[test]
fn single_toggle_is_its_own_range() {
    let range = resolve_range(&enablement(None, &[4])).unwrap();
    assert_eq!(range, SelectionRange { from: 4, to: 4 });
    assert_eq!(range.len(), 1);
}

#[test]
fn toggles_extend_window_both_ways() {
    let window = scan_window(&enablement(Some((2, 4)), &[-3, 9])).unwrap();
    assert_eq!(window, SelectionRange { from: -3, to: 9 });
}

#[test]
fn full_span_length_saturates() {
    let range = SelectionRange {
        from: i64::MIN,
        to: i64::MAX,
    };
    assert_eq!(range.len(), u64::MAX);
    assert!(range.contains(0));
}

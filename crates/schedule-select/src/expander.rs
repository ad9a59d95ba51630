//! Descriptor expansion -- renders a [`SelectionValue`] as an RFC 5545
//! recurrence and expands it into the concrete selected dates.
//!
//! The descriptor maps onto a daily rule filtered by `BYDAY`, with one
//! `EXDATE` per excluded offset. Expansion goes through the `rrule` crate so
//! the output can be checked against any other RFC 5545 consumer.

use chrono::{Datelike, Duration, NaiveDate};
use rrule::RRuleSet;

use crate::error::{Result, ScheduleError};
use crate::synthesize::SelectionValue;

/// Number of days in the span that fall on a week-mask weekday.
fn masked_day_count(value: &SelectionValue) -> i64 {
    let days = value.week_mask.day_set();
    let start = value.start_date();
    (0..value.span_days())
        .filter_map(|offset| start.checked_add_signed(Duration::days(offset)))
        .filter(|date| days.contains(date.weekday()))
        .count() as i64
}

/// Render the descriptor as a `DTSTART` / `RRULE` / `EXDATE` block.
///
/// Returns `None` when the week mask is empty, which has no RRULE form.
pub fn rrule_text(value: &SelectionValue) -> Option<String> {
    let byday = value.week_mask.to_byday();
    if byday.is_empty() {
        return None;
    }

    let local_start = value.starts_at.with_timezone(&value.timezone);
    let time = local_start.format("T%H%M%S").to_string();
    let start = value.start_date();
    let tzid = value.timezone.name();

    let mut text = format!(
        "DTSTART;TZID={}:{}{}\nRRULE:FREQ=DAILY;BYDAY={};COUNT={}",
        tzid,
        start.format("%Y%m%d"),
        time,
        byday,
        masked_day_count(value)
    );

    let exdates: Vec<String> = value
        .excluded_offsets
        .iter()
        .filter_map(|&offset| start.checked_add_signed(Duration::days(offset)))
        .filter(|&date| value.week_mask.day_set().contains(date.weekday()))
        .map(|date| format!("{}{}", date.format("%Y%m%d"), time))
        .collect();
    if !exdates.is_empty() {
        text.push_str(&format!("\nEXDATE;TZID={}:{}", tzid, exdates.join(",")));
    }
    Some(text)
}

/// Expand a descriptor into its selected calendar dates, in order.
///
/// # Errors
/// Returns `ScheduleError::Expansion` when the span holds more days than the
/// `rrule` crate can enumerate in one call, or the rendered rule is rejected.
pub fn expand_selection(value: &SelectionValue) -> Result<Vec<NaiveDate>> {
    let Some(text) = rrule_text(value) else {
        return Ok(Vec::new());
    };
    let count = masked_day_count(value);
    if count == 0 {
        return Ok(Vec::new());
    }
    let limit = u16::try_from(count)
        .map_err(|_| ScheduleError::Expansion(format!("span of {} days is too long", count)))?;

    let set: RRuleSet = text
        .parse()
        .map_err(|e| ScheduleError::Expansion(format!("{}", e)))?;

    Ok(set
        .all(limit)
        .dates
        .into_iter()
        .map(|dt| dt.date_naive())
        .collect())
}

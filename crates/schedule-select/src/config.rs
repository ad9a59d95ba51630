//! Engine configuration.
//!
//! A [`SelectionConfig`] seeds a fresh [`SelectionState`](crate::SelectionState).
//! Every field has a default, so a config document only names what it changes:
//!
//! ```json
//! {
//!   "origin": "2026-03-02",
//!   "timezone": "America/New_York",
//!   "defaultScheduleDays": ["WEEKDAY"],
//!   "bounds": { "start": "2026-03-02", "end": "2026-12-31" },
//!   "initialSelection": "all"
//! }
//! ```

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filter::Bounds;
use crate::schedule_days::ScheduleDays;

/// Selection applied when a state is created, and again whenever a filter
/// change finds the selection empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialSelection {
    All,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionConfig {
    /// Day that offset `0` maps to. Falls back to `bounds.start`, then to
    /// 1970-01-01; the engine never reads the clock.
    pub origin: Option<NaiveDate>,
    pub timezone: Tz,
    pub default_schedule_days: ScheduleDays,
    pub bounds: Bounds,
    pub initial_selection: Option<InitialSelection>,
    pub compute_relative_to_filter: bool,
    pub output_timezone: Option<Tz>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            origin: None,
            timezone: Tz::UTC,
            default_schedule_days: ScheduleDays::all(),
            bounds: Bounds::default(),
            initial_selection: None,
            compute_relative_to_filter: true,
            output_timezone: None,
        }
    }
}

impl SelectionConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_origin(mut self, origin: NaiveDate, timezone: Tz) -> Self {
        self.origin = Some(origin);
        self.timezone = timezone;
        self
    }

    pub(crate) fn resolved_origin(&self) -> NaiveDate {
        self.origin
            .or(Bounds::new(self.bounds.start, self.bounds.end).start)
            .unwrap_or_default()
    }
}

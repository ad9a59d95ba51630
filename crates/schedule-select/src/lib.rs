//! # schedule-select
//!
//! Recurring schedule selection engine for calendar pickers.
//!
//! A user drags a coarse date range, flips individual days on and off,
//! restricts the allowed days of the week, and may be constrained by an
//! external availability filter. This crate folds all of that into one
//! canonical [`SelectionValue`]: a start/end span, a week mask, and the day
//! offsets inside the span that are not selected.
//!
//! Everything is a pure function over an immutable [`SelectionState`]; each
//! transition returns a fully re-derived next state.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use schedule_select::{SelectionConfig, SelectionState};
//!
//! let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
//! let state = SelectionState::new(SelectionConfig::default().with_origin(monday, chrono_tz::Tz::UTC));
//! let state = state.with_range(Some(monday), NaiveDate::from_ymd_opt(2026, 3, 5));
//! let state = state.toggle(1);
//!
//! let value = state.selection_value().unwrap();
//! assert_eq!(value.excluded_offsets, vec![1]);
//! assert_eq!(value.week_mask.to_string(), "WEEKDAY,WEEKEND");
//! ```
//!
//! ## Modules
//!
//! - [`day_index`] — date ⇄ integer day offset relative to an origin
//! - [`schedule_days`] — day-group codes, weekday bitmasks, week-mask tokens
//! - [`filter`] — availability filters, hard bounds, and their merge
//! - [`enablement`] — the `isEnabledDay` / `isEnabledByFilter` predicates
//! - [`range`] — tightest span holding every selected day
//! - [`synthesize`] — the emitted [`SelectionValue`] descriptor
//! - [`state`] — [`SelectionState`] and its transitions
//! - [`action`] — transitions as serde data plus [`reduce`]
//! - [`store`] — single-writer adapter that republishes descriptor changes
//! - [`expander`] — descriptor → RFC 5545 text → concrete dates
//! - [`timezone`] — timezone parsing and the [`TzNormal`] converter
//! - [`config`] — [`SelectionConfig`]
//! - [`error`] — Error types

pub mod action;
pub mod config;
pub mod day_index;
pub mod enablement;
pub mod error;
pub mod expander;
pub mod filter;
pub mod range;
pub mod schedule_days;
pub mod state;
pub mod store;
pub mod synthesize;
pub mod timezone;

pub use action::{reduce, SelectionAction};
pub use config::{InitialSelection, SelectionConfig};
pub use day_index::DayIndex;
pub use error::ScheduleError;
pub use expander::expand_selection;
pub use filter::{AvailabilityFilter, Bounds, Exclusion};
pub use range::{resolve_range, SelectionRange};
pub use schedule_days::{DaySet, ScheduleDay, ScheduleDays, WeekMask};
pub use state::{SelectionState, ToggleOp, ToggleOptions};
pub use store::SelectionStore;
pub use synthesize::{synthesize, SelectionValue};
pub use timezone::TzNormal;

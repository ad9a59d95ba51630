//! Error types for schedule-select parsing and expansion.
//!
//! State transitions never fail; malformed input is normalized instead. These
//! errors only surface at the textual edges (timezone names, day codes, week
//! mask tokens, config documents) and when expanding a descriptor.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid schedule day code: {0}")]
    InvalidScheduleDay(String),

    #[error("Invalid week mask: {0}")]
    InvalidWeekMask(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Expansion error: {0}")]
    Expansion(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

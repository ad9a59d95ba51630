//! Schedule-day codec: day-group codes, day-of-week bitmasks and week-mask tokens.
//!
//! Three representations of "which days of the week are allowed":
//!
//! - [`ScheduleDays`] -- a set of symbolic [`ScheduleDay`] codes as a user or
//!   config supplies them (`WEEKDAY`, `WEEKEND`, or single days `MO`..`SU`).
//! - [`DaySet`] -- the expanded 7-bit day-of-week mask (bit 0 = Monday).
//! - [`WeekMask`] -- the compact token emitted in a selection descriptor.
//!
//! Every `DaySet` has exactly one canonical `ScheduleDays`: complete groups
//! collapse to their group code, leftovers stay as single days.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

// ── DaySet ──────────────────────────────────────────────────────────────────

/// Days of the week as a bitmask, Monday in bit 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaySet(u8);

impl DaySet {
    pub const NONE: Self = DaySet(0);
    pub const WEEKDAYS: Self = DaySet(0b001_1111);
    pub const WEEKEND: Self = DaySet(0b110_0000);
    pub const ALL: Self = DaySet(0b111_1111);

    const ORDER: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Build from raw bits; bits above Sunday are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        DaySet(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn single(day: Weekday) -> Self {
        DaySet(1 << day.num_days_from_monday())
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & Self::single(day).0 != 0
    }

    pub fn is_superset(self, other: DaySet) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Allowed weekdays, Monday first.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        Self::ORDER
            .into_iter()
            .filter(move |day| self.contains(*day))
    }
}

impl BitOr for DaySet {
    type Output = DaySet;

    fn bitor(self, rhs: DaySet) -> DaySet {
        DaySet(self.0 | rhs.0)
    }
}

impl BitAnd for DaySet {
    type Output = DaySet;

    fn bitand(self, rhs: DaySet) -> DaySet {
        DaySet(self.0 & rhs.0)
    }
}

impl Not for DaySet {
    type Output = DaySet;

    fn not(self) -> DaySet {
        DaySet(!self.0 & Self::ALL.0)
    }
}

impl FromIterator<Weekday> for DaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter()
            .fold(DaySet::NONE, |acc, day| acc | DaySet::single(day))
    }
}

// ── ScheduleDay ─────────────────────────────────────────────────────────────

/// A symbolic group of allowed days of the week.
///
/// Variant order is the canonical token order: groups first, then single
/// days Monday through Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScheduleDay {
    Weekday,
    Weekend,
    Mo,
    Tu,
    We,
    Th,
    Fr,
    Sa,
    Su,
}

impl ScheduleDay {
    pub const SINGLES: [ScheduleDay; 7] = [
        ScheduleDay::Mo,
        ScheduleDay::Tu,
        ScheduleDay::We,
        ScheduleDay::Th,
        ScheduleDay::Fr,
        ScheduleDay::Sa,
        ScheduleDay::Su,
    ];

    pub fn from_weekday(day: Weekday) -> Self {
        match day {
            Weekday::Mon => ScheduleDay::Mo,
            Weekday::Tue => ScheduleDay::Tu,
            Weekday::Wed => ScheduleDay::We,
            Weekday::Thu => ScheduleDay::Th,
            Weekday::Fri => ScheduleDay::Fr,
            Weekday::Sat => ScheduleDay::Sa,
            Weekday::Sun => ScheduleDay::Su,
        }
    }

    /// The days of the week this code stands for.
    pub fn day_set(self) -> DaySet {
        match self {
            ScheduleDay::Weekday => DaySet::WEEKDAYS,
            ScheduleDay::Weekend => DaySet::WEEKEND,
            ScheduleDay::Mo => DaySet::single(Weekday::Mon),
            ScheduleDay::Tu => DaySet::single(Weekday::Tue),
            ScheduleDay::We => DaySet::single(Weekday::Wed),
            ScheduleDay::Th => DaySet::single(Weekday::Thu),
            ScheduleDay::Fr => DaySet::single(Weekday::Fri),
            ScheduleDay::Sa => DaySet::single(Weekday::Sat),
            ScheduleDay::Su => DaySet::single(Weekday::Sun),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScheduleDay::Weekday => "WEEKDAY",
            ScheduleDay::Weekend => "WEEKEND",
            ScheduleDay::Mo => "MO",
            ScheduleDay::Tu => "TU",
            ScheduleDay::We => "WE",
            ScheduleDay::Th => "TH",
            ScheduleDay::Fr => "FR",
            ScheduleDay::Sa => "SA",
            ScheduleDay::Su => "SU",
        }
    }
}

impl fmt::Display for ScheduleDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = match s.trim().to_ascii_uppercase().as_str() {
            "WEEKDAY" => ScheduleDay::Weekday,
            "WEEKEND" => ScheduleDay::Weekend,
            "MO" => ScheduleDay::Mo,
            "TU" => ScheduleDay::Tu,
            "WE" => ScheduleDay::We,
            "TH" => ScheduleDay::Th,
            "FR" => ScheduleDay::Fr,
            "SA" => ScheduleDay::Sa,
            "SU" => ScheduleDay::Su,
            _ => return Err(ScheduleError::InvalidScheduleDay(format!("'{}'", s))),
        };
        Ok(code)
    }
}

impl TryFrom<String> for ScheduleDay {
    type Error = ScheduleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ScheduleDay> for String {
    fn from(day: ScheduleDay) -> String {
        day.as_str().to_string()
    }
}

// ── ScheduleDays ────────────────────────────────────────────────────────────

/// A set of schedule-day codes, not necessarily canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleDays(BTreeSet<ScheduleDay>);

impl ScheduleDays {
    pub fn new<I: IntoIterator<Item = ScheduleDay>>(codes: I) -> Self {
        ScheduleDays(codes.into_iter().collect())
    }

    /// Every day of the week: `{WEEKDAY, WEEKEND}`.
    pub fn all() -> Self {
        Self::new([ScheduleDay::Weekday, ScheduleDay::Weekend])
    }

    pub fn weekdays() -> Self {
        Self::new([ScheduleDay::Weekday])
    }

    /// The canonical code set for a day-of-week mask.
    pub fn from_day_set(days: DaySet) -> Self {
        let mut codes = BTreeSet::new();
        let mut rest = days;
        for group in [ScheduleDay::Weekday, ScheduleDay::Weekend] {
            if days.is_superset(group.day_set()) {
                codes.insert(group);
                rest = rest & !group.day_set();
            }
        }
        codes.extend(rest.iter().map(ScheduleDay::from_weekday));
        ScheduleDays(codes)
    }

    /// Expand every code into the days of the week it covers.
    pub fn day_set(&self) -> DaySet {
        self.0
            .iter()
            .fold(DaySet::NONE, |acc, code| acc | code.day_set())
    }

    /// Collapse redundant codes. All seven singles become `WEEKDAY,WEEKEND`;
    /// a single day already covered by a group is dropped.
    pub fn canonical(&self) -> Self {
        Self::from_day_set(self.day_set())
    }

    pub fn is_canonical(&self) -> bool {
        *self == self.canonical()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, code: ScheduleDay) -> bool {
        self.0.contains(&code)
    }

    pub fn iter(&self) -> impl Iterator<Item = ScheduleDay> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ScheduleDay> for ScheduleDays {
    fn from_iter<I: IntoIterator<Item = ScheduleDay>>(iter: I) -> Self {
        Self::new(iter)
    }
}

// ── WeekMask ────────────────────────────────────────────────────────────────

/// Compact week token emitted in a selection descriptor.
///
/// Always holds a canonical code set. Its text form is the comma-joined codes
/// in canonical order (`WEEKDAY,SA`); the empty set is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekMask(ScheduleDays);

impl WeekMask {
    pub fn encode(days: &ScheduleDays) -> Self {
        WeekMask(days.canonical())
    }

    pub fn decode(&self) -> ScheduleDays {
        self.0.clone()
    }

    pub fn day_set(&self) -> DaySet {
        self.0.day_set()
    }

    /// The RFC 5545 `BYDAY` list for this mask, Monday first.
    pub fn to_byday(&self) -> String {
        self.day_set()
            .iter()
            .map(|day| ScheduleDay::from_weekday(day).as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for WeekMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = self
            .0
            .iter()
            .map(ScheduleDay::as_str)
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&token)
    }
}

impl FromStr for WeekMask {
    type Err = ScheduleError;

    /// Parse a token. Non-canonical input is accepted and canonicalized;
    /// unknown codes are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let codes = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<ScheduleDay>()
                    .map_err(|_| ScheduleError::InvalidWeekMask(format!("'{}'", s)))
            })
            .collect::<Result<ScheduleDays, _>>()?;
        Ok(WeekMask::encode(&codes))
    }
}

impl TryFrom<String> for WeekMask {
    type Error = ScheduleError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<WeekMask> for String {
    fn from(mask: WeekMask) -> String {
        mask.to_string()
    }
}

//! Year-agnostic `MM-DD` calendar keys.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::NgiError;

/// Days per month in a non-leap year.
const MONTH_DAYS: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Number of canonical keys (Feb 29 is not one of them).
pub const CALENDAR_DAYS: usize = 365;

/// A month/day pair shared by every year, rendered as `MM-DD`.
///
/// Ordering is month then day, which matches the lexicographic order of the
/// rendered strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarKey {
    month: u8,
    day: u8,
}

impl CalendarKey {
    /// Build a key, rejecting anything outside the 365 canonical days.
    pub fn new(month: u8, day: u8) -> Option<Self> {
        let max_day = *MONTH_DAYS.get(usize::from(month).checked_sub(1)?)?;
        if day == 0 || day > max_day {
            return None;
        }
        Some(Self { month, day })
    }

    /// Key for a calendar date. Feb 29 has no key.
    pub fn from_date(date: NaiveDate) -> Option<Self> {
        Self::new(date.month() as u8, date.day() as u8)
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// Zero-based position in [`calendar_keys`].
    pub fn ordinal(&self) -> usize {
        let before: usize = MONTH_DAYS[..usize::from(self.month - 1)]
            .iter()
            .map(|&d| usize::from(d))
            .sum();
        before + usize::from(self.day) - 1
    }
}

impl fmt::Display for CalendarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for CalendarKey {
    type Err = NgiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NgiError::InvalidArgument(format!("not a calendar key: {:?}", s));
        let (month, day) = s.split_once('-').ok_or_else(invalid)?;
        if month.len() != 2 || day.len() != 2 {
            return Err(invalid());
        }
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let day: u8 = day.parse().map_err(|_| invalid())?;
        Self::new(month, day).ok_or_else(invalid)
    }
}

impl Serialize for CalendarKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The 365 canonical keys in chronological order, `01-01` through `12-31`.
///
/// Built once and shared for the life of the process.
pub fn calendar_keys() -> &'static [CalendarKey] {
    static KEYS: OnceLock<Vec<CalendarKey>> = OnceLock::new();
    KEYS.get_or_init(|| {
        let mut keys = Vec::with_capacity(CALENDAR_DAYS);
        for (idx, &days) in MONTH_DAYS.iter().enumerate() {
            let month = idx as u8 + 1;
            for day in 1..=days {
                keys.push(CalendarKey { month, day });
            }
        }
        keys
    })
}

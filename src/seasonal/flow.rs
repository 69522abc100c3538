//! Expansion of flow date ranges into calendar keys.

use chrono::NaiveDate;

use super::calendar::CalendarKey;
use crate::error::{NgiError, Result};

/// Parse an ISO `YYYY-MM-DD` date. Empty input means "no date".
pub fn parse_date(input: &str) -> Result<Option<NaiveDate>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| NgiError::MalformedDate(input.to_string()))
}

/// Lazy walk over the calendar keys of an inclusive date range.
///
/// Feb 29 is skipped, not mapped onto a neighbouring key.
#[derive(Debug, Clone)]
pub struct FlowDays {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl FlowDays {
    /// Days from `start` to `end` inclusive. An end before the start is
    /// clamped to the start.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            next: Some(start),
            end: end.max(start),
        }
    }

    /// A range covering no days.
    pub fn empty() -> Self {
        Self {
            next: None,
            end: NaiveDate::MIN,
        }
    }
}

impl Iterator for FlowDays {
    type Item = CalendarKey;

    fn next(&mut self) -> Option<CalendarKey> {
        loop {
            let date = self.next.filter(|d| *d <= self.end)?;
            self.next = date.succ_opt();
            if let Some(key) = CalendarKey::from_date(date) {
                return Some(key);
            }
        }
    }
}

/// Expand a flow range given as date strings.
///
/// - both empty: no days
/// - one empty: the single day given by the other
/// - end before start: the single day `start`
///
/// Fails with [`NgiError::MalformedDate`] when a non-empty bound does not parse.
pub fn expand_flow_range(start: &str, end: &str) -> Result<FlowDays> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;

    Ok(match (start, end) {
        (None, None) => FlowDays::empty(),
        (Some(day), None) | (None, Some(day)) => FlowDays::between(day, day),
        (Some(start), Some(end)) => FlowDays::between(start, end),
    })
}

//! Folding a season of observations into one price per calendar day.

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

use super::calendar::CalendarKey;
use super::flow::expand_flow_range;
use crate::models::Observation;

/// One price per calendar day for a single season.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayLookup(BTreeMap<CalendarKey, f64>);

impl DayLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CalendarKey) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn contains(&self, key: &CalendarKey) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in calendar order.
    pub fn iter(&self) -> btree_map::Iter<'_, CalendarKey, f64> {
        self.0.iter()
    }

    /// Set `key` unless it already has a price. Returns whether it was set.
    pub fn set_if_absent(&mut self, key: CalendarKey, price: f64) -> bool {
        match self.0.entry(key) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(price);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }
}

impl FromIterator<(CalendarKey, f64)> for DayLookup {
    /// First price seen for a key wins.
    fn from_iter<I: IntoIterator<Item = (CalendarKey, f64)>>(iter: I) -> Self {
        let mut lookup = DayLookup::new();
        for (key, price) in iter {
            lookup.set_if_absent(key, price);
        }
        lookup
    }
}

/// Build a [`DayLookup`] from one season of observations.
///
/// Observations are walked from last to first and each day keeps the first
/// price assigned to it, so when flow ranges overlap the observation nearest
/// the end of `observations` wins. Callers wanting "latest trade date wins"
/// must pass observations sorted by trade date, which is how the columnar
/// decoder and the history store return them.
///
/// Observations without an average contribute nothing. An observation with an
/// unparseable date is skipped.
pub fn build_day_lookup(observations: &[Observation]) -> DayLookup {
    let mut lookup = DayLookup::new();

    for obs in observations.iter().rev() {
        let Some(price) = obs.average else {
            continue;
        };
        let (start, end) = obs.flow_bounds();
        let days = match expand_flow_range(start, end) {
            Ok(days) => days,
            Err(e) => {
                tracing::debug!(
                    trade_date = %obs.trade_date,
                    "skipping observation: {}",
                    e
                );
                continue;
            }
        };
        for key in days {
            lookup.set_if_absent(key, price);
        }
    }

    lookup
}

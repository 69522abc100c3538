//! Multi-year min/max/average bands per calendar day.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::calendar::CalendarKey;
use super::lookup::{build_day_lookup, DayLookup};
use crate::models::Observation;

/// Identifies one member of a historical band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BandKey {
    Year(i32),
    /// Records from several seasons pooled without year labels.
    Aggregate,
}

impl fmt::Display for BandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandKey::Year(y) => write!(f, "{}", y),
            BandKey::Aggregate => f.write_str("aggregate"),
        }
    }
}

/// Day lookups of the seasons that make up a band.
pub type HistoricalBand = BTreeMap<BandKey, DayLookup>;

/// Per-key statistics across a band, positionally aligned with the keys they
/// were computed for.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RangeBounds {
    pub min: Vec<Option<f64>>,
    pub max: Vec<Option<f64>>,
    pub average: Vec<Option<f64>>,
}

impl RangeBounds {
    /// All-null bounds of the given length.
    pub fn empty(len: usize) -> Self {
        Self {
            min: vec![None; len],
            max: vec![None; len],
            average: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.min.len()
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_empty()
    }

    /// True when at least one key has a value.
    pub fn has_values(&self) -> bool {
        self.min.iter().chain(&self.max).any(Option::is_some)
    }
}

/// Build a band from per-year observation lists. Years whose lookup comes out
/// empty are left out.
pub fn band_from_years(history: &BTreeMap<i32, Vec<Observation>>) -> HistoricalBand {
    history
        .iter()
        .filter(|(_, records)| !records.is_empty())
        .map(|(year, records)| (BandKey::Year(*year), build_day_lookup(records)))
        .filter(|(_, lookup)| !lookup.is_empty())
        .collect()
}

/// Build a single-member band from records pooled across seasons.
pub fn band_from_pooled(records: &[Observation]) -> HistoricalBand {
    let lookup = build_day_lookup(records);
    let mut band = HistoricalBand::new();
    if !lookup.is_empty() {
        band.insert(BandKey::Aggregate, lookup);
    }
    band
}

/// Compute min, max and average for every key across the band.
///
/// A key no lookup covers gets `None` in every output array. An empty band
/// yields all-`None` arrays of `keys.len()`. The result does not depend on the
/// order of the band's members.
pub fn aggregate_range(band: &HistoricalBand, keys: &[CalendarKey]) -> RangeBounds {
    if band.is_empty() {
        return RangeBounds::empty(keys.len());
    }

    let mut bounds = RangeBounds {
        min: Vec::with_capacity(keys.len()),
        max: Vec::with_capacity(keys.len()),
        average: Vec::with_capacity(keys.len()),
    };

    for key in keys {
        let values: Vec<f64> = band.values().filter_map(|lookup| lookup.get(key)).collect();
        if values.is_empty() {
            bounds.min.push(None);
            bounds.max.push(None);
            bounds.average.push(None);
            continue;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = values.iter().sum::<f64>() / values.len() as f64;
        bounds.min.push(Some(min));
        bounds.max.push(Some(max));
        bounds.average.push(Some(avg));
    }

    bounds
}

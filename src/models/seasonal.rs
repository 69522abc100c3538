use serde::Serialize;

use super::chart::ChartSeries;
use crate::seasonal::CalendarKey;

// ---------------------------------------------------------------------------
// SeasonalRow: one calendar day of the seasonal table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalRow {
    pub date: CalendarKey,
    pub curr: Option<f64>,
    pub prev: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub diff: Option<f64>,
    pub pct: Option<f64>,
}

// ---------------------------------------------------------------------------
// SeasonalBundle: year-over-year comparison on a shared MM-DD axis
// ---------------------------------------------------------------------------

/// Current season, prior season and historical band, aligned on the 365
/// calendar keys.
///
/// Every array has one entry per element of `dates`, and `table_rows` follows
/// the same order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalBundle {
    pub year: i32,
    pub prior_year: i32,
    pub dates: Vec<CalendarKey>,
    pub current: Vec<Option<f64>>,
    pub prior: Vec<Option<f64>>,
    pub band_low: Vec<Option<f64>>,
    pub band_high: Vec<Option<f64>>,
    pub band_average: Vec<Option<f64>>,
    pub difference: Vec<Option<f64>>,
    pub percent: Vec<Option<f64>>,
    pub series: Vec<ChartSeries>,
    pub table_columns: Vec<String>,
    pub table_rows: Vec<SeasonalRow>,
}

impl SeasonalBundle {
    pub fn has_band(&self) -> bool {
        self.band_low.iter().chain(&self.band_high).any(Option::is_some)
    }

    /// Table row for a calendar key.
    pub fn row(&self, key: &CalendarKey) -> Option<&SeasonalRow> {
        self.table_rows.iter().find(|r| r.date == *key)
    }
}

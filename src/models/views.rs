use std::collections::BTreeMap;

use serde::Serialize;

use super::chart::ChartSeries;
use super::observation::Observation;

// ---------------------------------------------------------------------------
// StandardView: single location over a date window
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardRow {
    /// 1-based position in the window.
    pub index: usize,
    #[serde(flatten)]
    pub observation: Observation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StandardView {
    pub dates: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub table_columns: Vec<String>,
    pub table_rows: Vec<StandardRow>,
    pub raw_records: Vec<Observation>,
}

// ---------------------------------------------------------------------------
// ComparisonView: several locations on one date axis
// ---------------------------------------------------------------------------

/// Observations for one location, labelled for display.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledDataset {
    pub label: String,
    pub records: Vec<Observation>,
}

impl LabeledDataset {
    pub fn new(label: impl Into<String>, records: Vec<Observation>) -> Self {
        Self {
            label: label.into(),
            records,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub date: String,
    /// Average per dataset label.
    #[serde(flatten)]
    pub values: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonView {
    pub dates: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub table_columns: Vec<String>,
    pub table_rows: Vec<ComparisonRow>,
}

// ---------------------------------------------------------------------------
// SpreadView: difference between two locations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpreadRow {
    pub date: String,
    pub location1: f64,
    pub location2: f64,
    pub spread: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpreadView {
    pub dates: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub table_columns: Vec<String>,
    pub table_rows: Vec<SpreadRow>,
}

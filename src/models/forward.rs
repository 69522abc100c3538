use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ForwardCurve: forwardDatafeed.json payload for one issue date
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForwardMeta {
    #[serde(default)]
    pub trade_date: String,
}

/// Forward curve of one location: parallel arrays indexed by contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationCurve {
    #[serde(rename = "Location", default)]
    pub location: String,
    /// Contract delivery months as `YYYY-MM-DD`; `None` marks padding.
    #[serde(rename = "Contracts", default)]
    pub contracts: Vec<Option<String>>,
    #[serde(rename = "Fixed Prices", default)]
    pub fixed_prices: Vec<Option<f64>>,
    #[serde(rename = "Basis Prices", default)]
    pub basis_prices: Vec<Option<f64>>,
}

impl LocationCurve {
    /// Drop the first `n` contracts from every array.
    pub fn drop_leading(&mut self, n: usize) {
        drain_front(&mut self.contracts, n);
        drain_front(&mut self.fixed_prices, n);
        drain_front(&mut self.basis_prices, n);
    }

    /// Pad every array with `None` up to `len` entries.
    pub fn pad_to(&mut self, len: usize) {
        if self.contracts.len() >= len {
            return;
        }
        let diff = len - self.contracts.len();
        self.contracts.extend(std::iter::repeat(None).take(diff));
        self.fixed_prices.extend(std::iter::repeat(None).take(diff));
        self.basis_prices.extend(std::iter::repeat(None).take(diff));
    }
}

fn drain_front<T>(column: &mut Vec<T>, n: usize) {
    let n = n.min(column.len());
    column.drain(..n);
}

/// Full forward curve publication: one [`LocationCurve`] per location key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForwardCurve {
    #[serde(default)]
    pub meta: ForwardMeta,
    pub data: Option<BTreeMap<String, LocationCurve>>,
}

// ---------------------------------------------------------------------------
// Heatmap comparison output
// ---------------------------------------------------------------------------

/// How the start curve was shifted to line up with the end curve.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignmentInfo {
    pub start_prompt_month: Option<String>,
    pub end_prompt_month: Option<String>,
    pub months_rolled: i32,
    pub removed_months: Vec<String>,
    pub adjusted: bool,
}

/// Change of one contract price between the two issue dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub change: Option<f64>,
    pub start_price: Option<f64>,
    pub end_price: Option<f64>,
}

/// Prompt-month summary for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub location: String,
    pub start_fixed: Option<f64>,
    pub end_fixed: Option<f64>,
    pub fixed_change: Option<f64>,
    pub start_basis: Option<f64>,
    pub end_basis: Option<f64>,
    pub basis_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapMetadata {
    pub start_trade_date: String,
    pub end_trade_date: String,
    pub start_issue_date: String,
    pub end_issue_date: String,
    pub prompt_month: String,
    pub alignment_info: AlignmentInfo,
    pub location_count: usize,
    pub contract_count: usize,
}

/// location -> contract label -> cell
pub type HeatmapGrid = BTreeMap<String, BTreeMap<String, HeatmapCell>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeatmapData {
    pub fixed: HeatmapGrid,
    pub basis: HeatmapGrid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapComparison {
    pub metadata: HeatmapMetadata,
    pub table_data: Vec<HeatmapRow>,
    pub heatmap_data: HeatmapData,
    pub contracts: Vec<String>,
}

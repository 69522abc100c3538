use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use super::observation::{sort_by_trade_date, Observation};

// ---------------------------------------------------------------------------
// ColumnarPrices: NGI daily price payload (columns keyed by row index)
// ---------------------------------------------------------------------------

/// Wire shape of `dailyHistoricalData.json`.
///
/// Each column is an object keyed by the stringified row index
/// (`{"averages": {"0": 2.5, "1": 2.55}, "trade_dates": {"0": "2024-01-01"}}`).
/// Only used at the API boundary; [`into_observations`](Self::into_observations)
/// turns it into typed rows.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColumnarPrices {
    pub averages: Option<HashMap<String, Value>>,
    pub highs: HashMap<String, Value>,
    pub lows: HashMap<String, Value>,
    pub volumes: HashMap<String, Value>,
    pub deals: HashMap<String, Value>,
    pub trade_dates: HashMap<String, Value>,
    pub issue_dates: HashMap<String, Value>,
    pub pointcodes: HashMap<String, Value>,
    pub location_names: HashMap<String, Value>,
    pub region_names: HashMap<String, Value>,
    pub flow_start_dates: HashMap<String, Value>,
    pub flow_end_dates: HashMap<String, Value>,
}

impl ColumnarPrices {
    /// Decode a raw response. Anything that is not a columnar object decodes
    /// to an empty payload.
    pub fn from_value(raw: Value) -> Self {
        match serde_json::from_value(raw) {
            Ok(cols) => cols,
            Err(e) => {
                tracing::warn!("unexpected daily price payload: {}", e);
                Self::default()
            }
        }
    }

    /// Number of rows, taken from the `averages` column.
    pub fn len(&self) -> usize {
        self.averages.as_ref().map(HashMap::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pivot the columns into rows sorted by trade date.
    ///
    /// Numbers are accepted as JSON numbers or numeric strings; anything else
    /// becomes `None`. Missing text fields become empty strings.
    pub fn into_observations(self) -> Vec<Observation> {
        let Some(averages) = &self.averages else {
            return Vec::new();
        };

        let mut records: Vec<Observation> = (0..averages.len())
            .map(|i| {
                let idx = i.to_string();
                Observation {
                    pointcode: text(&self.pointcodes, &idx),
                    issue_date: text(&self.issue_dates, &idx),
                    trade_date: text(&self.trade_dates, &idx),
                    region_name: text(&self.region_names, &idx),
                    location_name: text(&self.location_names, &idx),
                    low: float(&self.lows, &idx),
                    high: float(&self.highs, &idx),
                    average: float(averages, &idx),
                    volume: integer(&self.volumes, &idx),
                    deals: integer(&self.deals, &idx),
                    flow_start_date: optional_text(&self.flow_start_dates, &idx),
                    flow_end_date: optional_text(&self.flow_end_dates, &idx),
                }
            })
            .collect();

        sort_by_trade_date(&mut records);
        records
    }
}

/// Decode a `dailyHistoricalData.json` response straight into observations.
pub fn observations_from_columnar(raw: Value) -> Vec<Observation> {
    ColumnarPrices::from_value(raw).into_observations()
}

fn text(col: &HashMap<String, Value>, idx: &str) -> String {
    match col.get(idx) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

fn optional_text(col: &HashMap<String, Value>, idx: &str) -> Option<String> {
    Some(text(col, idx)).filter(|s| !s.is_empty())
}

fn float(col: &HashMap<String, Value>, idx: &str) -> Option<f64> {
    match col.get(idx)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok().filter(|f: &f64| f.is_finite()),
        _ => None,
    }
}

fn integer(col: &HashMap<String, Value>, idx: &str) -> Option<i64> {
    match col.get(idx)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Observation: one daily price record for a location
// ---------------------------------------------------------------------------

/// A single priced data point as published by NGI.
///
/// Dates are kept as the ISO strings the API returned; they are parsed where
/// calendar arithmetic needs them. Empty flow dates mean "same as trade date".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Observation {
    pub pointcode: String,
    pub issue_date: String,
    pub trade_date: String,
    pub region_name: String,
    pub location_name: String,
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub average: Option<f64>,
    pub volume: Option<i64>,
    pub deals: Option<i64>,
    pub flow_start_date: Option<String>,
    pub flow_end_date: Option<String>,
}

impl Observation {
    /// A bare observation with a trade date and average price.
    pub fn new(trade_date: impl Into<String>, average: Option<f64>) -> Self {
        Self {
            trade_date: trade_date.into(),
            average,
            ..Self::default()
        }
    }

    /// Set the flow range the price applies to.
    pub fn with_flow(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.flow_start_date = Some(start.into());
        self.flow_end_date = Some(end.into());
        self
    }

    pub fn with_location(mut self, pointcode: impl Into<String>, name: impl Into<String>) -> Self {
        self.pointcode = pointcode.into();
        self.location_name = name.into();
        self
    }

    /// Flow start and end, each falling back to the trade date when missing
    /// or empty.
    pub fn flow_bounds(&self) -> (&str, &str) {
        (
            or_trade_date(&self.flow_start_date, &self.trade_date),
            or_trade_date(&self.flow_end_date, &self.trade_date),
        )
    }
}

fn or_trade_date<'a>(flow: &'a Option<String>, trade_date: &'a str) -> &'a str {
    match flow.as_deref() {
        Some(d) if !d.trim().is_empty() => d,
        _ => trade_date,
    }
}

/// Stable sort by trade date, the order every seasonal fold assumes.
pub fn sort_by_trade_date(observations: &mut [Observation]) {
    observations.sort_by(|a, b| a.trade_date.cmp(&b.trade_date));
}

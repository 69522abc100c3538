//! Chart and table payloads for the daily price viewer modes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::NgiError;
use crate::models::{
    ChartSeries, ComparisonRow, ComparisonView, LabeledDataset, Observation, SeasonalBundle,
    SpreadRow, SpreadView, StandardRow, StandardView,
};
use crate::seasonal::{
    aggregate_range, assemble_seasonal_bundle, band_from_years, build_day_lookup, calendar_keys,
};

const PRIMARY_COLOR: &str = "#2563eb";

/// Line colours for compared locations, reused in order.
pub const COMPARISON_PALETTE: [&str; 7] = [
    "#2563eb", "#dc2626", "#16a34a", "#d97706", "#9333ea", "#0891b2", "#be123c",
];

const STANDARD_COLUMNS: [&str; 13] = [
    "Index",
    "Point Code",
    "Issue Date",
    "Trade Date",
    "Region Name",
    "Location Name",
    "Low",
    "High",
    "Average",
    "Volume",
    "Deals",
    "Flow Start Date",
    "Flow End Date",
];

// ---------------------------------------------------------------------------
// ViewMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewMode {
    #[default]
    Standard,
    Seasonality,
    Compare,
    Spreads,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Standard => "standard",
            ViewMode::Seasonality => "seasonality",
            ViewMode::Compare => "compare",
            ViewMode::Spreads => "spreads",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = NgiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(ViewMode::Standard),
            "seasonality" => Ok(ViewMode::Seasonality),
            "compare" => Ok(ViewMode::Compare),
            "spreads" => Ok(ViewMode::Spreads),
            _ => Err(NgiError::InvalidArgument(format!("Unknown mode: {}", s))),
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Single location over a date window: the average line plus every column.
pub fn standard_view(observations: &[Observation]) -> StandardView {
    if observations.is_empty() {
        return StandardView::default();
    }

    let dates = observations.iter().map(|o| o.trade_date.clone()).collect();
    let averages = observations.iter().map(|o| o.average).collect();

    StandardView {
        dates,
        series: vec![ChartSeries::line("Average", averages)
            .color(PRIMARY_COLOR)
            .width(2.5)],
        table_columns: STANDARD_COLUMNS.iter().map(|c| c.to_string()).collect(),
        table_rows: observations
            .iter()
            .enumerate()
            .map(|(i, o)| StandardRow {
                index: i + 1,
                observation: o.clone(),
            })
            .collect(),
        raw_records: observations.to_vec(),
    }
}

/// Several locations on the union of their trade dates.
///
/// Dates a dataset has no observation for are `None`; the lines connect
/// across them.
pub fn comparison_view(datasets: &[LabeledDataset]) -> ComparisonView {
    if datasets.is_empty() {
        return ComparisonView::default();
    }

    let labels: Vec<String> = datasets
        .iter()
        .map(|ds| {
            if ds.label.is_empty() {
                "Location".to_string()
            } else {
                ds.label.clone()
            }
        })
        .collect();

    // trade date -> label -> average
    let mut by_date: BTreeMap<&str, BTreeMap<&str, Option<f64>>> = BTreeMap::new();
    for (ds, label) in datasets.iter().zip(&labels) {
        for obs in ds.records.iter().filter(|o| !o.trade_date.is_empty()) {
            by_date
                .entry(obs.trade_date.as_str())
                .or_default()
                .insert(label.as_str(), obs.average);
        }
    }

    let value = |date: &str, label: &str| {
        by_date
            .get(date)
            .and_then(|m| m.get(label).copied().flatten())
    };

    let series = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let data = by_date.keys().map(|d| value(d, label)).collect();
            ChartSeries::line(label.clone(), data)
                .color(COMPARISON_PALETTE[i % COMPARISON_PALETTE.len()])
                .width(2.0)
                .connect_nulls()
        })
        .collect();

    let table_rows = by_date
        .keys()
        .map(|d| ComparisonRow {
            date: d.to_string(),
            values: labels.iter().map(|l| (l.clone(), value(d, l))).collect(),
        })
        .collect();

    let mut table_columns = vec!["Date".to_string()];
    table_columns.extend(labels.iter().cloned());

    ComparisonView {
        dates: by_date.keys().map(|d| d.to_string()).collect(),
        series,
        table_columns,
        table_rows,
    }
}

/// Daily spread `first - second` on the trade dates both locations priced.
pub fn spread_view(
    first: &[Observation],
    second: &[Observation],
    first_code: &str,
    second_code: &str,
) -> SpreadView {
    if first.is_empty() || second.is_empty() {
        return SpreadView::default();
    }

    fn priced(records: &[Observation]) -> BTreeMap<&str, f64> {
        records
            .iter()
            .filter_map(|o| o.average.map(|avg| (o.trade_date.as_str(), avg)))
            .collect()
    }
    let prices1 = priced(first);
    let prices2 = priced(second);

    let table_rows: Vec<SpreadRow> = prices1
        .iter()
        .filter_map(|(date, &p1)| {
            prices2.get(date).map(|&p2| SpreadRow {
                date: date.to_string(),
                location1: p1,
                location2: p2,
                spread: p1 - p2,
            })
        })
        .collect();

    tracing::debug!(
        "{} common trade dates for {} - {}",
        table_rows.len(),
        first_code,
        second_code
    );

    SpreadView {
        dates: table_rows.iter().map(|r| r.date.clone()).collect(),
        series: vec![ChartSeries::line(
            format!("{} - {}", first_code, second_code),
            table_rows.iter().map(|r| Some(r.spread)).collect(),
        )
        .color(PRIMARY_COLOR)
        .width(3.0)],
        table_columns: vec![
            "Date".to_string(),
            first_code.to_string(),
            second_code.to_string(),
            "Spread".to_string(),
        ],
        table_rows,
    }
}

/// Seasonal comparison from raw observation lists.
///
/// `history` holds the prior seasons by year; an empty map gives a bundle
/// without a band.
pub fn seasonal_view(
    current: &[Observation],
    prior: &[Observation],
    history: &BTreeMap<i32, Vec<Observation>>,
    year: i32,
) -> SeasonalBundle {
    let current_lookup = build_day_lookup(current);
    let prior_lookup = build_day_lookup(prior);

    let band = band_from_years(history);
    let range = if band.is_empty() {
        None
    } else {
        Some(aggregate_range(&band, calendar_keys()))
    };

    assemble_seasonal_bundle(&current_lookup, &prior_lookup, range.as_ref(), year)
}

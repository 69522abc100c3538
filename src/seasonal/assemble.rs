//! Assembling lookups and bands into the seasonal chart/table bundle.

use super::calendar::calendar_keys;
use super::lookup::DayLookup;
use super::range::RangeBounds;
use crate::format::round_to;
use crate::models::{ChartSeries, SeasonalBundle, SeasonalRow};

const CURRENT_COLOR: &str = "#2563eb";
const PRIOR_COLOR: &str = "#9ca3af";
const BAND_COLOR: &str = "rgba(70, 130, 180, 0.3)";
const BAND_AVERAGE_COLOR: &str = "rgba(70, 130, 180, 0.8)";
const BAND_STACK: &str = "range";

/// Year-over-year change for one day.
///
/// Both values must be present and `prior` non-zero; otherwise there is no
/// change to report. The difference is rounded to 4 places and the percent,
/// computed from the rounded difference, to 2.
pub fn day_change(current: Option<f64>, prior: Option<f64>) -> (Option<f64>, Option<f64>) {
    match (current, prior) {
        (Some(curr), Some(prev)) if prev != 0.0 => {
            let diff = round_to(curr - prev, 4);
            let pct = round_to(diff / prev * 100.0, 2);
            (Some(diff), Some(pct))
        }
        _ => (None, None),
    }
}

/// Merge the current season, prior season and optional band into a
/// [`SeasonalBundle`] over the 365 calendar keys.
///
/// Missing days stay `None`; nothing is interpolated. Band arrays whose length
/// does not match the calendar are ignored.
pub fn assemble_seasonal_bundle(
    current: &DayLookup,
    prior: &DayLookup,
    range: Option<&RangeBounds>,
    year: i32,
) -> SeasonalBundle {
    let keys = calendar_keys();
    let prior_year = year.saturating_sub(1);

    let band = match range {
        Some(r) if r.len() == keys.len() => r.clone(),
        Some(r) => {
            tracing::warn!(
                "ignoring range bounds of length {} (expected {})",
                r.len(),
                keys.len()
            );
            RangeBounds::empty(keys.len())
        }
        None => RangeBounds::empty(keys.len()),
    };

    let current_values: Vec<Option<f64>> = keys.iter().map(|k| current.get(k)).collect();
    let prior_values: Vec<Option<f64>> = keys.iter().map(|k| prior.get(k)).collect();

    let (difference, percent): (Vec<_>, Vec<_>) = current_values
        .iter()
        .zip(&prior_values)
        .map(|(c, p)| day_change(*c, *p))
        .unzip();

    let mut series = Vec::new();
    if band.has_values() {
        let spread: Vec<Option<f64>> = band
            .min
            .iter()
            .zip(&band.max)
            .map(|(lo, hi)| match (lo, hi) {
                (Some(lo), Some(hi)) => Some(hi - lo),
                _ => None,
            })
            .collect();

        // Invisible base plus the stacked spread draws the band between min and max.
        series.push(
            ChartSeries::line("", band.min.clone())
                .hidden_line()
                .stacked(BAND_STACK)
                .silent()
                .z(0),
        );
        series.push(
            ChartSeries::line("5-Year Range", spread)
                .hidden_line()
                .area(BAND_COLOR)
                .stacked(BAND_STACK)
                .z(1),
        );
        series.push(
            ChartSeries::line("5-Year Average", band.average.clone())
                .color(BAND_AVERAGE_COLOR)
                .width(1.5)
                .dashed()
                .z(2),
        );
    }
    series.push(
        ChartSeries::line(year.to_string(), current_values.clone())
            .color(CURRENT_COLOR)
            .width(3.0)
            .z(10),
    );
    series.push(
        ChartSeries::line(prior_year.to_string(), prior_values.clone())
            .color(PRIOR_COLOR)
            .width(2.0)
            .dashed()
            .z(10),
    );

    let table_rows = keys
        .iter()
        .enumerate()
        .map(|(i, key)| SeasonalRow {
            date: *key,
            curr: current_values[i],
            prev: prior_values[i],
            high: band.max[i],
            low: band.min[i],
            diff: difference[i],
            pct: percent[i],
        })
        .collect();

    SeasonalBundle {
        year,
        prior_year,
        dates: keys.to_vec(),
        current: current_values,
        prior: prior_values,
        band_low: band.min,
        band_high: band.max,
        band_average: band.average,
        difference,
        percent,
        series,
        table_columns: vec![
            "Date (MM-DD)".to_string(),
            format!("{} Price", year),
            format!("{} Price", prior_year),
            "5-Year High".to_string(),
            "5-Year Low".to_string(),
            "Diff ($)".to_string(),
            "Diff (%)".to_string(),
        ],
        table_rows,
    }
}

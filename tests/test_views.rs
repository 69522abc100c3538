//! Standard, compare, spreads and seasonality payload builders.

mod common;

use common::{flat_history, key, obs};
use ngi_sdk::models::{LabeledDataset, Observation};
use ngi_sdk::views::{
    comparison_view, seasonal_view, spread_view, standard_view, ViewMode, COMPARISON_PALETTE,
};
use ngi_sdk::NgiError;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// ViewMode
// ---------------------------------------------------------------------------

#[test]
fn view_mode_parses_case_insensitively() {
    assert_eq!("standard".parse::<ViewMode>().unwrap(), ViewMode::Standard);
    assert_eq!("Seasonality".parse::<ViewMode>().unwrap(), ViewMode::Seasonality);
    assert_eq!(" COMPARE ".parse::<ViewMode>().unwrap(), ViewMode::Compare);
    assert_eq!("spreads".parse::<ViewMode>().unwrap(), ViewMode::Spreads);
    assert_eq!(ViewMode::default(), ViewMode::Standard);
    assert_eq!(ViewMode::Spreads.to_string(), "spreads");
}

#[test]
fn unknown_view_mode_is_invalid_argument() {
    let err = "heatmap".parse::<ViewMode>().unwrap_err();
    assert!(matches!(err, NgiError::InvalidArgument(msg) if msg.contains("heatmap")));
}

// ---------------------------------------------------------------------------
// standard_view
// ---------------------------------------------------------------------------

#[test]
fn standard_view_indexes_rows_from_one() {
    let records = vec![obs("2024-01-02", 2.5), obs("2024-01-03", 2.6)];
    let view = standard_view(&records);

    assert_eq!(view.dates, vec!["2024-01-02", "2024-01-03"]);
    assert_eq!(view.series.len(), 1);
    assert_eq!(view.series[0].name, "Average");
    assert_eq!(view.series[0].data, vec![Some(2.5), Some(2.6)]);
    assert_eq!(view.table_columns.len(), 13);
    assert_eq!(view.table_columns[0], "Index");
    assert_eq!(view.table_rows[0].index, 1);
    assert_eq!(view.table_rows[1].index, 2);
    assert_eq!(view.raw_records, records);
}

#[test]
fn standard_row_flattens_observation() {
    let view = standard_view(&[obs("2024-01-02", 2.5).with_location("SLAHH", "Henry Hub")]);
    let row = serde_json::to_value(&view.table_rows[0]).unwrap();
    assert_eq!(row["index"], 1);
    assert_eq!(row["pointcode"], "SLAHH");
    assert_eq!(row["trade_date"], "2024-01-02");
    assert_eq!(row["average"], 2.5);
}

#[test]
fn standard_view_of_nothing_is_empty() {
    let view = standard_view(&[]);
    assert!(view.dates.is_empty());
    assert!(view.series.is_empty());
    assert!(view.table_columns.is_empty());
}

// ---------------------------------------------------------------------------
// comparison_view
// ---------------------------------------------------------------------------

#[test]
fn comparison_uses_union_of_dates() {
    let datasets = vec![
        LabeledDataset::new("Henry Hub", vec![obs("2024-01-02", 2.5), obs("2024-01-03", 2.6)]),
        LabeledDataset::new("Waha", vec![obs("2024-01-03", 1.1), obs("2024-01-04", 1.2)]),
    ];
    let view = comparison_view(&datasets);

    assert_eq!(view.dates, vec!["2024-01-02", "2024-01-03", "2024-01-04"]);
    assert_eq!(view.table_columns, vec!["Date", "Henry Hub", "Waha"]);
    assert_eq!(view.series[0].data, vec![Some(2.5), Some(2.6), None]);
    assert_eq!(view.series[1].data, vec![None, Some(1.1), Some(1.2)]);
    assert!(view.series.iter().all(|s| s.connect_nulls));

    let row = &view.table_rows[0];
    assert_eq!(row.date, "2024-01-02");
    assert_eq!(row.values["Henry Hub"], Some(2.5));
    assert_eq!(row.values["Waha"], None);
}

#[test]
fn comparison_palette_cycles() {
    let datasets: Vec<LabeledDataset> = (0..9)
        .map(|i| LabeledDataset::new(format!("L{i}"), vec![obs("2024-01-02", i as f64)]))
        .collect();
    let view = comparison_view(&datasets);
    assert_eq!(view.series[0].color.as_deref(), Some(COMPARISON_PALETTE[0]));
    assert_eq!(view.series[7].color.as_deref(), Some(COMPARISON_PALETTE[0]));
    assert_eq!(view.series[8].color.as_deref(), Some(COMPARISON_PALETTE[1]));
}

#[test]
fn comparison_row_serializes_labels_as_columns() {
    let view = comparison_view(&[LabeledDataset::new("", vec![obs("2024-01-02", 2.5)])]);
    let row = serde_json::to_value(&view.table_rows[0]).unwrap();
    assert_eq!(row["date"], "2024-01-02");
    assert_eq!(row["Location"], 2.5);
}

#[test]
fn comparison_of_nothing_is_empty() {
    assert!(comparison_view(&[]).series.is_empty());
}

// ---------------------------------------------------------------------------
// spread_view
// ---------------------------------------------------------------------------

#[test]
fn spread_uses_common_priced_dates() {
    let hub = vec![obs("2024-01-02", 2.5), obs("2024-01-03", 2.6), obs("2024-01-04", 2.7)];
    let waha = vec![
        obs("2024-01-03", 1.1),
        Observation::new("2024-01-04", None),
        obs("2024-01-05", 1.3),
    ];
    let view = spread_view(&hub, &waha, "SLAHH", "WTXWAHA");

    assert_eq!(view.dates, vec!["2024-01-03"]);
    assert_eq!(view.series[0].name, "SLAHH - WTXWAHA");
    assert_eq!(view.table_columns, vec!["Date", "SLAHH", "WTXWAHA", "Spread"]);
    let row = &view.table_rows[0];
    assert_eq!(row.location1, 2.6);
    assert_eq!(row.location2, 1.1);
    assert!((row.spread - 1.5).abs() < 1e-12);
}

#[test]
fn spread_with_an_empty_side_is_empty() {
    let view = spread_view(&[obs("2024-01-02", 2.5)], &[], "A", "B");
    assert!(view.dates.is_empty());
    assert!(view.series.is_empty());
}

// ---------------------------------------------------------------------------
// seasonal_view
// ---------------------------------------------------------------------------

#[test]
fn seasonal_view_without_history_has_no_band() {
    let bundle = seasonal_view(
        &[obs("2024-06-01", 5.0)],
        &[obs("2023-06-01", 4.0)],
        &BTreeMap::new(),
        2024,
    );
    assert!(!bundle.has_band());
    let row = bundle.row(&key("06-01")).unwrap();
    assert_eq!((row.diff, row.pct), (Some(1.0), Some(25.0)));
}

#[test]
fn seasonal_view_with_history_has_band() {
    let history = flat_history(&[(2019, 1.0), (2020, 3.0), (2021, 2.0), (2022, 4.0), (2023, 5.0)]);
    let bundle = seasonal_view(&common::season(2024, 2.0), &history[&2023], &history, 2024);

    assert!(bundle.has_band());
    let row = bundle.row(&key("02-01")).unwrap();
    assert_eq!(row.low, Some(1.0));
    assert_eq!(row.high, Some(5.0));
    assert_eq!(bundle.band_average[0], Some(3.0));
}

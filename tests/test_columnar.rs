//! Decoding of the columnar daily price payload.

mod common;

use ngi_sdk::models::{observations_from_columnar, ColumnarPrices, Observation};
use serde_json::json;

#[test]
fn decodes_every_column() {
    let raw = json!({
        "averages": {"0": 2.5},
        "highs": {"0": 2.7},
        "lows": {"0": "2.3"},
        "volumes": {"0": 1200},
        "deals": {"0": "15"},
        "trade_dates": {"0": "2024-01-05"},
        "issue_dates": {"0": "2024-01-05"},
        "pointcodes": {"0": "SLAHH"},
        "location_names": {"0": "Henry Hub"},
        "region_names": {"0": "South Louisiana"},
        "flow_start_dates": {"0": "2024-01-06"},
        "flow_end_dates": {"0": "2024-01-08"}
    });
    let records = observations_from_columnar(raw);
    assert_eq!(records.len(), 1);

    let o = &records[0];
    assert_eq!(o.pointcode, "SLAHH");
    assert_eq!(o.location_name, "Henry Hub");
    assert_eq!(o.region_name, "South Louisiana");
    assert_eq!(o.average, Some(2.5));
    assert_eq!(o.high, Some(2.7));
    assert_eq!(o.low, Some(2.3));
    assert_eq!(o.volume, Some(1200));
    assert_eq!(o.deals, Some(15));
    assert_eq!(o.flow_start_date.as_deref(), Some("2024-01-06"));
    assert_eq!(o.flow_end_date.as_deref(), Some("2024-01-08"));
}

#[test]
fn rows_are_sorted_by_trade_date() {
    let raw = json!({
        "averages": {"0": 3.0, "1": 1.0, "2": 2.0},
        "trade_dates": {"0": "2024-01-03", "1": "2024-01-01", "2": "2024-01-02"}
    });
    let dates: Vec<String> = observations_from_columnar(raw)
        .into_iter()
        .map(|o| o.trade_date)
        .collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
}

#[test]
fn same_trade_date_keeps_payload_order() {
    let raw = json!({
        "averages": {"0": 1.0, "1": 2.0},
        "trade_dates": {"0": "2024-01-01", "1": "2024-01-01"}
    });
    let prices: Vec<Option<f64>> = observations_from_columnar(raw)
        .iter()
        .map(|o| o.average)
        .collect();
    assert_eq!(prices, vec![Some(1.0), Some(2.0)]);
}

#[test]
fn odd_values_become_none_or_empty() {
    let raw = json!({
        "averages": {"0": null, "1": "n/a", "2": true},
        "trade_dates": {"0": "2024-01-01", "1": "2024-01-02"},
        "flow_start_dates": {"0": ""}
    });
    let records = observations_from_columnar(raw);
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|o| o.average.is_none()));
    // Row 2 has no trade date and sorts first.
    assert_eq!(records[0].trade_date, "");
    assert!(records.iter().all(|o| o.flow_start_date.is_none()));
}

#[test]
fn payload_without_averages_is_empty() {
    let cols = ColumnarPrices::from_value(json!({"trade_dates": {"0": "2024-01-01"}}));
    assert!(cols.is_empty());
    assert!(cols.into_observations().is_empty());
}

#[test]
fn non_object_payload_is_empty() {
    assert!(observations_from_columnar(json!([1, 2, 3])).is_empty());
    assert!(observations_from_columnar(json!(null)).is_empty());
}

#[test]
fn fixture_payload_decodes_back() {
    let records: Vec<Observation> = common::season(2023, 2.0).into_iter().take(10).collect();
    let decoded = observations_from_columnar(common::columnar_payload(&records));
    assert_eq!(decoded, records);
}

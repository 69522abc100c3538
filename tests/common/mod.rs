//! Shared test fixtures for the NGI SDK integration tests.
//!
//! Builders for observations, whole seasons, columnar API payloads and
//! forward curves, plus a history store on a temporary DuckDB file.

#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use ngi_sdk::models::{ForwardCurve, ForwardMeta, LocationCurve, Observation};
use ngi_sdk::seasonal::CalendarKey;
use ngi_sdk::Connection;
use serde_json::{json, Value};

/// Parse an `MM-DD` key, panicking on bad input.
pub fn key(s: &str) -> CalendarKey {
    s.parse().unwrap()
}

/// A single-day observation priced on its trade date.
pub fn obs(trade_date: &str, average: f64) -> Observation {
    Observation::new(trade_date, Some(average))
}

/// An observation whose price covers a flow range.
pub fn flow_obs(trade_date: &str, start: &str, end: &str, average: f64) -> Observation {
    Observation::new(trade_date, Some(average)).with_flow(start, end)
}

/// One observation per day of `year`, priced `base + day_of_year / 100`.
pub fn season(year: i32, base: f64) -> Vec<Observation> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
    let mut out = Vec::new();
    let mut day = first;
    let mut i = 0.0;
    while day.year() == year {
        out.push(
            Observation::new(day.format("%Y-%m-%d").to_string(), Some(base + i / 100.0))
                .with_location("SLAHH", "Henry Hub"),
        );
        day += Duration::days(1);
        i += 1.0;
    }
    out
}

/// A flat season: every day of `year` priced `price`.
pub fn flat_season(year: i32, price: f64) -> Vec<Observation> {
    season(year, 0.0)
        .into_iter()
        .map(|mut o| {
            o.average = Some(price);
            o
        })
        .collect()
}

/// History map of flat seasons, `(year, price)`.
pub fn flat_history(years: &[(i32, f64)]) -> BTreeMap<i32, Vec<Observation>> {
    years
        .iter()
        .map(|&(year, price)| (year, flat_season(year, price)))
        .collect()
}

/// Columnar `dailyHistoricalData.json` payload for the given observations,
/// in the given order.
pub fn columnar_payload(records: &[Observation]) -> Value {
    fn column<F: Fn(&Observation) -> Value>(records: &[Observation], f: F) -> Value {
        Value::Object(
            records
                .iter()
                .enumerate()
                .map(|(i, o)| (i.to_string(), f(o)))
                .collect(),
        )
    }

    json!({
        "averages": column(records, |o| json!(o.average)),
        "highs": column(records, |o| json!(o.high)),
        "lows": column(records, |o| json!(o.low)),
        "volumes": column(records, |o| json!(o.volume)),
        "deals": column(records, |o| json!(o.deals)),
        "trade_dates": column(records, |o| json!(o.trade_date)),
        "issue_dates": column(records, |o| json!(o.issue_date)),
        "pointcodes": column(records, |o| json!(o.pointcode)),
        "location_names": column(records, |o| json!(o.location_name)),
        "region_names": column(records, |o| json!(o.region_name)),
        "flow_start_dates": column(records, |o| json!(o.flow_start_date)),
        "flow_end_dates": column(records, |o| json!(o.flow_end_date)),
    })
}

/// A location curve over consecutive months starting at `first_month`
/// (`YYYY-MM`), with fixed prices `fixed` and basis `basis_offset - fixed`.
pub fn location_curve(
    name: &str,
    first_month: &str,
    fixed: &[f64],
    basis_offset: f64,
) -> LocationCurve {
    let (year, month) = first_month.split_once('-').unwrap();
    let year: i32 = year.parse().unwrap();
    let month: i32 = month.parse().unwrap();
    let contracts = (0..fixed.len() as i32)
        .map(|i| {
            let m = month - 1 + i;
            Some(format!("{:04}-{:02}-01", year + m / 12, m % 12 + 1))
        })
        .collect();
    LocationCurve {
        location: name.to_string(),
        contracts,
        fixed_prices: fixed.iter().map(|&p| Some(p)).collect(),
        basis_prices: fixed.iter().map(|&p| Some(basis_offset - p)).collect(),
    }
}

/// A forward curve publication from `(key, curve)` pairs.
pub fn forward_curve(trade_date: &str, locations: Vec<(&str, LocationCurve)>) -> ForwardCurve {
    ForwardCurve {
        meta: ForwardMeta {
            trade_date: trade_date.to_string(),
        },
        data: Some(
            locations
                .into_iter()
                .map(|(k, c)| (k.to_string(), c))
                .collect(),
        ),
    }
}

/// Single-location Henry Hub curve with zero basis.
pub fn henry_hub(trade_date: &str, first_month: &str, fixed: &[f64]) -> ForwardCurve {
    forward_curve(
        trade_date,
        vec![("hh", location_curve("Henry Hub", first_month, fixed, 0.0))],
    )
}

/// A history store on a temporary DuckDB file.
///
/// Returns `(Connection, tempfile::TempDir)`. The caller must keep the
/// `TempDir` alive for the duration of the test.
pub fn setup_history_db() -> (Connection, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let conn = Connection::open(tmp_dir.path().join("history").join("price_data.duckdb")).unwrap();
    (conn, tmp_dir)
}

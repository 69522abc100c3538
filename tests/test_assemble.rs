//! Seasonal bundle assembly: aligned arrays, chart series and table rows.

mod common;

use common::{flat_history, key, obs};
use ngi_sdk::seasonal::{
    aggregate_range, assemble_seasonal_bundle, band_from_years, build_day_lookup, calendar_keys,
    day_change, DayLookup, RangeBounds,
};

fn lookup_of(date: &str, price: f64) -> DayLookup {
    build_day_lookup(&[obs(date, price)])
}

// ---------------------------------------------------------------------------
// day_change
// ---------------------------------------------------------------------------

#[test]
fn change_from_four_to_five_is_one_dollar_and_25_percent() {
    assert_eq!(day_change(Some(5.0), Some(4.0)), (Some(1.0), Some(25.0)));
}

#[test]
fn zero_prior_has_no_change() {
    assert_eq!(day_change(Some(5.0), Some(0.0)), (None, None));
}

#[test]
fn missing_side_has_no_change() {
    assert_eq!(day_change(None, Some(4.0)), (None, None));
    assert_eq!(day_change(Some(4.0), None), (None, None));
}

#[test]
fn change_is_rounded() {
    let (diff, pct) = day_change(Some(2.123456), Some(3.0));
    assert_eq!(diff, Some(-0.8765));
    assert_eq!(pct, Some(-29.22));
}

// ---------------------------------------------------------------------------
// assemble_seasonal_bundle
// ---------------------------------------------------------------------------

#[test]
fn row_for_june_first_carries_diff_and_pct() {
    let bundle = assemble_seasonal_bundle(
        &lookup_of("2024-06-01", 5.0),
        &lookup_of("2023-06-01", 4.0),
        None,
        2024,
    );
    let row = bundle.row(&key("06-01")).unwrap();
    assert_eq!(row.curr, Some(5.0));
    assert_eq!(row.prev, Some(4.0));
    assert_eq!(row.diff, Some(1.0));
    assert_eq!(row.pct, Some(25.0));

    let other = bundle.row(&key("06-02")).unwrap();
    assert_eq!(other.curr, None);
    assert_eq!(other.diff, None);
}

#[test]
fn zero_prior_row_has_null_change() {
    let bundle = assemble_seasonal_bundle(
        &lookup_of("2024-06-01", 5.0),
        &lookup_of("2023-06-01", 0.0),
        None,
        2024,
    );
    let row = bundle.row(&key("06-01")).unwrap();
    assert_eq!(row.prev, Some(0.0));
    assert_eq!(row.diff, None);
    assert_eq!(row.pct, None);
}

#[test]
fn every_array_and_the_table_are_aligned() {
    let bundle = assemble_seasonal_bundle(
        &build_day_lookup(&common::season(2024, 2.0)),
        &build_day_lookup(&common::season(2023, 2.5)),
        None,
        2024,
    );
    assert_eq!(bundle.dates, calendar_keys());
    for len in [
        bundle.current.len(),
        bundle.prior.len(),
        bundle.band_low.len(),
        bundle.band_high.len(),
        bundle.band_average.len(),
        bundle.difference.len(),
        bundle.percent.len(),
        bundle.table_rows.len(),
    ] {
        assert_eq!(len, 365);
    }
    for (row, date) in bundle.table_rows.iter().zip(&bundle.dates) {
        assert_eq!(row.date, *date);
    }
    for s in &bundle.series {
        assert_eq!(s.data.len(), 365);
    }
}

#[test]
fn missing_days_stay_null() {
    let current = lookup_of("2024-01-01", 2.0);
    let bundle = assemble_seasonal_bundle(&current, &DayLookup::new(), None, 2024);
    assert_eq!(bundle.current.iter().flatten().count(), 1);
    assert!(bundle.prior.iter().all(Option::is_none));
}

#[test]
fn without_band_only_year_series_are_present() {
    let current = lookup_of("2024-01-01", 2.0);
    let bundle = assemble_seasonal_bundle(&current, &DayLookup::new(), None, 2024);
    let names: Vec<&str> = bundle.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["2024", "2023"]);
    assert!(!bundle.has_band());
}

#[test]
fn all_null_band_adds_no_band_series() {
    let empty = RangeBounds::empty(365);
    let bundle = assemble_seasonal_bundle(&DayLookup::new(), &DayLookup::new(), Some(&empty), 2024);
    assert_eq!(bundle.series.len(), 2);
}

#[test]
fn band_adds_stacked_base_and_range_series() {
    let band = band_from_years(&flat_history(&[(2021, 2.0), (2022, 5.0)]));
    let bounds = aggregate_range(&band, calendar_keys());
    let empty = DayLookup::new();
    let bundle = assemble_seasonal_bundle(&empty, &empty, Some(&bounds), 2024);

    assert!(bundle.has_band());
    let names: Vec<&str> = bundle.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["", "5-Year Range", "5-Year Average", "2024", "2023"]);

    let base = &bundle.series[0];
    assert!(base.hidden_line);
    assert_eq!(base.stack.as_deref(), Some("range"));
    assert_eq!(base.data[0], Some(2.0));

    let range = &bundle.series[1];
    assert_eq!(range.stack.as_deref(), Some("range"));
    assert!(range.area_color.is_some());
    assert_eq!(range.data[0], Some(3.0));

    assert_eq!(bundle.series[2].data[100], Some(3.5));

    let row = bundle.row(&key("07-04")).unwrap();
    assert_eq!(row.high, Some(5.0));
    assert_eq!(row.low, Some(2.0));
}

#[test]
fn misaligned_band_is_ignored() {
    let short = RangeBounds {
        min: vec![Some(1.0)],
        max: vec![Some(2.0)],
        average: vec![Some(1.5)],
    };
    let bundle = assemble_seasonal_bundle(&DayLookup::new(), &DayLookup::new(), Some(&short), 2024);
    assert!(!bundle.has_band());
    assert_eq!(bundle.band_low.len(), 365);
}

#[test]
fn table_columns_name_both_years() {
    let bundle = assemble_seasonal_bundle(&DayLookup::new(), &DayLookup::new(), None, 2025);
    assert_eq!(
        bundle.table_columns,
        vec![
            "Date (MM-DD)",
            "2025 Price",
            "2024 Price",
            "5-Year High",
            "5-Year Low",
            "Diff ($)",
            "Diff (%)"
        ]
    );
    assert_eq!(bundle.prior_year, 2024);
}

#[test]
fn bundle_serializes_to_json() {
    let bundle = assemble_seasonal_bundle(
        &lookup_of("2024-06-01", 5.0),
        &lookup_of("2023-06-01", 4.0),
        None,
        2024,
    );
    let value = serde_json::to_value(&bundle).unwrap();
    assert_eq!(value["dates"][0], "01-01");
    assert_eq!(value["series"][0]["name"], "2024");
    assert_eq!(value["series"][0]["type"], "line");
    assert_eq!(value["series"][1]["dashed"], true);
    assert!(value["series"][0].get("dashed").is_none());

    let june = key("06-01").ordinal();
    assert_eq!(value["table_rows"][june]["date"], "06-01");
    assert_eq!(value["table_rows"][june]["pct"], 25.0);
    assert!(value["table_rows"][0]["curr"].is_null());
}

#[test]
fn extreme_year_does_not_overflow() {
    let empty = DayLookup::new();
    let bundle = assemble_seasonal_bundle(&empty, &empty, None, i32::MIN);
    assert_eq!(bundle.year, i32::MIN);
    assert_eq!(bundle.prior_year, i32::MIN);
    assert_eq!(bundle.dates.len(), 365);
}

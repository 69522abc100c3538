//! Unit tests for the SqlBuilder query construction.

use ngi_sdk::SqlBuilder;

// ---------------------------------------------------------------------------
// Basic construction
// ---------------------------------------------------------------------------

#[test]
fn new_creates_select_star_from_table() {
    let (sql, params) = SqlBuilder::new("price_data").build();
    assert_eq!(sql, "SELECT *\nFROM price_data");
    assert!(params.is_empty());
}

#[test]
fn select_replaces_default_star() {
    let (sql, _) = SqlBuilder::new("price_data")
        .select(&["trade_date", "average"])
        .build();
    assert!(sql.starts_with("SELECT trade_date, average\n"));
}

#[test]
fn distinct_is_applied_to_select() {
    let (sql, _) = SqlBuilder::new("price_data")
        .select(&["point_code"])
        .distinct()
        .build();
    assert!(sql.starts_with("SELECT DISTINCT point_code\n"));
}

// ---------------------------------------------------------------------------
// WHERE conditions
// ---------------------------------------------------------------------------

#[test]
fn where_eq_adds_equality_with_param() {
    let (sql, params) = SqlBuilder::new("price_data")
        .where_eq("point_code", "SLAHH")
        .build();
    assert!(sql.contains("WHERE point_code = ?"));
    assert_eq!(params, vec!["SLAHH"]);
}

#[test]
fn date_bounds_are_joined_with_and() {
    let (sql, params) = SqlBuilder::new("price_data")
        .where_eq("point_code", "SLAHH")
        .where_gte("trade_date", "2024-01-01")
        .where_lte("trade_date", "2024-12-31")
        .build();
    assert!(sql.contains("WHERE point_code = ? AND trade_date >= ? AND trade_date <= ?"));
    assert_eq!(params, vec!["SLAHH", "2024-01-01", "2024-12-31"]);
}

#[test]
fn raw_where_clause_keeps_param_order() {
    let (sql, params) = SqlBuilder::new("price_data")
        .where_clause("trade_date BETWEEN ? AND ?", &["2023-01-01", "2023-12-31"])
        .build();
    assert!(sql.contains("WHERE trade_date BETWEEN ? AND ?"));
    assert_eq!(params, vec!["2023-01-01", "2023-12-31"]);
}

// ---------------------------------------------------------------------------
// ORDER BY / LIMIT
// ---------------------------------------------------------------------------

#[test]
fn clauses_appear_in_sql_order() {
    let (sql, _) = SqlBuilder::new("price_data")
        .where_gte("trade_date", "2020-01-01")
        .order_by(&["trade_date ASC", "flow_start_date ASC"])
        .limit(5)
        .build();

    let where_at = sql.find("WHERE trade_date >= ?").unwrap();
    let order_at = sql.find("ORDER BY trade_date ASC, flow_start_date ASC").unwrap();
    let limit_at = sql.find("LIMIT 5").unwrap();
    assert!(where_at < order_at && order_at < limit_at);
}

#[test]
fn values_are_never_interpolated() {
    let (sql, params) = SqlBuilder::new("price_data")
        .where_eq("point_code", "x'; DROP TABLE price_data; --")
        .build();
    assert!(!sql.contains("DROP TABLE"));
    assert_eq!(params.len(), 1);
}

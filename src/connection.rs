//! DuckDB connection wrapper for the local price history store.
//!
//! Owns the database handle, creates the history schema on first use, and
//! converts result rows to `serde_json` values so query modules can
//! deserialize them into models.

use crate::error::{NgiError, Result};
use duckdb::{types::ValueRef, Connection as DuckDbConnection, ToSql};
use serde::de::DeserializeOwned;
use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Tables backing the price history store.
///
/// Dates are stored as ISO strings. Missing flow dates are stored as `''` so
/// they take part in the uniqueness constraint.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS locations (
    location_code VARCHAR PRIMARY KEY,
    location_name VARCHAR NOT NULL,
    region_name VARCHAR NOT NULL,
    created_at TIMESTAMP DEFAULT current_timestamp
);
CREATE TABLE IF NOT EXISTS price_data (
    point_code VARCHAR NOT NULL,
    issue_date VARCHAR,
    trade_date VARCHAR NOT NULL,
    region_name VARCHAR,
    location_name VARCHAR,
    low DOUBLE,
    high DOUBLE,
    average DOUBLE,
    volume BIGINT,
    deals BIGINT,
    flow_start_date VARCHAR NOT NULL DEFAULT '',
    flow_end_date VARCHAR NOT NULL DEFAULT '',
    created_at TIMESTAMP DEFAULT current_timestamp,
    UNIQUE (point_code, trade_date, flow_start_date, flow_end_date)
);
CREATE INDEX IF NOT EXISTS idx_price_data_trade_date ON price_data (trade_date);
";

/// Wraps a DuckDB connection holding the price history tables.
pub struct Connection {
    conn: DuckDbConnection,
    path: Option<PathBuf>,
    schema_ready: Cell<bool>,
}

impl Connection {
    /// Open an in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: DuckDbConnection::open_in_memory()?,
            path: None,
            schema_ready: Cell::new(false),
        })
    }

    /// Open (or create) a database file, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            conn: DuckDbConnection::open(path)?,
            path: Some(path.to_path_buf()),
            schema_ready: Cell::new(false),
        })
    }

    /// Database file, or `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create the history tables if this connection has not done so yet.
    pub fn ensure_schema(&self) -> Result<()> {
        if self.schema_ready.get() {
            return Ok(());
        }
        self.conn.execute_batch(SCHEMA)?;
        self.schema_ready.set(true);
        tracing::debug!(
            "Price history schema ready ({})",
            self.path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| ":memory:".to_string())
        );
        Ok(())
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the query has run.
        let (column_names, column_count) = {
            let stmt = rows_result
                .as_ref()
                .ok_or_else(|| NgiError::InvalidArgument("statement has no result".into()))?;
            let names: Vec<String> = stmt
                .column_names()
                .into_iter()
                .map(|s| s.to_string())
                .collect();
            (names, stmt.column_count())
        };

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_count);
            for (i, col_name) in column_names.iter().enumerate() {
                map.insert(col_name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Execute a statement with typed parameters and return the number of
    /// rows changed.
    pub fn execute_write(&self, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        Ok(stmt.execute(params)?)
    }

    /// Run one or more statements without parameters.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // COUNT(*) and SUM over BIGINT come back as HUGEINT
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
        }
        // Dates and timestamps are stored as VARCHAR; other types are not selected.
        _ => serde_json::Value::Null,
    }
}

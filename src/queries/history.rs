//! Local price history store backed by DuckDB.
//!
//! Keeps daily observations per location so multi-year seasonal bands can be
//! built without refetching every season from the API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::connection::Connection;
use crate::error::Result;
use crate::models::Observation;
use crate::seasonal::{build_day_lookup, BandKey, HistoricalBand};
use crate::sql_builder::SqlBuilder;

/// Columns selected back into [`Observation`].
const OBSERVATION_COLUMNS: [&str; 12] = [
    "point_code AS pointcode",
    "COALESCE(issue_date, '') AS issue_date",
    "trade_date",
    "COALESCE(region_name, '') AS region_name",
    "COALESCE(location_name, '') AS location_name",
    "low",
    "high",
    "average",
    "volume",
    "deals",
    "NULLIF(flow_start_date, '') AS flow_start_date",
    "NULLIF(flow_end_date, '') AS flow_end_date",
];

const INSERT_OBSERVATION: &str = "
INSERT INTO price_data (
    point_code, issue_date, trade_date, region_name, location_name,
    low, high, average, volume, deals, flow_start_date, flow_end_date
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT DO NOTHING";

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLocation {
    pub point_code: String,
    pub location_name: Option<String>,
    pub region_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub min_date: Option<String>,
    pub max_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_records: i64,
    pub unique_locations: i64,
    pub date_range: DateRange,
}

/// Outcome of an [`insert`](PriceHistoryQuery::insert).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InsertSummary {
    pub inserted: usize,
    pub duplicates: usize,
}

// ---------------------------------------------------------------------------
// PriceHistoryQuery
// ---------------------------------------------------------------------------

/// Read/write interface over the `price_data` and `locations` tables.
pub struct PriceHistoryQuery<'a> {
    conn: &'a Connection,
}

impl<'a> PriceHistoryQuery<'a> {
    /// Create a `PriceHistoryQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create the tables if needed. Safe to call repeatedly.
    pub fn init(&self) -> Result<()> {
        self.conn.ensure_schema()
    }

    /// Insert or replace a location's reference data.
    pub fn insert_location(&self, code: &str, name: &str, region: &str) -> Result<()> {
        self.init()?;
        self.conn.execute_write(
            "INSERT OR REPLACE INTO locations (location_code, location_name, region_name) \
             VALUES (?, ?, ?)",
            duckdb::params![code, name, region],
        )?;
        Ok(())
    }

    /// Store observations for `location`, skipping rows already present
    /// (same point code, trade date and flow range).
    ///
    /// Observations with an empty trade date are counted as neither inserted
    /// nor duplicate.
    pub fn insert(&self, location: &str, observations: &[Observation]) -> Result<InsertSummary> {
        self.init()?;
        let mut summary = InsertSummary::default();

        for obs in observations {
            if obs.trade_date.is_empty() {
                tracing::debug!("not storing {} observation without trade date", location);
                continue;
            }
            let point_code = if obs.pointcode.is_empty() {
                location
            } else {
                obs.pointcode.as_str()
            };
            let flow_start = obs.flow_start_date.as_deref().unwrap_or("");
            let flow_end = obs.flow_end_date.as_deref().unwrap_or("");

            let changed = self.conn.execute_write(
                INSERT_OBSERVATION,
                duckdb::params![
                    point_code,
                    obs.issue_date,
                    obs.trade_date,
                    obs.region_name,
                    obs.location_name,
                    obs.low,
                    obs.high,
                    obs.average,
                    obs.volume,
                    obs.deals,
                    flow_start,
                    flow_end,
                ],
            )?;
            if changed > 0 {
                summary.inserted += 1;
            } else {
                summary.duplicates += 1;
            }
        }

        tracing::info!(
            "Stored {} observations for {} ({} duplicates)",
            summary.inserted,
            location,
            summary.duplicates
        );
        Ok(summary)
    }

    /// Observations for a location, ordered by trade date, optionally bounded
    /// by an inclusive trade date window and a row limit.
    pub fn get(
        &self,
        location: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Observation>> {
        self.init()?;

        let mut qb = SqlBuilder::new("price_data");
        qb.select(&OBSERVATION_COLUMNS);
        if let Some(loc) = location {
            qb.where_eq("point_code", loc);
        }
        if let Some(start) = start_date {
            qb.where_gte("trade_date", start);
        }
        if let Some(end) = end_date {
            qb.where_lte("trade_date", end);
        }
        qb.order_by(&["trade_date ASC", "flow_start_date ASC"]);
        if let Some(n) = limit {
            qb.limit(n);
        }

        let (sql, params) = qb.build();
        self.conn.execute_into(&sql, &params)
    }

    /// One season (calendar year) of observations for a location.
    pub fn year(&self, location: &str, year: i32) -> Result<Vec<Observation>> {
        self.get(
            Some(location),
            Some(&format!("{:04}-01-01", year)),
            Some(&format!("{:04}-12-31", year)),
            None,
        )
    }

    /// Day lookups per stored season, ready for range aggregation.
    ///
    /// Years with no usable prices are left out.
    pub fn year_lookups(&self, location: &str, years: &[i32]) -> Result<HistoricalBand> {
        let mut band = HistoricalBand::new();
        for &year in years {
            let lookup = build_day_lookup(&self.year(location, year)?);
            if !lookup.is_empty() {
                band.insert(BandKey::Year(year), lookup);
            }
        }
        Ok(band)
    }

    /// Stored seasons per year, in the shape the history fetch returns.
    pub fn years(&self, location: &str, years: &[i32]) -> Result<BTreeMap<i32, Vec<Observation>>> {
        let mut out = BTreeMap::new();
        for &year in years {
            let records = self.year(location, year)?;
            if !records.is_empty() {
                out.insert(year, records);
            }
        }
        Ok(out)
    }

    /// Distinct locations present in the price data.
    pub fn locations(&self) -> Result<Vec<StoredLocation>> {
        self.init()?;
        let (sql, params) = SqlBuilder::new("price_data")
            .select(&["point_code", "location_name", "region_name"])
            .distinct()
            .order_by(&["region_name", "location_name", "point_code"])
            .build();
        self.conn.execute_into(&sql, &params)
    }

    /// Earliest and latest trade date, optionally for one location.
    pub fn date_range(&self, location: Option<&str>) -> Result<DateRange> {
        self.init()?;
        let mut qb = SqlBuilder::new("price_data");
        qb.select(&["MIN(trade_date) AS min_date", "MAX(trade_date) AS max_date"]);
        if let Some(loc) = location {
            qb.where_eq("point_code", loc);
        }
        let (sql, params) = qb.build();
        Ok(self
            .conn
            .execute_into::<DateRange>(&sql, &params)?
            .into_iter()
            .next()
            .unwrap_or_default())
    }

    /// Record and location counts plus the overall date range.
    pub fn stats(&self) -> Result<StoreStats> {
        self.init()?;
        let total_records =
            scalar_i64(self.conn.execute_scalar("SELECT COUNT(*) FROM price_data", &[])?);
        let unique_locations = scalar_i64(
            self.conn
                .execute_scalar("SELECT COUNT(DISTINCT point_code) FROM price_data", &[])?,
        );
        Ok(StoreStats {
            total_records,
            unique_locations,
            date_range: self.date_range(None)?,
        })
    }
}

fn scalar_i64(value: Option<Value>) -> i64 {
    value.and_then(|v| v.as_i64()).unwrap_or(0)
}

//! Daily price queries against the NGI `dailyHistoricalData.json` endpoint.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::client::NgiClient;
use crate::config::{DAILY_PRICES_ENDPOINT, EARLIEST_YEAR, HISTORY_YEARS, LATEST_YEAR};
use crate::error::{NgiError, Result};
use crate::models::{observations_from_columnar, Observation, SeasonalBundle};
use crate::views::seasonal_view;

/// Reject a season under analysis outside `1900..=9999`.
pub fn check_season_year(year: i32) -> Result<()> {
    if (EARLIEST_YEAR..=LATEST_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(NgiError::InvalidArgument(format!(
            "year {} is outside {}..={}",
            year, EARLIEST_YEAR, LATEST_YEAR
        )))
    }
}

// ---------------------------------------------------------------------------
// DailyPriceQuery
// ---------------------------------------------------------------------------

/// Query interface for daily location prices.
pub struct DailyPriceQuery<'a> {
    client: &'a RefCell<NgiClient>,
}

impl<'a> DailyPriceQuery<'a> {
    /// Create a new `DailyPriceQuery` bound to the given client.
    pub fn new(client: &'a RefCell<NgiClient>) -> Self {
        Self { client }
    }

    /// Observations for `location` with trade dates in `start_date..=end_date`,
    /// sorted by trade date.
    pub fn fetch(
        &self,
        location: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<Observation>> {
        if location.is_empty() {
            return Err(NgiError::InvalidArgument("location is required".into()));
        }
        if start_date.is_empty() || end_date.is_empty() {
            return Err(NgiError::InvalidArgument(
                "start_date and end_date are required".into(),
            ));
        }

        let params = [
            ("location", location),
            ("start_date", start_date),
            ("end_date", end_date),
        ];
        let raw = self
            .client
            .borrow_mut()
            .get_json(DAILY_PRICES_ENDPOINT, &params)?;
        let records = observations_from_columnar(raw);
        tracing::debug!(
            "{} observations for {} between {} and {}",
            records.len(),
            location,
            start_date,
            end_date
        );
        Ok(records)
    }

    /// One calendar year of observations.
    ///
    /// The year must format as a four-digit `YYYY`.
    pub fn fetch_year(&self, location: &str, year: i32) -> Result<Vec<Observation>> {
        if !(0..=LATEST_YEAR).contains(&year) {
            return Err(NgiError::InvalidArgument(format!(
                "year {} is not a four-digit year",
                year
            )));
        }
        self.fetch(
            location,
            &format!("{:04}-01-01", year),
            &format!("{:04}-12-31", year),
        )
    }

    /// The seasons before `analysis_year`, keyed by year, for building a
    /// historical band.
    ///
    /// Covers `analysis_year - 1` down to `analysis_year - 5`, stopping below
    /// 1900. `prior_records`, when non-empty, is used for the first of those
    /// years instead of fetching it again. Years that fail or come back empty
    /// are skipped.
    pub fn fetch_multi_year_history(
        &self,
        location: &str,
        analysis_year: i32,
        prior_records: Option<&[Observation]>,
    ) -> BTreeMap<i32, Vec<Observation>> {
        let mut history = BTreeMap::new();
        let prior_year = analysis_year.saturating_sub(1);

        for year in (analysis_year.saturating_sub(HISTORY_YEARS)..=prior_year).rev() {
            if year < EARLIEST_YEAR {
                break;
            }
            if year == prior_year {
                if let Some(records) = prior_records.filter(|r| !r.is_empty()) {
                    history.insert(year, records.to_vec());
                    continue;
                }
            }
            match self.fetch_year(location, year) {
                Ok(records) if records.is_empty() => {
                    tracing::debug!("No {} history for {}", location, year);
                }
                Ok(records) => {
                    history.insert(year, records);
                }
                Err(e) => {
                    tracing::warn!("Skipping {} history for {}: {}", location, year, e);
                }
            }
        }

        history
    }

    /// Year-over-year seasonal comparison for `location`, with the five-year
    /// band when `show_range` is set.
    pub fn seasonality(
        &self,
        location: &str,
        year: i32,
        show_range: bool,
    ) -> Result<SeasonalBundle> {
        check_season_year(year)?;
        let current = self.fetch_year(location, year)?;
        let prior = self.fetch_year(location, year - 1)?;

        let history = if show_range {
            self.fetch_multi_year_history(location, year, Some(&prior))
        } else {
            BTreeMap::new()
        };

        Ok(seasonal_view(&current, &prior, &history, year))
    }
}

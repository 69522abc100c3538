//! Forward curve comparison between two issue dates.
//!
//! The heatmap shows how every contract of every location moved between a
//! start and an end publication. When the prompt month rolled in between,
//! the start curve is shifted so the same delivery months line up.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::client::NgiClient;
use crate::config::FORWARD_CURVE_ENDPOINT;
use crate::error::{NgiError, Result};
use crate::format::{contract_month, contract_month_short, round_to};
use crate::models::{
    AlignmentInfo, ForwardCurve, HeatmapCell, HeatmapComparison, HeatmapData, HeatmapMetadata,
    HeatmapRow, LocationCurve,
};

// ---------------------------------------------------------------------------
// Alignment helpers
// ---------------------------------------------------------------------------

fn first_location(curve: &ForwardCurve) -> Option<&LocationCurve> {
    curve.data.as_ref().and_then(|d| d.values().next())
}

/// First contract of the first location, if any.
pub fn prompt_month(curve: &ForwardCurve) -> Option<&str> {
    first_location(curve)
        .and_then(|loc| loc.contracts.first())
        .and_then(|c| c.as_deref())
}

/// Whole months from `start` to `end` (both `YYYY-MM-DD`).
///
/// Returns 0 when either side is empty or malformed.
pub fn month_difference(start: &str, end: &str) -> i32 {
    fn year_month(s: &str) -> Option<(i32, i32)> {
        let mut parts = s.split('-');
        let year = parts.next()?.trim().parse().ok()?;
        let month = parts.next()?.trim().parse().ok()?;
        parts.next()?;
        Some((year, month))
    }

    match (year_month(start), year_month(end)) {
        (Some((sy, sm)), Some((ey, em))) => ey
            .checked_sub(sy)
            .and_then(|years| years.checked_mul(12))
            .and_then(|months| months.checked_add(em.checked_sub(sm)?))
            .unwrap_or(0),
        _ => 0,
    }
}

/// Shift `start` so its contracts line up with `end` after a prompt roll.
///
/// When the end prompt month is `n > 0` months later, every start location
/// drops `min(n, len - 1)` leading contracts, so at least one contract is
/// always kept. The input is never modified.
pub fn align_contracts(start: &ForwardCurve, end: &ForwardCurve) -> (ForwardCurve, AlignmentInfo) {
    let start_prompt = prompt_month(start);
    let end_prompt = prompt_month(end);

    let mut info = AlignmentInfo {
        start_prompt_month: start_prompt.map(contract_month),
        end_prompt_month: end_prompt.map(contract_month),
        ..AlignmentInfo::default()
    };

    let (Some(sp), Some(ep)) = (start_prompt, end_prompt) else {
        return (start.clone(), info);
    };

    let rolled = month_difference(sp, ep);
    info.months_rolled = rolled;
    if rolled <= 0 {
        return (start.clone(), info);
    }

    let mut adjusted = start.clone();
    info.adjusted = true;

    if let Some(first) = first_location(&adjusted) {
        let n = (rolled as usize).min(first.contracts.len().saturating_sub(1));
        info.removed_months = first.contracts[..n]
            .iter()
            .flatten()
            .map(|c| contract_month(c))
            .collect();
    }

    if let Some(data) = adjusted.data.as_mut() {
        for loc in data.values_mut() {
            let n = (rolled as usize).min(loc.contracts.len().saturating_sub(1));
            if n > 0 {
                loc.drop_leading(n);
            }
        }
    }

    tracing::debug!(
        "Aligned forward curves: {} month(s) rolled, removed {:?}",
        rolled,
        info.removed_months
    );
    (adjusted, info)
}

/// Pad each start location with empty contracts up to the matching end
/// location's length. Locations missing on either side are left alone.
pub fn pad_to_match(start: &mut ForwardCurve, end: &ForwardCurve) {
    let (Some(start_data), Some(end_data)) = (start.data.as_mut(), end.data.as_ref()) else {
        return;
    };
    for (key, loc) in start_data.iter_mut() {
        if let Some(end_loc) = end_data.get(key) {
            loc.pad_to(end_loc.contracts.len());
        }
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

fn change(start: Option<f64>, end: Option<f64>) -> Option<f64> {
    match (start, end) {
        (Some(s), Some(e)) => Some(round_to(e - s, 3)),
        _ => None,
    }
}

fn cell(start: Option<f64>, end: Option<f64>) -> HeatmapCell {
    HeatmapCell {
        change: change(start, end),
        start_price: start,
        end_price: end,
    }
}

fn price_at(prices: &[Option<f64>], idx: usize) -> Option<f64> {
    prices.get(idx).copied().flatten()
}

/// Build the heatmap comparison of two forward curve publications.
///
/// Fails with `NotFound` when either curve carries no `data`.
pub fn compare_curves(
    start: &ForwardCurve,
    end: &ForwardCurve,
    start_issue_date: &str,
    end_issue_date: &str,
) -> Result<HeatmapComparison> {
    if start.data.is_none() {
        return Err(NgiError::NotFound(format!(
            "no forward curve data for start date {}",
            start_issue_date
        )));
    }
    let end_data = end.data.as_ref().ok_or_else(|| {
        NgiError::NotFound(format!("no forward curve data for end date {}", end_issue_date))
    })?;

    let (mut adjusted, alignment_info) = align_contracts(start, end);
    pad_to_match(&mut adjusted, end);

    let contracts: Vec<String> = first_location(&adjusted)
        .map(|loc| {
            loc.contracts
                .iter()
                .map(|c| match c {
                    Some(c) => contract_month_short(c),
                    None => "Unknown".to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    let mut locations: Vec<(&String, &LocationCurve)> =
        adjusted.data.iter().flat_map(|d| d.iter()).collect();
    locations.sort_by(|a, b| a.1.location.cmp(&b.1.location));

    let mut table_data = Vec::new();
    let mut heatmap_data = HeatmapData::default();

    for (key, start_loc) in locations {
        let Some(end_loc) = end_data.get(key) else {
            continue;
        };
        let name = if start_loc.location.is_empty() {
            key.clone()
        } else {
            start_loc.location.clone()
        };

        let mut fixed = BTreeMap::new();
        let mut basis = BTreeMap::new();
        for (idx, contract) in start_loc.contracts.iter().enumerate() {
            let label = match contract {
                Some(c) => contract_month_short(c),
                None => format!("Unknown-{}", idx),
            };
            fixed.insert(
                label.clone(),
                cell(
                    price_at(&start_loc.fixed_prices, idx),
                    price_at(&end_loc.fixed_prices, idx),
                ),
            );
            basis.insert(
                label,
                cell(
                    price_at(&start_loc.basis_prices, idx),
                    price_at(&end_loc.basis_prices, idx),
                ),
            );
        }
        heatmap_data.fixed.insert(name.clone(), fixed);
        heatmap_data.basis.insert(name.clone(), basis);

        let start_fixed = price_at(&start_loc.fixed_prices, 0);
        let end_fixed = price_at(&end_loc.fixed_prices, 0);
        let start_basis = price_at(&start_loc.basis_prices, 0);
        let end_basis = price_at(&end_loc.basis_prices, 0);
        table_data.push(HeatmapRow {
            location: name,
            start_fixed,
            end_fixed,
            fixed_change: change(start_fixed, end_fixed),
            start_basis,
            end_basis,
            basis_change: change(start_basis, end_basis),
        });
    }

    let metadata = HeatmapMetadata {
        start_trade_date: adjusted.meta.trade_date.clone(),
        end_trade_date: end.meta.trade_date.clone(),
        start_issue_date: start_issue_date.to_string(),
        end_issue_date: end_issue_date.to_string(),
        prompt_month: contracts.first().cloned().unwrap_or_else(|| "N/A".to_string()),
        alignment_info,
        location_count: table_data.len(),
        contract_count: contracts.len(),
    };

    Ok(HeatmapComparison {
        metadata,
        table_data,
        heatmap_data,
        contracts,
    })
}

// ---------------------------------------------------------------------------
// ForwardCurveQuery
// ---------------------------------------------------------------------------

/// Fetches forward curve publications through the NGI client.
pub struct ForwardCurveQuery<'a> {
    client: &'a RefCell<NgiClient>,
}

impl<'a> ForwardCurveQuery<'a> {
    pub fn new(client: &'a RefCell<NgiClient>) -> Self {
        Self { client }
    }

    /// All locations' forward curves as published on `issue_date`
    /// (latest publication when empty).
    pub fn fetch(&self, issue_date: &str) -> Result<ForwardCurve> {
        let params: Vec<(&str, &str)> = if issue_date.is_empty() {
            Vec::new()
        } else {
            vec![("issue_date", issue_date)]
        };
        let raw = self
            .client
            .borrow_mut()
            .get_json(FORWARD_CURVE_ENDPOINT, &params)?;
        let curve: ForwardCurve = serde_json::from_value(raw)?;
        if curve.data.is_none() {
            return Err(NgiError::NotFound(format!(
                "no forward curve data for {}",
                if issue_date.is_empty() { "latest" } else { issue_date }
            )));
        }
        Ok(curve)
    }

    /// Compare the publications of two issue dates.
    pub fn heatmap(&self, start_date: &str, end_date: &str) -> Result<HeatmapComparison> {
        if start_date.is_empty() || end_date.is_empty() {
            return Err(NgiError::InvalidArgument(
                "both start and end issue dates are required".into(),
            ));
        }
        let start = self.fetch(start_date)?;
        let end = self.fetch(end_date)?;
        compare_curves(&start, &end, start_date, end_date)
    }
}

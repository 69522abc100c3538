//! Label formatting shared by the chart and table payloads.

const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Three-letter English month name for `1..=12`.
pub fn month_abbrev(month: u32) -> Option<&'static str> {
    MONTH_ABBREVS.get(usize::try_from(month).ok()?.checked_sub(1)?).copied()
}

fn split_contract(contract_date: &str) -> Option<(&str, u32)> {
    let mut parts = contract_date.split('-');
    let year = parts.next()?;
    let month: u32 = parts.next()?.parse().ok()?;
    parts.next()?;
    if parts.next().is_some() || year.is_empty() {
        return None;
    }
    Some((year, month))
}

/// `"2024-02-01"` -> `"Feb 2024"`.
///
/// Empty input gives `"N/A"`; anything unparseable is returned unchanged.
pub fn contract_month(contract_date: &str) -> String {
    if contract_date.is_empty() {
        return "N/A".to_string();
    }
    split_contract(contract_date)
        .and_then(|(year, month)| month_abbrev(month).map(|m| format!("{} {}", m, year)))
        .unwrap_or_else(|| contract_date.to_string())
}

/// `"2024-02-01"` -> `"02-2024"`.
///
/// Empty input gives `"N/A"`; anything unparseable is returned unchanged.
pub fn contract_month_short(contract_date: &str) -> String {
    if contract_date.is_empty() {
        return "N/A".to_string();
    }
    match split_contract(contract_date) {
        Some((year, month)) => format!("{:02}-{}", month, year),
        None => contract_date.to_string(),
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

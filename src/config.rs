use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::Credentials;

pub const DEFAULT_API_BASE: &str = "https://api.ngidata.com";

pub const AUTH_ENDPOINT: &str = "auth";
pub const DAILY_PRICES_ENDPOINT: &str = "dailyHistoricalData.json";
pub const FORWARD_CURVE_ENDPOINT: &str = "forwardDatafeed.json";

/// Number of prior seasons that make up the historical band.
pub const HISTORY_YEARS: i32 = 5;

/// Oldest season the history backfill will ask for.
pub const EARLIEST_YEAR: i32 = 1900;

/// Latest season that still formats as a four-digit `YYYY` date.
pub const LATEST_YEAR: i32 = 9999;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Upstream tokens last a day; refresh an hour early.
pub const TOKEN_LIFETIME_HOURS: i64 = 23;

pub const SESSION_HOURS: i64 = 8;
pub const REMEMBER_ME_DAYS: i64 = 7;

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("ngi-sdk")
    } else {
        PathBuf::from(".ngi-sdk-cache")
    }
}

/// Database file used when no explicit path is configured.
///
/// Lives under the platform data directory rather than the cache directory,
/// so clearing cached responses never touches stored history.
pub fn default_database_path() -> PathBuf {
    match dirs::data_dir() {
        Some(data) => data.join("ngi-sdk").join("price_data.duckdb"),
        None => PathBuf::from(".ngi-sdk-data").join("price_data.duckdb"),
    }
}

/// Settings read from the process environment (and `.env`, if present).
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub api_base: Option<String>,
    pub credentials: Option<Credentials>,
    pub cache_dir: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub offline: bool,
}

impl Settings {
    /// Load `.env` and read `NGI_*` variables.
    ///
    /// Credentials are only set when both `NGI_EMAIL` and `NGI_API_KEY` are
    /// present and non-empty.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("no .env loaded: {}", e);
        }

        let email = non_empty_var("NGI_EMAIL");
        let api_key = non_empty_var("NGI_API_KEY");
        let credentials = match (email, api_key) {
            (Some(email), Some(api_key)) => Some(Credentials::new(email, api_key)),
            _ => None,
        };

        Self {
            api_base: non_empty_var("NGI_API_BASE"),
            credentials,
            cache_dir: non_empty_var("NGI_CACHE_DIR").map(PathBuf::from),
            database_path: non_empty_var("NGI_DATABASE_PATH").map(PathBuf::from),
            offline: non_empty_var("NGI_OFFLINE")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//! NGI natural-gas price SDK for Rust.
//!
//! Fetches daily and forward prices from the NGI data API, keeps a local
//! DuckDB store of past seasons, and normalizes seasons onto a shared `MM-DD`
//! calendar so different years can be charted against each other.
//!
//! # Quick start
//!
//! ```no_run
//! use ngi_sdk::NgiSdk;
//!
//! let sdk = NgiSdk::builder().from_env().build().unwrap();
//!
//! // Henry Hub 2024 against 2023, with the five-year band
//! let bundle = sdk.prices().seasonality("SLAHH", 2024, true).unwrap();
//! println!("{} days with a 2024 price", bundle.current.iter().flatten().count());
//!
//! // Forward curve moves between two issue dates
//! let heatmap = sdk.forward().heatmap("2024-01-02", "2024-02-01").unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod format;
pub mod models;
pub mod queries;
pub mod seasonal;
pub mod sql_builder;
pub mod views;

#[cfg(feature = "async")]
pub use async_client::AsyncNgiSdk;
pub use auth::{Credentials, SessionContext};
pub use cache::ResponseCache;
pub use client::NgiClient;
pub use config::Settings;
pub use connection::Connection;
pub use error::{NgiError, Result};
pub use sql_builder::SqlBuilder;
pub use views::ViewMode;

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// NgiSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`NgiSdk`] instance.
///
/// Use [`NgiSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](NgiSdkBuilder::build) to create the SDK.
pub struct NgiSdkBuilder {
    api_base: String,
    credentials: Option<Credentials>,
    cache_dir: Option<PathBuf>,
    database_path: Option<PathBuf>,
    in_memory_history: bool,
    offline: bool,
    timeout: Duration,
}

impl Default for NgiSdkBuilder {
    fn default() -> Self {
        Self {
            api_base: config::DEFAULT_API_BASE.to_string(),
            credentials: None,
            cache_dir: None,
            database_path: None,
            in_memory_history: false,
            offline: false,
            timeout: config::REQUEST_TIMEOUT,
        }
    }
}

impl NgiSdkBuilder {
    /// Override the API base URL.
    pub fn api_base(mut self, url: &str) -> Self {
        self.api_base = url.to_string();
        self
    }

    /// Credentials used to obtain access tokens.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set a custom cache directory.
    ///
    /// If not set, the platform-appropriate default cache directory is used
    /// (e.g. `~/.cache/ngi-sdk` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// DuckDB file for the price history store.
    ///
    /// Defaults to `ngi-sdk/price_data.duckdb` under the platform data
    /// directory (e.g. `~/.local/share` on Linux).
    pub fn database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep the price history store in memory instead of on disk.
    pub fn in_memory_history(mut self) -> Self {
        self.in_memory_history = true;
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, the SDK never calls the API and only serves previously
    /// cached responses. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Apply every value present in `settings`.
    pub fn from_settings(mut self, settings: Settings) -> Self {
        if let Some(base) = settings.api_base {
            self.api_base = base;
        }
        if let Some(credentials) = settings.credentials {
            self.credentials = Some(credentials);
        }
        if let Some(dir) = settings.cache_dir {
            self.cache_dir = Some(dir);
        }
        if let Some(path) = settings.database_path {
            self.database_path = Some(path);
        }
        self.offline |= settings.offline;
        self
    }

    /// Shorthand for `from_settings(Settings::from_env())`.
    pub fn from_env(self) -> Self {
        self.from_settings(Settings::from_env())
    }

    /// Build the SDK, creating the cache directory and opening the history
    /// store.
    ///
    /// No request is made here; authentication happens on the first API call.
    pub fn build(self) -> Result<NgiSdk> {
        let cache = ResponseCache::new(self.cache_dir)?;
        let conn = if self.in_memory_history {
            Connection::open_in_memory()?
        } else {
            let path = self
                .database_path
                .unwrap_or_else(config::default_database_path);
            Connection::open(path)?
        };

        if self.credentials.is_none() && !self.offline {
            tracing::warn!("No NGI credentials configured; API requests will fail");
        }

        let client = NgiClient::new(
            &self.api_base,
            self.credentials,
            Some(cache),
            self.offline,
            self.timeout,
        );
        Ok(NgiSdk {
            client: RefCell::new(client),
            conn,
        })
    }
}

// ---------------------------------------------------------------------------
// NgiSdk
// ---------------------------------------------------------------------------

/// The main entry point for the NGI SDK.
///
/// Owns the API client and the history store connection and exposes query
/// interfaces as lightweight borrowing wrappers.
///
/// Created via [`NgiSdk::builder()`].
pub struct NgiSdk {
    client: RefCell<NgiClient>,
    conn: Connection,
}

impl NgiSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> NgiSdkBuilder {
        NgiSdkBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Daily prices and seasonal comparisons from the API.
    pub fn prices(&self) -> queries::DailyPriceQuery<'_> {
        queries::DailyPriceQuery::new(&self.client)
    }

    /// The local price history store.
    pub fn history(&self) -> queries::PriceHistoryQuery<'_> {
        queries::PriceHistoryQuery::new(&self.conn)
    }

    /// Forward curves and the heatmap comparison.
    pub fn forward(&self) -> queries::ForwardCurveQuery<'_> {
        queries::ForwardCurveQuery::new(&self.client)
    }

    // -- Sessions and utility methods --------------------------------------

    /// Check the configured credentials against the auth endpoint.
    pub fn verify_credentials(&self) -> Result<bool> {
        self.client.borrow_mut().verify_credentials()
    }

    /// Reuse the access token carried by `session`, if it is still live.
    pub fn restore_session(&self, session: &SessionContext) {
        self.client.borrow_mut().restore_session(session);
    }

    /// Start a session for the configured user that carries the current
    /// access token.
    pub fn start_session(&self, remember_me: bool) -> Result<SessionContext> {
        self.client.borrow().start_session(remember_me)
    }

    /// Fetch one season per prior year and store it, returning how many
    /// observations were newly inserted.
    ///
    /// Seasons already stored are skipped by the store's uniqueness rule.
    pub fn backfill_history(&self, location: &str, analysis_year: i32) -> Result<usize> {
        queries::check_season_year(analysis_year)?;
        let history = self
            .prices()
            .fetch_multi_year_history(location, analysis_year, None);
        let store = self.history();
        let mut inserted = 0;
        for records in history.values() {
            inserted += store.insert(location, records)?.inserted;
        }
        Ok(inserted)
    }

    /// Seasonal comparison with the band built from the local store instead
    /// of the API.
    ///
    /// The current and prior seasons are still fetched.
    pub fn seasonality_from_history(
        &self,
        location: &str,
        year: i32,
    ) -> Result<models::SeasonalBundle> {
        queries::check_season_year(year)?;
        let prices = self.prices();
        let current = prices.fetch_year(location, year)?;
        let prior = prices.fetch_year(location, year - 1)?;
        let years: Vec<i32> = (year - config::HISTORY_YEARS..year).collect();
        let history = self.history().years(location, &years)?;
        Ok(views::seasonal_view(&current, &prior, &history, year))
    }

    /// Remove every cached API response.
    pub fn clear_cache(&self) -> Result<()> {
        match self.client.borrow().cache() {
            Some(cache) => cache.clear(),
            None => Ok(()),
        }
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Shared API client, for issuing requests not covered by the queries.
    pub fn client(&self) -> &RefCell<NgiClient> {
        &self.client
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for NgiSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let client = self.client.borrow();
        let cache_dir = client
            .cache()
            .map(|c| c.cache_dir.display().to_string())
            .unwrap_or_else(|| "none".to_string());
        let database = self
            .conn
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string());
        write!(
            f,
            "NgiSdk(api_base={}, cache_dir={}, database={}, offline={})",
            client.api_base(),
            cache_dir,
            database,
            client.offline
        )
    }
}

//! Async wrapper around [`NgiSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//! API requests use the blocking reqwest client, so they must not run on
//! the async workers directly.
//!
//! # Example
//!
//! ```no_run
//! use ngi_sdk::AsyncNgiSdk;
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk = AsyncNgiSdk::builder().from_env().build().await.unwrap();
//!
//!     // Run any sync SDK method via closure
//!     let records = sdk.run(|s| {
//!         s.prices().fetch("SLAHH", "2024-01-01", "2024-01-31")
//!     }).await.unwrap();
//!
//!     // Convenience method for the seasonal comparison
//!     let bundle = sdk.seasonality("SLAHH", 2024, true).await.unwrap();
//! }
//! ```

use std::sync::{Arc, Mutex};

use crate::error::{NgiError, Result};
use crate::models::SeasonalBundle;
use crate::{NgiSdk, NgiSdkBuilder};

// ---------------------------------------------------------------------------
// AsyncNgiSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for an [`AsyncNgiSdk`]; wraps an [`NgiSdkBuilder`].
#[derive(Default)]
pub struct AsyncNgiSdkBuilder {
    inner: NgiSdkBuilder,
}

impl AsyncNgiSdkBuilder {
    /// Adjust the wrapped sync builder.
    pub fn configure<F>(mut self, f: F) -> Self
    where
        F: FnOnce(NgiSdkBuilder) -> NgiSdkBuilder,
    {
        self.inner = f(self.inner);
        self
    }

    /// Apply `NGI_*` environment settings.
    pub fn from_env(self) -> Self {
        self.configure(NgiSdkBuilder::from_env)
    }

    /// Build the async SDK, opening the cache and history store.
    ///
    /// Initialization runs on the blocking thread pool so it won't block
    /// the async event loop.
    pub async fn build(self) -> Result<AsyncNgiSdk> {
        let builder = self.inner;
        tokio::task::spawn_blocking(move || {
            let sdk = builder.build()?;
            Ok(AsyncNgiSdk {
                inner: Arc::new(Mutex::new(sdk)),
            })
        })
        .await
        .map_err(|e| NgiError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncNgiSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`NgiSdk`].
///
/// The underlying [`NgiSdk`] is protected by a [`Mutex`] since it uses
/// `RefCell` internally, so operations run one at a time.
#[derive(Clone)]
pub struct AsyncNgiSdk {
    inner: Arc<Mutex<NgiSdk>>,
}

impl AsyncNgiSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncNgiSdkBuilder {
        AsyncNgiSdkBuilder::default()
    }

    /// Wrap an already built SDK.
    pub fn from_sdk(sdk: NgiSdk) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sdk)),
        }
    }

    /// Run a sync SDK operation on the blocking thread pool.
    ///
    /// The closure receives an `&NgiSdk` reference and should return
    /// a `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&NgiSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = sdk
                .lock()
                .map_err(|_| NgiError::InvalidArgument("SDK lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| NgiError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Seasonal comparison for `location` and `year`.
    ///
    /// Convenience wrapper around [`run()`](Self::run) for
    /// [`DailyPriceQuery::seasonality`](crate::queries::DailyPriceQuery::seasonality).
    pub async fn seasonality(
        &self,
        location: &str,
        year: i32,
        show_range: bool,
    ) -> Result<SeasonalBundle> {
        let location = location.to_string();
        self.run(move |s| s.prices().seasonality(&location, year, show_range))
            .await
    }
}

//! Async wrapper around [`Dashboard`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all dashboard operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! the blocking HTTP client and the history delay do their waiting.
//!
//! # Example
//!
//! ```no_run
//! use coinboard::AsyncDashboard;
//!
//! #[tokio::main]
//! async fn main() {
//!     let dashboard = AsyncDashboard::builder().build().await.unwrap();
//!
//!     // Run any sync method via closure
//!     let overview = dashboard.run(|d| d.overview(20)).await.unwrap();
//!
//!     // Convenience method for the history fetcher
//!     let series = dashboard.series("bitcoin", 30).await.unwrap();
//! }
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{DashboardError, Fetched, Result};
use crate::models::{HistoricalSeries, SnapshotTable};
use crate::{Dashboard, DashboardConfig};

// ---------------------------------------------------------------------------
// AsyncDashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncDashboard`] instance.
#[derive(Default)]
pub struct AsyncDashboardBuilder {
    config: DashboardConfig,
}

impl AsyncDashboardBuilder {
    /// Replace every setting at once.
    pub fn config(mut self, config: DashboardConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the API base URL.
    pub fn api_base(mut self, base: &str) -> Self {
        self.config.api_base = base.trim_end_matches('/').to_string();
        self
    }

    /// Pause before each uncached history request.
    pub fn history_delay(mut self, delay: Duration) -> Self {
        self.config.history_delay = delay;
        self
    }

    /// Build the async dashboard on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncDashboard> {
        tokio::task::spawn_blocking(move || {
            let dashboard = Dashboard::builder().config(self.config).build()?;
            Ok(AsyncDashboard::from_dashboard(dashboard))
        })
        .await
        .map_err(|e| DashboardError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncDashboard
// ---------------------------------------------------------------------------

/// Async wrapper around [`Dashboard`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The underlying [`Dashboard`] is
/// protected by a [`Mutex`] since it uses `RefCell` internally.
pub struct AsyncDashboard {
    inner: Arc<Mutex<Dashboard>>,
}

impl AsyncDashboard {
    /// Create a new builder for configuring the async dashboard.
    pub fn builder() -> AsyncDashboardBuilder {
        AsyncDashboardBuilder::default()
    }

    /// Wrap an already built [`Dashboard`], e.g. one with an injected transport.
    pub fn from_dashboard(dashboard: Dashboard) -> Self {
        Self {
            inner: Arc::new(Mutex::new(dashboard)),
        }
    }

    /// Run a sync dashboard operation on the blocking thread pool.
    ///
    /// The closure receives a `&Dashboard` and should return a `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Dashboard) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let dashboard = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = dashboard
                .lock()
                .map_err(|_| DashboardError::InvalidArgument("Dashboard lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| DashboardError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Fetch the market snapshot asynchronously.
    ///
    /// Convenience wrapper around [`run()`](Self::run) for
    /// [`MarketQuery::snapshot()`](crate::queries::MarketQuery::snapshot).
    pub async fn snapshot(&self, count: u32) -> Result<Fetched<SnapshotTable>> {
        self.run(move |d| Ok(d.markets().snapshot(count))).await
    }

    /// Fetch a price history asynchronously.
    pub async fn series(&self, asset_id: &str, days: u32) -> Result<Fetched<HistoricalSeries>> {
        let asset_id = asset_id.to_string();
        self.run(move |d| Ok(d.history().series(&asset_id, days)))
            .await
    }

    /// Drop every cached result.
    pub async fn refresh(&self) -> Result<()> {
        self.run(|d| {
            d.refresh();
            Ok(())
        })
        .await
    }
}

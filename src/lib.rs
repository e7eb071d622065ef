//! Crypto market dashboard SDK for Rust.
//!
//! Fetches market snapshots and price history from the CoinGecko public API,
//! caches them briefly in memory, and reshapes them into display strings,
//! summary metrics and Plotly-compatible chart specifications. Rendering and
//! page layout are left to the caller.
//!
//! # Quick start
//!
//! ```no_run
//! use coinboard::Dashboard;
//!
//! let dashboard = Dashboard::builder().build().unwrap();
//!
//! // Top 20 assets; empty with an issue attached if the API misbehaves
//! let snapshot = dashboard.markets().snapshot(20);
//! if let Some(issue) = &snapshot.issue {
//!     eprintln!("{}", issue);
//! }
//!
//! // Thirty days of bitcoin prices as a line chart
//! let history = dashboard.history().thirty_day("bitcoin");
//! let chart = coinboard::charts::price_history(&history.data, "Bitcoin - Last 30 Days");
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod charts;
pub mod config;
pub mod connection;
pub mod error;
pub mod format;
pub mod models;
pub mod queries;
pub mod request;
pub mod scheduler;
pub mod transport;

#[cfg(feature = "async")]
pub use async_client::AsyncDashboard;
pub use cache::{CacheStore, Clock, TtlCache};
pub use config::DashboardConfig;
pub use connection::Connection;
pub use error::{DashboardError, FetchIssue, Fetched, Result};
pub use request::ApiRequest;
pub use scheduler::{CancelHandle, RefreshInterval, RefreshScheduler};
pub use transport::{HttpResponse, ReqwestTransport, Transport};

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use tracing::info;

use models::{AssetDetail, MarketOverview, MarketSummary, RankingRow, SnapshotTable};

// ---------------------------------------------------------------------------
// DashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`Dashboard`] instance.
///
/// Use [`Dashboard::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](DashboardBuilder::build) to create it.
#[derive(Default)]
pub struct DashboardBuilder {
    config: DashboardConfig,
    transport: Option<Box<dyn Transport>>,
    cache: Option<Box<dyn CacheStore>>,
}

impl DashboardBuilder {
    /// Replace every setting at once, e.g. with [`DashboardConfig::from_env`].
    pub fn config(mut self, config: DashboardConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the API base URL. Defaults to the CoinGecko v3 public API.
    pub fn api_base(mut self, base: &str) -> Self {
        self.config.api_base = base.trim_end_matches('/').to_string();
        self
    }

    /// Set the quote currency. Defaults to `usd`.
    pub fn vs_currency(mut self, currency: &str) -> Self {
        self.config.vs_currency = currency.to_lowercase();
        self
    }

    /// How long a market snapshot stays cached. Defaults to 60 seconds.
    pub fn snapshot_ttl(mut self, ttl: Duration) -> Self {
        self.config.snapshot_ttl = ttl;
        self
    }

    /// How long a price history stays cached. Defaults to 300 seconds.
    pub fn history_ttl(mut self, ttl: Duration) -> Self {
        self.config.history_ttl = ttl;
        self
    }

    /// Request timeout for the markets endpoint. Defaults to 10 seconds.
    pub fn snapshot_timeout(mut self, timeout: Duration) -> Self {
        self.config.snapshot_timeout = timeout;
        self
    }

    /// Request timeout for the history endpoint. Defaults to 15 seconds.
    pub fn history_timeout(mut self, timeout: Duration) -> Self {
        self.config.history_timeout = timeout;
        self
    }

    /// Pause before each uncached history request. Defaults to 500 ms.
    pub fn history_delay(mut self, delay: Duration) -> Self {
        self.config.history_delay = delay;
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.config.user_agent = user_agent.to_string();
        self
    }

    /// Use a custom transport instead of the blocking reqwest client.
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Use a custom cache store instead of a fresh [`TtlCache`].
    pub fn cache<C: CacheStore + 'static>(mut self, cache: C) -> Self {
        self.cache = Some(Box::new(cache));
        self
    }

    /// Build the dashboard. No request is made until a query runs.
    pub fn build(self) -> Result<Dashboard> {
        let transport: Box<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Box::new(ReqwestTransport::new(&self.config.user_agent)?),
        };
        let cache: Box<dyn CacheStore> = match self.cache {
            Some(c) => c,
            None => Box::new(TtlCache::new()),
        };
        let conn = Connection::new(transport, cache, self.config);
        Ok(Dashboard { conn })
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Wraps a [`Connection`] (which owns the transport and the result cache) and
/// exposes the snapshot and history fetchers as lightweight borrowing
/// wrappers. Created via [`Dashboard::builder()`].
pub struct Dashboard {
    conn: Connection,
}

impl Dashboard {
    /// Create a new builder for configuring the dashboard.
    pub fn builder() -> DashboardBuilder {
        DashboardBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the market snapshot interface.
    pub fn markets(&self) -> queries::MarketQuery<'_> {
        queries::MarketQuery::new(&self.conn)
    }

    /// Access the price history interface.
    pub fn history(&self) -> queries::HistoryQuery<'_> {
        queries::HistoryQuery::new(&self.conn)
    }

    // -- Render-pass helpers -----------------------------------------------

    /// Fetch a snapshot of `count` assets and derive the summary metrics,
    /// ranking table and both market-cap charts from it.
    ///
    /// An empty snapshot is an error ([`DashboardError::NoData`] unless a
    /// more specific cause is known): the render pass should stop there.
    pub fn overview(&self, count: u32) -> Result<MarketOverview> {
        let table = self.markets().try_snapshot(count)?;
        if table.is_empty() {
            return Err(DashboardError::NoData(
                "market snapshot is empty".to_string(),
            ));
        }
        Ok(MarketOverview {
            fetched_at: Utc::now(),
            summary: MarketSummary::from_table(&table),
            ranking: RankingRow::from_table(&table),
            ranking_chart: charts::market_cap_ranking(&table),
            share_chart: charts::market_cap_share(&table),
            table,
        })
    }

    /// Metric columns for the asset called `name` in `table`.
    pub fn detail(&self, table: &SnapshotTable, name: &str) -> Option<AssetDetail> {
        table.get_by_name(name).map(AssetDetail::from_row)
    }

    // -- Cache control -------------------------------------------------------

    /// Drop every cached result so the next queries hit the API again.
    pub fn refresh(&self) {
        let dropped = self.conn.cached_entries();
        self.conn.clear_cache();
        info!(dropped, "cache cleared");
    }

    /// Number of live cache entries.
    pub fn cached_entries(&self) -> usize {
        self.conn.cached_entries()
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.conn.config();
        write!(
            f,
            "Dashboard(api_base={}, vs_currency={}, cached_entries={})",
            config.api_base,
            config.vs_currency,
            self.conn.cached_entries()
        )
    }
}

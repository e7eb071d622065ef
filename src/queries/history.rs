//! Historical price queries against the `coins/{id}/market_chart` endpoint.

use std::thread;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::CachedValue;
use crate::config;
use crate::connection::Connection;
use crate::error::{DashboardError, FetchIssue, Fetched, Result};
use crate::format;
use crate::models::{AssetSnapshot, HistoricalSeries, SeriesSource};
use crate::request::ApiRequest;

const SCOPE: &str = "history";

// ---------------------------------------------------------------------------
// HistoryQuery
// ---------------------------------------------------------------------------

/// Query interface for per-asset price history.
pub struct HistoryQuery<'a> {
    conn: &'a Connection,
}

impl<'a> HistoryQuery<'a> {
    /// Create a new `HistoryQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// The request issued for `asset_id` over `days`.
    pub fn request(&self, asset_id: &str, days: u32) -> ApiRequest {
        let mut req = ApiRequest::new("coins");
        req.segment(asset_id)
            .segment("market_chart")
            .param("vs_currency", &self.conn.config().vs_currency)
            .param("days", days)
            .param("interval", config::history_interval(days));
        req
    }

    /// Fetch `days` of prices for `asset_id`, never failing.
    ///
    /// A 429 yields an empty series with [`FetchIssue::RateLimited`]; a
    /// response without prices yields an empty series and no issue.
    pub fn series(&self, asset_id: &str, days: u32) -> Fetched<HistoricalSeries> {
        match self.try_series(asset_id, days) {
            Ok(series) => Fetched::ok(series),
            Err(e) => {
                let issue = FetchIssue::from(&e);
                warn!(asset_id, days, error = %e, "price history unavailable");
                Fetched::failed(HistoricalSeries::empty(), issue)
            }
        }
    }

    /// Fetch `days` of prices for `asset_id`.
    ///
    /// Waits the configured history delay before going to the network; cache
    /// hits return immediately.
    pub fn try_series(&self, asset_id: &str, days: u32) -> Result<HistoricalSeries> {
        if asset_id.trim().is_empty() {
            return Err(DashboardError::InvalidArgument(
                "asset id must not be empty".to_string(),
            ));
        }
        if days == 0 {
            return Err(DashboardError::InvalidArgument(
                "history window must be at least one day".to_string(),
            ));
        }

        let req = self.request(asset_id, days);
        let key = req.cache_key(SCOPE);
        if let Some(CachedValue::Series(series)) = self.conn.cached(&key) {
            return Ok(series);
        }

        let delay = self.conn.config().history_delay;
        if !delay.is_zero() {
            thread::sleep(delay);
        }

        let body = self
            .conn
            .get_json(&req, self.conn.config().history_timeout)?;
        let series = parse_history(&body)?;
        debug!(asset_id, days, points = series.len(), "price history fetched");

        self.conn.store(
            key,
            CachedValue::Series(series.clone()),
            self.conn.config().history_ttl,
        );
        Ok(series)
    }

    /// Seven-day series for a market row.
    ///
    /// Prefers the row's embedded sparkline (no request). A sparkline that is
    /// present but empty gives an empty series without fetching; only a row
    /// with no sparkline at all falls back to the endpoint.
    pub fn seven_day(&self, asset: &AssetSnapshot) -> (SeriesSource, Fetched<HistoricalSeries>) {
        self.seven_day_at(asset, Utc::now())
    }

    /// [`seven_day`](Self::seven_day) with the sparkline's last point at `now`.
    pub fn seven_day_at(
        &self,
        asset: &AssetSnapshot,
        now: DateTime<Utc>,
    ) -> (SeriesSource, Fetched<HistoricalSeries>) {
        match asset.sparkline_prices() {
            Some(prices) => (
                SeriesSource::Sparkline,
                Fetched::ok(HistoricalSeries::from_sparkline(prices, now)),
            ),
            None => (SeriesSource::Fetched, self.series(&asset.id, 7)),
        }
    }

    /// Thirty-day series; always fetched.
    pub fn thirty_day(&self, asset_id: &str) -> Fetched<HistoricalSeries> {
        self.series(asset_id, 30)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_history(body: &Value) -> Result<HistoricalSeries> {
    let prices = match body.get("prices") {
        None | Some(Value::Null) => return Ok(HistoricalSeries::empty()),
        Some(Value::Array(prices)) => prices,
        Some(_) => {
            return Err(DashboardError::UnexpectedShape(
                "'prices' is not a list".to_string(),
            ))
        }
    };

    let pairs: Vec<(f64, Option<f64>)> = prices
        .iter()
        .filter_map(|pair| {
            let pair = pair.as_array()?;
            let ms = format::number(pair.first()?)?;
            Some((ms, pair.get(1).and_then(format::number)))
        })
        .collect();
    Ok(HistoricalSeries::from_millis(&pairs))
}

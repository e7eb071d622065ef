//! Market snapshot queries against the `coins/markets` endpoint.

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::CachedValue;
use crate::config::{self, ASSET_COUNT_RANGE, REQUIRED_FIELDS};
use crate::connection::Connection;
use crate::error::{DashboardError, FetchIssue, Fetched, Result};
use crate::models::SnapshotTable;
use crate::request::ApiRequest;

const SCOPE: &str = "markets";

// ---------------------------------------------------------------------------
// MarketQuery
// ---------------------------------------------------------------------------

/// Query interface for the top-N market snapshot.
pub struct MarketQuery<'a> {
    conn: &'a Connection,
}

impl<'a> MarketQuery<'a> {
    /// Create a new `MarketQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// The request issued for `count` assets.
    pub fn request(&self, count: u32) -> ApiRequest {
        let mut req = ApiRequest::new(config::MARKETS_PATH);
        req.param("vs_currency", &self.conn.config().vs_currency)
            .param("order", "market_cap_desc")
            .param("per_page", count)
            .param("page", 1)
            .param("sparkline", true)
            .param("price_change_percentage", config::PRICE_CHANGE_HORIZONS);
        req
    }

    /// Fetch the top `count` assets by market cap, never failing.
    ///
    /// Any error yields an empty table with the matching [`FetchIssue`].
    /// Results are cached for the snapshot TTL, keyed by `count`.
    pub fn snapshot(&self, count: u32) -> Fetched<SnapshotTable> {
        match self.try_snapshot(count) {
            Ok(table) => Fetched::ok(table),
            Err(e) => {
                let issue = FetchIssue::from(&e);
                warn!(count, error = %e, "market snapshot unavailable");
                Fetched::failed(SnapshotTable::empty(), issue)
            }
        }
    }

    /// Fetch the top `count` assets by market cap.
    ///
    /// `count` must lie in 5..=50. The batch is rejected whole with
    /// [`DashboardError::MissingField`] if any record lacks a required field.
    pub fn try_snapshot(&self, count: u32) -> Result<SnapshotTable> {
        if !ASSET_COUNT_RANGE.contains(&count) {
            return Err(DashboardError::InvalidArgument(format!(
                "asset count must be between {} and {}, got {}",
                ASSET_COUNT_RANGE.start(),
                ASSET_COUNT_RANGE.end(),
                count
            )));
        }

        let req = self.request(count);
        let key = req.cache_key(SCOPE);
        if let Some(CachedValue::Snapshot(table)) = self.conn.cached(&key) {
            return Ok(table);
        }

        let body = self
            .conn
            .get_json(&req, self.conn.config().snapshot_timeout)?;
        let table = parse_snapshot(body, count as usize)?;
        debug!(count, rows = table.len(), "market snapshot fetched");

        self.conn.store(
            key,
            CachedValue::Snapshot(table.clone()),
            self.conn.config().snapshot_ttl,
        );
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_snapshot(body: Value, limit: usize) -> Result<SnapshotTable> {
    let Value::Array(records) = body else {
        return Err(DashboardError::UnexpectedShape(
            "markets response is not a list".to_string(),
        ));
    };
    if records.is_empty() {
        return Ok(SnapshotTable::empty());
    }

    SnapshotTable::require_fields(&records, &REQUIRED_FIELDS)?;
    let mut table = SnapshotTable::from_records(records)?;
    table.rank_and_truncate(limit);
    Ok(table)
}

//! HTTP connection wrapper with a shared time-boxed result cache.
//!
//! Resolves [`ApiRequest`]s against the configured API base, sends them
//! through the injected [`Transport`], and maps status codes onto
//! [`DashboardError`] variants (429 becomes [`DashboardError::RateLimited`]).

use std::cell::RefCell;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheKey, CacheStore, CachedValue};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::request::ApiRequest;
use crate::transport::Transport;

/// Owns the transport, the cache and the settings every query shares.
pub struct Connection {
    transport: Box<dyn Transport>,
    /// The time-boxed result cache.
    pub cache: RefCell<Box<dyn CacheStore>>,
    config: DashboardConfig,
}

impl Connection {
    pub fn new(
        transport: Box<dyn Transport>,
        cache: Box<dyn CacheStore>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            transport,
            cache: RefCell::new(cache),
            config,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Send a GET and parse the body as JSON.
    ///
    /// Errors with `RateLimited` on 429, `Status` on any other non-2xx
    /// response, and `Timeout` when the deadline elapses.
    pub fn get_json(&self, request: &ApiRequest, timeout: Duration) -> Result<Value> {
        let url = request.url(&self.config.api_base)?;
        debug!(url = %url, timeout_ms = timeout.as_millis() as u64, "GET");

        let resp = self.transport.get(&url, timeout)?;
        if resp.status == 429 {
            return Err(DashboardError::RateLimited);
        }
        if !resp.is_success() {
            return Err(DashboardError::Status {
                status: resp.status,
                url,
            });
        }
        Ok(serde_json::from_str(&resp.body)?)
    }

    /// Live cached value for `key`, if any.
    pub fn cached(&self, key: &CacheKey) -> Option<CachedValue> {
        let hit = self.cache.borrow_mut().get(key);
        debug!(key = %key, hit = hit.is_some(), "cache lookup");
        hit
    }

    pub fn store(&self, key: CacheKey, value: CachedValue, ttl: Duration) {
        self.cache.borrow_mut().put(key, value, ttl);
    }

    /// Drop every cached result.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.borrow().len()
    }
}

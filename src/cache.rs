//! Time-boxed in-memory cache for fetch results.
//!
//! Entries are keyed by function identity plus call parameters and expire
//! after a per-entry time-to-live. Only successful computations are stored;
//! the fetchers never hand a failure to [`CacheStore::put`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::{HistoricalSeries, SnapshotTable};

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of monotonic time for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The process monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// ---------------------------------------------------------------------------
// Keys and values
// ---------------------------------------------------------------------------

/// Function identity + endpoint path + query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    scope: &'static str,
    path: String,
    params: Vec<(String, String)>,
}

impl CacheKey {
    pub fn new(scope: &'static str, path: String, params: Vec<(String, String)>) -> Self {
        Self {
            scope,
            path,
            params,
        }
    }

    pub fn scope(&self) -> &'static str {
        self.scope
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope, self.path)?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, k, v)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Snapshot(SnapshotTable),
    Series(HistoricalSeries),
}

// ---------------------------------------------------------------------------
// CacheStore
// ---------------------------------------------------------------------------

/// Key-value store with time-to-live semantics.
///
/// Injected into a [`Dashboard`](crate::Dashboard) through the builder, so
/// tests and embedders can supply their own store.
pub trait CacheStore: Send {
    /// Live value for `key`, or `None` if absent or expired.
    fn get(&mut self, key: &CacheKey) -> Option<CachedValue>;

    /// Store `value` under `key` for `ttl`, replacing any previous entry.
    fn put(&mut self, key: CacheKey, value: CachedValue, ttl: Duration);

    /// Drop every entry.
    fn clear(&mut self);

    /// Number of live entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Entry {
    value: CachedValue,
    stored_at: Instant,
    ttl: Duration,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < self.ttl
    }
}

/// Process-local [`CacheStore`] backed by a `HashMap`.
pub struct TtlCache {
    entries: HashMap<CacheKey, Entry>,
    clock: Arc<dyn Clock>,
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TtlCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a cache that reads time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
        }
    }

    /// Remove expired entries.
    pub fn purge_expired(&mut self) {
        let now = self.clock.now();
        self.entries.retain(|_, entry| entry.is_live(now));
    }
}

impl CacheStore for TtlCache {
    fn get(&mut self, key: &CacheKey) -> Option<CachedValue> {
        let now = self.clock.now();
        match self.entries.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.value.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&mut self, key: CacheKey, value: CachedValue, ttl: Duration) {
        let stored_at = self.clock.now();
        self.entries.insert(
            key,
            Entry {
                value,
                stored_at,
                ttl,
            },
        );
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        let now = self.clock.now();
        self.entries.values().filter(|e| e.is_live(now)).count()
    }
}

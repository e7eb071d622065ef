//! Shared test fixtures for the dashboard integration tests.
//!
//! Provides a scripted `FakeTransport` that counts calls and records URLs, a
//! `ManualClock` for driving cache expiry, and JSON fixtures shaped like the
//! CoinGecko markets and market_chart responses.

#![allow(dead_code)]

use coinboard::{Clock, Dashboard, DashboardError, HttpResponse, Result, Transport};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// FakeTransport
// ---------------------------------------------------------------------------

/// Canned reply for one request.
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, String),
    Timeout,
}

impl Reply {
    pub fn ok(body: serde_json::Value) -> Self {
        Reply::Status(200, body.to_string())
    }
}

#[derive(Default)]
struct FakeState {
    routes: HashMap<String, VecDeque<Reply>>,
    calls: Vec<(String, Duration)>,
}

/// Transport answering from a script keyed by URL path fragment.
///
/// Each route holds a queue of replies; the last reply repeats once the queue
/// is down to one. Clones share state, so a test can keep a handle after
/// moving one clone into the dashboard.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `reply` for any URL containing `fragment`.
    pub fn route(&self, fragment: &str, reply: Reply) -> &Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .entry(fragment.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(_, t)| *t)
            .collect()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((url.to_string(), timeout));

        let reply = state
            .routes
            .iter_mut()
            .find(|(fragment, _)| url.contains(fragment.as_str()))
            .and_then(|(_, queue)| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            });

        match reply {
            Some(Reply::Status(status, body)) => Ok(HttpResponse::new(status, body)),
            Some(Reply::Timeout) => Err(DashboardError::Timeout(format!(
                "operation timed out after {:?}",
                timeout
            ))),
            None => Ok(HttpResponse::new(404, "{\"error\":\"not found\"}")),
        }
    }
}

// ---------------------------------------------------------------------------
// ManualClock
// ---------------------------------------------------------------------------

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}

// ---------------------------------------------------------------------------
// Dashboards
// ---------------------------------------------------------------------------

/// Dashboard over `transport` with no history delay.
pub fn dashboard(transport: &FakeTransport) -> Dashboard {
    Dashboard::builder()
        .api_base("https://api.test/api/v3")
        .history_delay(Duration::ZERO)
        .transport(transport.clone())
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// JSON fixtures
// ---------------------------------------------------------------------------

const ASSETS: [(&str, &str, &str, f64, f64, f64); 12] = [
    ("bitcoin", "btc", "Bitcoin", 67000.0, 1_320_000_000_000.0, 2.5),
    ("ethereum", "eth", "Ethereum", 3500.0, 420_000_000_000.0, -1.2),
    ("tether", "usdt", "Tether", 1.0, 110_000_000_000.0, 0.0),
    ("binancecoin", "bnb", "BNB", 590.0, 87_000_000_000.0, 0.8),
    ("solana", "sol", "Solana", 150.0, 68_000_000_000.0, 4.1),
    ("usd-coin", "usdc", "USDC", 1.0, 33_000_000_000.0, 0.01),
    ("ripple", "xrp", "XRP", 0.52, 29_000_000_000.0, -0.4),
    ("dogecoin", "doge", "Dogecoin", 0.15, 21_000_000_000.0, 6.3),
    ("cardano", "ada", "Cardano", 0.45, 16_000_000_000.0, -2.2),
    ("tron", "trx", "TRON", 0.12, 10_500_000_000.0, 0.3),
    ("shiba-inu", "shib", "Shiba Inu", 0.000024, 14_000_000_000.0, 1.1),
    ("pepe", "pepe", "Pepe", 0.0000085, 3_500_000_000.0, -5.0),
];

/// One full markets record for the asset at `rank` (1-based, up to 12).
pub fn market_record(rank: usize) -> serde_json::Value {
    let (id, symbol, name, price, cap, change) = ASSETS[rank - 1];
    serde_json::json!({
        "id": id,
        "symbol": symbol,
        "name": name,
        "image": format!("https://assets.test/{}.png", id),
        "current_price": price,
        "market_cap": cap,
        "market_cap_rank": rank,
        "total_volume": cap / 20.0,
        "high_24h": price * 1.02,
        "low_24h": price * 0.97,
        "price_change_24h": price * change / 100.0,
        "price_change_percentage_24h": change,
        "price_change_percentage_1h_in_currency": change / 10.0,
        "price_change_percentage_24h_in_currency": change,
        "price_change_percentage_7d_in_currency": change * 2.0,
        "price_change_percentage_30d_in_currency": change * 3.0,
        "last_updated": "2026-10-15T10:00:00.000Z",
        "sparkline_in_7d": { "price": [price * 0.95, price * 0.98, price] }
    })
}

/// A markets response with the top `n` records (n up to 12).
pub fn markets_body(n: usize) -> serde_json::Value {
    serde_json::Value::Array((1..=n).map(market_record).collect())
}

/// A market_chart response with `n` daily points starting 2026-09-15.
pub fn chart_body(n: usize) -> serde_json::Value {
    let start_ms: i64 = 1_789_430_400_000;
    let prices: Vec<serde_json::Value> = (0..n)
        .map(|i| serde_json::json!([start_ms + i as i64 * 86_400_000, 60000.0 + i as f64 * 100.0]))
        .collect();
    serde_json::json!({
        "prices": prices,
        "market_caps": [],
        "total_volumes": []
    })
}

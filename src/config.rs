use std::env;
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::error::{DashboardError, Result};

pub const API_BASE: &str = "https://api.coingecko.com/api/v3";
pub const VS_CURRENCY: &str = "usd";

pub const MARKETS_PATH: &str = "coins/markets";
pub const PRICE_CHANGE_HORIZONS: &str = "1h,24h,7d,30d";

pub const SNAPSHOT_TTL: Duration = Duration::from_secs(60);
pub const HISTORY_TTL: Duration = Duration::from_secs(300);
pub const SNAPSHOT_TIMEOUT: Duration = Duration::from_secs(10);
pub const HISTORY_TIMEOUT: Duration = Duration::from_secs(15);
/// Pause before every historical call; the free tier rate-limits aggressively.
pub const HISTORY_DELAY: Duration = Duration::from_millis(500);

pub const ASSET_COUNT_RANGE: RangeInclusive<u32> = 5..=50;
pub const DEFAULT_ASSET_COUNT: u32 = 20;
pub const ASSET_COUNT_STEP: u32 = 5;

pub const REFRESH_INTERVAL_RANGE: RangeInclusive<u64> = 600..=1800;
pub const DEFAULT_REFRESH_INTERVAL: u64 = 600;
pub const REFRESH_INTERVAL_STEP: u64 = 300;

/// Number of rows the pie and bar charts consider.
pub const CHART_TOP_N: usize = 10;

/// Keys every market record must carry (the value itself may be null).
pub const REQUIRED_FIELDS: [&str; 7] = [
    "id",
    "symbol",
    "name",
    "current_price",
    "market_cap",
    "total_volume",
    "price_change_percentage_24h",
];

/// `hourly` for windows of a day or less, `daily` otherwise.
pub fn history_interval(days: u32) -> &'static str {
    if days <= 1 {
        "hourly"
    } else {
        "daily"
    }
}

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

/// Runtime settings for a [`Dashboard`](crate::Dashboard).
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_base: String,
    pub vs_currency: String,
    pub snapshot_ttl: Duration,
    pub history_ttl: Duration,
    pub snapshot_timeout: Duration,
    pub history_timeout: Duration,
    pub history_delay: Duration,
    pub user_agent: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: API_BASE.to_string(),
            vs_currency: VS_CURRENCY.to_string(),
            snapshot_ttl: SNAPSHOT_TTL,
            history_ttl: HISTORY_TTL,
            snapshot_timeout: SNAPSHOT_TIMEOUT,
            history_timeout: HISTORY_TIMEOUT,
            history_delay: HISTORY_DELAY,
            user_agent: format!("coinboard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl DashboardConfig {
    /// Defaults, overridden by any `COINBOARD_*` environment variables that are set.
    ///
    /// Recognised: `COINBOARD_API_BASE`, `COINBOARD_VS_CURRENCY`,
    /// `COINBOARD_SNAPSHOT_TTL_SECS`, `COINBOARD_HISTORY_TTL_SECS`,
    /// `COINBOARD_HISTORY_DELAY_MS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(base) = env::var("COINBOARD_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Ok(currency) = env::var("COINBOARD_VS_CURRENCY") {
            config.vs_currency = currency.to_lowercase();
        }
        if let Some(secs) = env_u64("COINBOARD_SNAPSHOT_TTL_SECS")? {
            config.snapshot_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64("COINBOARD_HISTORY_TTL_SECS")? {
            config.history_ttl = Duration::from_secs(secs);
        }
        if let Some(ms) = env_u64("COINBOARD_HISTORY_DELAY_MS")? {
            config.history_delay = Duration::from_millis(ms);
        }
        Ok(config)
    }
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<u64>().map(Some).map_err(|_| {
            DashboardError::InvalidArgument(format!(
                "{} must be a non-negative integer, got '{}'",
                key, raw
            ))
        }),
        Err(_) => Ok(None),
    }
}

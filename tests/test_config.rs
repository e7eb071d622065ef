//! Configuration defaults and environment overrides.

use coinboard::config::{self, DashboardConfig};
use coinboard::DashboardError;
use std::env;
use std::sync::Mutex;
use std::time::Duration;

// from_env reads process-global state
static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: [&str; 5] = [
    "COINBOARD_API_BASE",
    "COINBOARD_VS_CURRENCY",
    "COINBOARD_SNAPSHOT_TTL_SECS",
    "COINBOARD_HISTORY_TTL_SECS",
    "COINBOARD_HISTORY_DELAY_MS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn defaults() {
    let config = DashboardConfig::default();

    assert_eq!(config.api_base, "https://api.coingecko.com/api/v3");
    assert_eq!(config.vs_currency, "usd");
    assert_eq!(config.snapshot_ttl, Duration::from_secs(60));
    assert_eq!(config.history_ttl, Duration::from_secs(300));
    assert_eq!(config.snapshot_timeout, Duration::from_secs(10));
    assert_eq!(config.history_timeout, Duration::from_secs(15));
    assert_eq!(config.history_delay, Duration::from_millis(500));
    assert!(config.user_agent.starts_with("coinboard/"));
}

#[test]
fn history_interval_switches_after_one_day() {
    assert_eq!(config::history_interval(1), "hourly");
    assert_eq!(config::history_interval(2), "daily");
    assert_eq!(config::history_interval(7), "daily");
    assert_eq!(config::history_interval(30), "daily");
}

#[test]
fn asset_count_bounds() {
    assert!(config::ASSET_COUNT_RANGE.contains(&config::DEFAULT_ASSET_COUNT));
    assert_eq!(*config::ASSET_COUNT_RANGE.start(), 5);
    assert_eq!(*config::ASSET_COUNT_RANGE.end(), 50);
    assert_eq!(config::DEFAULT_ASSET_COUNT % config::ASSET_COUNT_STEP, 0);
}

#[test]
fn from_env_without_overrides_is_default() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    assert_eq!(DashboardConfig::from_env().unwrap(), DashboardConfig::default());
}

#[test]
fn from_env_applies_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    env::set_var("COINBOARD_API_BASE", "http://localhost:8080/api/v3/");
    env::set_var("COINBOARD_VS_CURRENCY", "EUR");
    env::set_var("COINBOARD_SNAPSHOT_TTL_SECS", "30");
    env::set_var("COINBOARD_HISTORY_TTL_SECS", " 600 ");
    env::set_var("COINBOARD_HISTORY_DELAY_MS", "0");

    let config = DashboardConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.api_base, "http://localhost:8080/api/v3");
    assert_eq!(config.vs_currency, "eur");
    assert_eq!(config.snapshot_ttl, Duration::from_secs(30));
    assert_eq!(config.history_ttl, Duration::from_secs(600));
    assert_eq!(config.history_delay, Duration::ZERO);
}

#[test]
fn from_env_rejects_non_numeric_durations() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    env::set_var("COINBOARD_SNAPSHOT_TTL_SECS", "soon");

    let result = DashboardConfig::from_env();
    clear_env();

    match result {
        Err(DashboardError::InvalidArgument(msg)) => {
            assert!(msg.contains("COINBOARD_SNAPSHOT_TTL_SECS"))
        }
        other => panic!("expected InvalidArgument, got {:?}", other),
    }
}

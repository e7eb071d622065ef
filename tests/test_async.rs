//! Async wrapper tests. Only built with `--features async`.

#![cfg(feature = "async")]

mod common;

use coinboard::{AsyncDashboard, FetchIssue};
use common::{chart_body, dashboard, markets_body, FakeTransport, Reply};

#[tokio::test]
async fn snapshot_runs_on_blocking_pool() {
    let transport = FakeTransport::new();
    transport.route("coins/markets", Reply::ok(markets_body(10)));
    let dash = AsyncDashboard::from_dashboard(dashboard(&transport));

    let fetched = dash.snapshot(10).await.unwrap();

    assert!(fetched.issue.is_none());
    assert_eq!(fetched.data.len(), 10);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn series_and_refresh() {
    let transport = FakeTransport::new();
    transport.route("market_chart", Reply::ok(chart_body(30)));
    let dash = AsyncDashboard::from_dashboard(dashboard(&transport));

    assert_eq!(dash.series("bitcoin", 30).await.unwrap().data.len(), 30);
    dash.series("bitcoin", 30).await.unwrap();
    assert_eq!(transport.call_count(), 1);

    dash.refresh().await.unwrap();
    dash.series("bitcoin", 30).await.unwrap();
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn run_exposes_the_sync_api() {
    let transport = FakeTransport::new();
    transport.route("coins/markets", Reply::Status(429, String::new()));
    let dash = AsyncDashboard::from_dashboard(dashboard(&transport));

    let fetched = dash.run(|d| Ok(d.markets().snapshot(20))).await.unwrap();
    assert_eq!(fetched.issue, Some(FetchIssue::RateLimited));

    let overview = dash.run(|d| d.overview(20)).await;
    assert!(overview.is_err());
}

//! Auto-refresh scheduler tests. Periods are shortened to milliseconds via
//! `RefreshScheduler::with_period`.

mod common;

use coinboard::{DashboardError, RefreshInterval, RefreshScheduler};
use common::{dashboard, markets_body, FakeTransport, Reply};
use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

// ---------------------------------------------------------------------------
// RefreshInterval
// ---------------------------------------------------------------------------

#[test]
fn interval_bounds() {
    assert!(RefreshInterval::from_secs(600).is_ok());
    assert!(RefreshInterval::from_secs(1800).is_ok());
    assert!(matches!(
        RefreshInterval::from_secs(599),
        Err(DashboardError::InvalidArgument(_))
    ));
    assert!(RefreshInterval::from_secs(1801).is_err());
}

#[test]
fn interval_default_is_ten_minutes() {
    assert_eq!(
        RefreshInterval::default().as_duration(),
        Duration::from_secs(600)
    );
    let scheduler = RefreshScheduler::new(RefreshInterval::from_secs(900).unwrap());
    assert_eq!(scheduler.period(), Duration::from_secs(900));
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn each_tick_clears_the_cache() {
    let transport = FakeTransport::new();
    transport.route("coins/markets", Reply::ok(markets_body(5)));
    let dash = dashboard(&transport);
    let scheduler = RefreshScheduler::with_period(Duration::from_millis(10));

    let mut seen = Vec::new();
    let ticks = scheduler.run(&dash, |tick| {
        seen.push((tick.number, dash.cached_entries()));
        // re-render: fetch again, repopulating the cache
        dash.markets().snapshot(5);
        if tick.number == 3 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    assert_eq!(ticks, 3);
    assert_eq!(seen, vec![(1, 0), (2, 0), (3, 0)]);
    assert_eq!(transport.call_count(), 3);
    assert_eq!(dash.cached_entries(), 1);
}

#[test]
fn cancel_from_another_thread_stops_the_loop() {
    let dash = dashboard(&FakeTransport::new());
    let scheduler = RefreshScheduler::with_period(Duration::from_millis(20));
    let handle = scheduler.cancel_handle();

    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        handle.cancel();
    });
    let ticks = scheduler.run(&dash, |_| ControlFlow::Continue(()));
    canceller.join().unwrap();

    assert!(ticks >= 1);
    assert!(scheduler.cancel_handle().is_cancelled());
}

#[test]
fn cancelled_scheduler_never_ticks() {
    let dash = dashboard(&FakeTransport::new());
    let scheduler = RefreshScheduler::with_period(Duration::from_millis(10));
    scheduler.cancel();

    let ticks = scheduler.run(&dash, |_| ControlFlow::Continue(()));

    assert_eq!(ticks, 0);
}

#[test]
fn countdown_reports_time_left() {
    let dash = dashboard(&FakeTransport::new());
    let scheduler = RefreshScheduler::with_period(Duration::from_millis(30));

    let mut remaining = Vec::new();
    scheduler.run_with_countdown(
        &dash,
        |left| remaining.push(left),
        |_| ControlFlow::Break(()),
    );

    assert_eq!(
        remaining,
        vec![
            Duration::from_millis(30),
            Duration::from_millis(20),
            Duration::from_millis(10),
        ]
    );
}

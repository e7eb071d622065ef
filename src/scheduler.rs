//! Auto-refresh loop.
//!
//! [`RefreshScheduler::run`] blocks the calling thread: it counts down the
//! refresh interval in one-second slices, then clears the dashboard cache and
//! invokes the tick callback so the caller can re-render. The loop ends when
//! the callback returns [`ControlFlow::Break`] or a [`CancelHandle`] is
//! cancelled, from any thread.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::{DEFAULT_REFRESH_INTERVAL, REFRESH_INTERVAL_RANGE};
use crate::error::{DashboardError, Result};
use crate::Dashboard;

const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// RefreshInterval
// ---------------------------------------------------------------------------

/// Validated auto-refresh interval (600 to 1800 seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshInterval(Duration);

impl RefreshInterval {
    pub fn from_secs(secs: u64) -> Result<Self> {
        if !REFRESH_INTERVAL_RANGE.contains(&secs) {
            return Err(DashboardError::InvalidArgument(format!(
                "refresh interval must be between {} and {} seconds, got {}",
                REFRESH_INTERVAL_RANGE.start(),
                REFRESH_INTERVAL_RANGE.end(),
                secs
            )));
        }
        Ok(Self(Duration::from_secs(secs)))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl Default for RefreshInterval {
    fn default() -> Self {
        Self(Duration::from_secs(DEFAULT_REFRESH_INTERVAL))
    }
}

// ---------------------------------------------------------------------------
// CancelHandle
// ---------------------------------------------------------------------------

/// Stops a running scheduler. Cheap to clone and `Send`.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One completed refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// 1-based cycle number.
    pub number: u64,
    pub at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// RefreshScheduler
// ---------------------------------------------------------------------------

pub struct RefreshScheduler {
    period: Duration,
    step: Duration,
    cancel: CancelHandle,
}

impl RefreshScheduler {
    pub fn new(interval: RefreshInterval) -> Self {
        Self::with_period(interval.as_duration())
    }

    /// Scheduler with an arbitrary, unvalidated period.
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            step: period.min(COUNTDOWN_STEP),
            cancel: CancelHandle::default(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Run until the callback breaks or the scheduler is cancelled.
    ///
    /// Returns the number of completed ticks.
    pub fn run<F>(&self, dashboard: &Dashboard, on_tick: F) -> u64
    where
        F: FnMut(&Tick) -> ControlFlow<()>,
    {
        self.run_with_countdown(dashboard, |_| {}, on_tick)
    }

    /// Like [`run`](Self::run), also reporting the time left before the next
    /// tick once per countdown step.
    pub fn run_with_countdown<C, F>(
        &self,
        dashboard: &Dashboard,
        mut on_countdown: C,
        mut on_tick: F,
    ) -> u64
    where
        C: FnMut(Duration),
        F: FnMut(&Tick) -> ControlFlow<()>,
    {
        let mut ticks = 0;
        info!(period_secs = self.period.as_secs(), "auto-refresh started");
        while self.count_down(&mut on_countdown) {
            dashboard.refresh();
            ticks += 1;
            let tick = Tick {
                number: ticks,
                at: Utc::now(),
            };
            debug!(tick = tick.number, "auto-refresh tick");
            if on_tick(&tick).is_break() || self.cancel.is_cancelled() {
                break;
            }
        }
        info!(ticks, "auto-refresh stopped");
        ticks
    }

    /// Sleep out one period. `false` if cancelled meanwhile.
    fn count_down<C: FnMut(Duration)>(&self, on_countdown: &mut C) -> bool {
        let mut remaining = self.period;
        while !remaining.is_zero() {
            if self.cancel.is_cancelled() {
                return false;
            }
            on_countdown(remaining);
            let step = remaining.min(self.step);
            thread::sleep(step);
            remaining = remaining.saturating_sub(step);
        }
        !self.cancel.is_cancelled()
    }
}

//! Conjunction of several quota windows.
//!
//! All windows live behind a single mutex. Checking and consuming quota
//! happens in one critical section, so two callers can never both observe
//! the last free slot of a window.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::error::ShopApiError;
use crate::rate_limit::{Clock, Window, WindowRule};

/// Point-in-time view of one window in a [`WindowSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStatus {
    /// Width of the bucket.
    pub interval: Duration,
    /// Maximum admissions per bucket.
    pub capacity: u32,
    /// Admissions granted in the current bucket.
    pub count: u32,
}

/// A set of windows that must all have room before a request is admitted.
///
/// Windows are kept ordered by increasing interval.
#[derive(Debug)]
pub struct WindowSet {
    windows: Mutex<Vec<Window>>,
    clock: Arc<dyn Clock>,
}

impl WindowSet {
    /// Build a window set from quota rules.
    ///
    /// Fails when `rules` is empty or any rule has a zero interval or capacity.
    pub fn new(rules: Vec<WindowRule>, clock: Arc<dyn Clock>) -> Result<Self, ShopApiError> {
        if rules.is_empty() {
            return Err(ShopApiError::InvalidConfig(
                "at least one window rule is required".to_string(),
            ));
        }

        let mut windows = rules
            .into_iter()
            .map(|rule| Window::new(rule, clock.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        windows.sort_by_key(Window::interval);

        Ok(Self {
            windows: Mutex::new(windows),
            clock,
        })
    }

    /// Check whether every window currently has room.
    ///
    /// Every window is evaluated, so expired buckets all roll over even when
    /// an earlier window is full.
    pub fn check(&self) -> bool {
        let now = self.clock.now();
        check_all(&mut self.windows.lock(), now)
    }

    /// Admit one request if every window has room, consuming one unit from each.
    ///
    /// A rejected attempt leaves every count unchanged. The check and the
    /// increment use the same clock reading, taken under the lock.
    pub fn tick(&self) -> bool {
        let now = self.clock.now();
        let mut windows = self.windows.lock();

        if !check_all(&mut windows, now) {
            return false;
        }

        windows
            .iter_mut()
            .fold(true, |granted, window| window.tick_at(now) & granted)
    }

    /// Number of windows in the set.
    pub fn len(&self) -> usize {
        self.windows.lock().len()
    }

    /// Whether the set has no windows. Always `false` for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.windows.lock().is_empty()
    }

    /// Current count of every window, shortest interval first.
    pub fn counts(&self) -> Vec<u32> {
        self.windows.lock().iter().map(Window::count).collect()
    }

    /// Current state of every window, shortest interval first.
    pub fn snapshot(&self) -> Vec<WindowStatus> {
        self.windows
            .lock()
            .iter()
            .map(|window| WindowStatus {
                interval: window.interval(),
                capacity: window.capacity(),
                count: window.count(),
            })
            .collect()
    }

    /// Time until every currently full window has rolled over.
    ///
    /// Returns `None` if a request would be admitted now. Does not roll any
    /// bucket over.
    pub fn time_until_available(&self) -> Option<Duration> {
        let now = self.clock.now();
        let windows = self.windows.lock();
        windows
            .iter()
            .filter(|window| window.remaining() == 0)
            .map(|window| window.time_until_reset(now))
            .filter(|wait| !wait.is_zero())
            .max()
    }
}

/// Check every window against `now` without short-circuiting.
fn check_all(windows: &mut [Window], now: Instant) -> bool {
    windows
        .iter_mut()
        .fold(true, |agreed, window| window.check_at(now) & agreed)
}

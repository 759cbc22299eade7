//! Fixed time bucket with a request quota.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::ShopApiError;
use crate::rate_limit::{Clock, WindowRule};

/// A fixed window rate limiter for one quota rule.
///
/// Counts admissions inside a bucket that starts when the window is created
/// and restarts the first time it is checked after `interval` has elapsed.
///
/// Note that [`Window::check`] is not a pure read: across a bucket boundary it
/// rolls the bucket over and resets the count.
#[derive(Debug)]
pub struct Window {
    rule: WindowRule,
    clock: Arc<dyn Clock>,
    window_start: Instant,
    count: u32,
}

impl Window {
    /// Create a window for `rule`, starting its first bucket now.
    pub fn new(rule: WindowRule, clock: Arc<dyn Clock>) -> Result<Self, ShopApiError> {
        rule.validate()?;
        let window_start = clock.now();
        Ok(Self {
            rule,
            clock,
            window_start,
            count: 0,
        })
    }

    /// Check whether the current bucket has room, rolling it over if it expired.
    pub fn check(&mut self) -> bool {
        let now = self.clock.now();
        self.check_at(now)
    }

    /// Consume one unit of quota if the current bucket has room.
    ///
    /// Returns `false` without changing the count when the bucket is full.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        self.tick_at(now)
    }

    pub(crate) fn check_at(&mut self, now: Instant) -> bool {
        // A bucket whose end is past the representable range never expires.
        match self.window_end() {
            Some(end) if now >= end => {}
            _ => return self.count < self.rule.capacity,
        }
        self.window_start = now;
        self.count = 0;
        true
    }

    pub(crate) fn tick_at(&mut self, now: Instant) -> bool {
        if !self.check_at(now) {
            return false;
        }
        self.count += 1;
        true
    }

    /// Time until the current bucket rolls over, measured from `now`.
    ///
    /// `Duration::MAX` when the bucket never expires.
    pub(crate) fn time_until_reset(&self, now: Instant) -> Duration {
        self.window_end()
            .map_or(Duration::MAX, |end| end.saturating_duration_since(now))
    }

    fn window_end(&self) -> Option<Instant> {
        self.window_start.checked_add(self.rule.interval)
    }

    /// The rule this window enforces.
    pub fn rule(&self) -> WindowRule {
        self.rule
    }

    /// Width of the bucket.
    pub fn interval(&self) -> Duration {
        self.rule.interval
    }

    /// Maximum admissions per bucket.
    pub fn capacity(&self) -> u32 {
        self.rule.capacity
    }

    /// Admissions granted in the current bucket.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Admissions still available in the current bucket, ignoring rollover.
    pub fn remaining(&self) -> u32 {
        self.rule.capacity.saturating_sub(self.count)
    }

    /// Start of the current bucket.
    pub fn window_start(&self) -> Instant {
        self.window_start
    }
}

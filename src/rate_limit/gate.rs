//! Bounded waiting for admission.
//!
//! [`RateLimiter`] turns the instantaneous yes/no of a [`WindowSet`] into a
//! wait with a deadline. Waiters poll the shared set, sleeping between
//! attempts without holding its lock. There is no queue: whichever waiter
//! polls first after quota frees up gets it.
//!
//! Windows read the injected [`Clock`]; the wait deadline is measured on
//! Tokio time, the same source that drives the sleep between attempts.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::ShopApiError;
use crate::rate_limit::{Clock, RateLimitConfig, SystemClock, WindowSet};

/// Shared handle to a multi-window rate limiter.
///
/// Cloning is cheap; clones share the same windows, so one limiter can gate
/// every request issued by a client and its clones.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use shop_api_client::rate_limit::{RateLimitConfig, RateLimiter, WindowRule};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), shop_api_client::ShopApiError> {
/// let config = RateLimitConfig::default().with_rules(vec![WindowRule::new(1, 2)]);
/// let limiter = RateLimiter::new(config)?;
///
/// assert!(limiter.try_acquire());
/// assert!(limiter.try_acquire());
/// assert!(!limiter.try_acquire());
///
/// // Wait up to 3 seconds, polling every 100ms
/// let granted = limiter
///     .wait_for_admission(Duration::from_secs(3), Duration::from_millis(100))
///     .await;
/// assert!(granted);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RateLimiter {
    windows: Arc<WindowSet>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a limiter driven by the system clock.
    pub fn new(config: RateLimitConfig) -> Result<Self, ShopApiError> {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a limiter whose windows are driven by a custom clock.
    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Result<Self, ShopApiError> {
        config.validate()?;
        let windows = WindowSet::new(config.rules.clone(), clock)?;
        Ok(Self {
            windows: Arc::new(windows),
            config,
        })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Get the underlying window set.
    pub fn windows(&self) -> &WindowSet {
        &self.windows
    }

    /// Make a single admission attempt without waiting.
    pub fn try_acquire(&self) -> bool {
        !self.config.enabled || self.windows.tick()
    }

    /// Wait until a request is admitted or `max_wait` has elapsed.
    ///
    /// Returns `true` once quota has been consumed in every window, or
    /// `false` when the deadline passes first. The deadline is checked after
    /// each rejected attempt, so at least one attempt is always made. A
    /// `max_wait` too large to represent as an instant never expires.
    pub async fn wait_for_admission(&self, max_wait: Duration, retry_interval: Duration) -> bool {
        if !self.config.enabled {
            return true;
        }

        let start = Instant::now();
        let deadline = start.checked_add(max_wait);
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            if self.windows.tick() {
                if attempts > 1 {
                    tracing::debug!(
                        attempts,
                        waited = ?start.elapsed(),
                        "rate limit admission granted after waiting"
                    );
                }
                return true;
            }

            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                tracing::warn!(
                    attempts,
                    ?max_wait,
                    "rate limit admission timed out"
                );
                return false;
            }

            if attempts == 1 {
                tracing::debug!(
                    ?max_wait,
                    ?retry_interval,
                    "rate limit quota exhausted, waiting for admission"
                );
            }
            tokio::time::sleep(retry_interval).await;
        }
    }

    /// Wait for admission using the configured `max_wait` and `retry_interval`.
    ///
    /// Fails with [`ShopApiError::RateLimitExceeded`] when the deadline passes.
    pub async fn acquire(&self) -> Result<(), ShopApiError> {
        let start = Instant::now();
        if self
            .wait_for_admission(self.config.max_wait, self.config.retry_interval)
            .await
        {
            Ok(())
        } else {
            Err(ShopApiError::RateLimitExceeded {
                waited: start.elapsed(),
            })
        }
    }
}

//! Rate limiting for the legacy API.
//!
//! The legacy API enforces several quotas at the same time, each counted in a
//! fixed time bucket. A request may only be sent when every bucket still has
//! room, and sending it consumes one unit from all of them.
//!
//! ## Default Quotas
//!
//! | Interval | Requests |
//! |----------|----------|
//! | 5s       | 100      |
//! | 50s      | 400      |
//! | 500s     | 1400     |
//!
//! ## Example
//!
//! ```rust
//! use shop_api_client::rate_limit::{RateLimitConfig, RateLimiter};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), shop_api_client::ShopApiError> {
//! let limiter = RateLimiter::new(RateLimitConfig::default())?;
//!
//! // Waits up to the configured deadline for quota in every window
//! limiter.acquire().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Low-Level Building Blocks
//!
//! [`Window`] and [`WindowSet`] can be driven directly with a [`MockClock`]:
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use shop_api_client::rate_limit::{MockClock, WindowRule, WindowSet};
//!
//! let clock = Arc::new(MockClock::new(tokio::time::Instant::now()));
//! let set = WindowSet::new(vec![WindowRule::new(5, 2)], clock.clone()).unwrap();
//!
//! assert!(set.tick());
//! assert!(set.tick());
//! assert!(!set.tick());
//!
//! clock.advance(Duration::from_secs(5));
//! assert!(set.tick());
//! ```

mod clock;
mod gate;
mod middleware;
pub mod serde_helpers;
mod window;
mod window_set;

pub use clock::{Clock, MockClock, SystemClock};
pub use gate::RateLimiter;
pub use middleware::RateLimitMiddleware;
pub use window::Window;
pub use window_set::{WindowSet, WindowStatus};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ShopApiError;

/// A single quota rule: at most `capacity` requests per `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRule {
    /// Width of the time bucket.
    #[serde(with = "serde_helpers::duration_secs")]
    pub interval: Duration,
    /// Maximum admissions per bucket.
    pub capacity: u32,
}

impl WindowRule {
    /// Create a rule from a whole number of seconds and a capacity.
    pub const fn new(interval_secs: u64, capacity: u32) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs),
            capacity,
        }
    }

    /// Check that both the interval and the capacity are positive.
    pub fn validate(&self) -> Result<(), ShopApiError> {
        if self.interval.is_zero() {
            return Err(ShopApiError::InvalidConfig(
                "window interval must be greater than zero".to_string(),
            ));
        }
        if self.capacity == 0 {
            return Err(ShopApiError::InvalidConfig(format!(
                "window capacity must be greater than zero (interval {:?})",
                self.interval
            )));
        }
        Ok(())
    }
}

/// Rate limiter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Quota rules; every one must have room for a request to proceed.
    pub rules: Vec<WindowRule>,
    /// Longest time [`RateLimiter::acquire`] waits for quota.
    #[serde(with = "serde_helpers::duration_secs")]
    pub max_wait: Duration,
    /// Pause between admission attempts while waiting.
    #[serde(with = "serde_helpers::duration_secs")]
    pub retry_interval: Duration,
    /// Whether to enable rate limiting.
    pub enabled: bool,
}

impl RateLimitConfig {
    /// Validate the rule set.
    pub fn validate(&self) -> Result<(), ShopApiError> {
        if self.rules.is_empty() {
            return Err(ShopApiError::InvalidConfig(
                "at least one window rule is required".to_string(),
            ));
        }
        self.rules.iter().try_for_each(WindowRule::validate)
    }

    /// Replace the quota rules.
    pub fn with_rules(mut self, rules: Vec<WindowRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Set the maximum wait and the retry interval.
    pub fn with_wait(mut self, max_wait: Duration, retry_interval: Duration) -> Self {
        self.max_wait = max_wait;
        self.retry_interval = retry_interval;
        self
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            rules: limits::legacy::RULES.to_vec(),
            max_wait: limits::DEFAULT_MAX_WAIT,
            retry_interval: limits::DEFAULT_RETRY_INTERVAL,
            enabled: true,
        }
    }
}

/// Rate limit constants.
pub mod limits {
    use std::time::Duration;

    /// Default longest wait for admission.
    pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(600);
    /// Default pause between admission attempts.
    pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

    /// Legacy API quotas.
    pub mod legacy {
        use crate::rate_limit::WindowRule;

        /// Requests per 5 seconds.
        pub const SHORT: WindowRule = WindowRule::new(5, 100);
        /// Requests per 50 seconds.
        pub const MEDIUM: WindowRule = WindowRule::new(50, 400);
        /// Requests per 500 seconds.
        pub const LONG: WindowRule = WindowRule::new(500, 1400);
        /// All legacy quotas, shortest interval first.
        pub const RULES: [WindowRule; 3] = [SHORT, MEDIUM, LONG];
    }
}

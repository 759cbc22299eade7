//! Rate limiting as `reqwest_middleware` middleware.
//!
//! # Example
//!
//! ```rust
//! use reqwest_middleware::ClientBuilder;
//! use shop_api_client::rate_limit::{RateLimitConfig, RateLimitMiddleware, RateLimiter};
//!
//! let limiter = RateLimiter::new(RateLimitConfig::default()).unwrap();
//! let client = ClientBuilder::new(reqwest::Client::new())
//!     .with(RateLimitMiddleware::new(limiter))
//!     .build();
//! ```

use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use tokio::time::Instant;

use crate::error::AdmissionTimeout;
use crate::rate_limit::RateLimiter;

/// Middleware that waits for rate limit admission before sending each request.
///
/// Requests that are not admitted within the limiter's `max_wait` are never
/// sent; they fail with an [`AdmissionTimeout`] wrapped in
/// [`reqwest_middleware::Error::Middleware`].
#[derive(Debug, Clone)]
pub struct RateLimitMiddleware {
    limiter: RateLimiter,
}

impl RateLimitMiddleware {
    /// Create middleware backed by `limiter`.
    pub fn new(limiter: RateLimiter) -> Self {
        Self { limiter }
    }

    /// Get the limiter shared by this middleware.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}

#[async_trait::async_trait]
impl Middleware for RateLimitMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let config = self.limiter.config();
        let start = Instant::now();
        if !self
            .limiter
            .wait_for_admission(config.max_wait, config.retry_interval)
            .await
        {
            tracing::warn!(
                method = %req.method(),
                url = %req.url(),
                "request dropped, rate limit admission timed out"
            );
            return Err(reqwest_middleware::Error::middleware(AdmissionTimeout {
                waited: start.elapsed(),
            }));
        }

        next.run(req, extensions).await
    }
}

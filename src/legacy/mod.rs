//! Legacy REST API client.
//!
//! Every request sent through [`LegacyRestClient`] first waits for admission
//! from a shared [`RateLimiter`](crate::rate_limit::RateLimiter). Requests
//! that cannot be admitted in time fail with
//! [`ShopApiError::RateLimitExceeded`](crate::ShopApiError::RateLimitExceeded)
//! and never reach the network.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use shop_api_client::legacy::LegacyRestClient;
//! use shop_api_client::rate_limit::RateLimitConfig;
//!
//! # async fn run() -> Result<(), shop_api_client::ShopApiError> {
//! let client = LegacyRestClient::builder()
//!     .base_url("https://shop.example.com/api/legacy")
//!     .rate_limit_config(
//!         RateLimitConfig::default().with_wait(Duration::from_secs(30), Duration::from_secs(1)),
//!     )
//!     .build()?;
//!
//! let orders = client.get("/orders").await?;
//! # Ok(())
//! # }
//! ```

mod client;

pub use client::{LegacyRestClient, LegacyRestClientBuilder};

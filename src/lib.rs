//! # Shop API Client
//!
//! An async Rust client library for an e-commerce platform's REST API.
//!
//! ## Features
//!
//! - Multi-window rate limiting for the legacy API (100/5s, 400/50s, 1400/500s by default)
//! - Bounded waiting for quota with a configurable deadline
//! - Injectable clock for deterministic tests
//! - Rate limit middleware that plugs into any `reqwest_middleware` stack
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shop_api_client::legacy::LegacyRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LegacyRestClient::builder()
//!         .base_url("https://shop.example.com/api/legacy")
//!         .build()?;
//!     let body = client.get("/products").await?;
//!     println!("{body}");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod legacy;
pub mod rate_limit;

// Re-export commonly used types at crate root
pub use error::{AdmissionTimeout, ShopApiError};
pub use rate_limit::{RateLimitConfig, RateLimiter, WindowRule};

/// Result type alias using ShopApiError
pub type Result<T> = std::result::Result<T, ShopApiError>;

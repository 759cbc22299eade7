//! Error types for the shop client library.

use std::time::Duration;

use thiserror::Error;

/// The main error type for all shop client operations.
#[derive(Error, Debug)]
pub enum ShopApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(reqwest_middleware::Error),

    /// The API answered with a non-success status code
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code
        status: reqwest::StatusCode,
        /// Raw response body
        body: String,
    },

    /// Rate limiter configuration is invalid
    #[error("Invalid rate limit configuration: {0}")]
    InvalidConfig(String),

    /// No quota became available before the wait deadline
    #[error("Rate limit exceeded after waiting {waited:?}")]
    RateLimitExceeded {
        /// How long the caller waited for admission
        waited: Duration,
    },
}

impl ShopApiError {
    /// Check if this error was raised by the local rate limiter.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ShopApiError::RateLimitExceeded { .. })
    }
}

impl From<AdmissionTimeout> for ShopApiError {
    fn from(err: AdmissionTimeout) -> Self {
        ShopApiError::RateLimitExceeded { waited: err.waited }
    }
}

impl From<reqwest_middleware::Error> for ShopApiError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => ShopApiError::Http(e),
            reqwest_middleware::Error::Middleware(e) => match e.downcast_ref::<AdmissionTimeout>() {
                Some(timeout) => timeout.clone().into(),
                None => ShopApiError::HttpMiddleware(reqwest_middleware::Error::Middleware(e)),
            },
        }
    }
}

/// Raised inside the middleware stack when a request could not be admitted in time.
///
/// Converted into [`ShopApiError::RateLimitExceeded`] at the client boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no rate limit quota available within {waited:?}")]
pub struct AdmissionTimeout {
    /// How long the request waited before giving up
    pub waited: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_timeout_maps_to_rate_limit() {
        let err: ShopApiError = AdmissionTimeout {
            waited: Duration::from_secs(2),
        }
        .into();
        assert!(err.is_rate_limit());
        assert_eq!(err.to_string(), "Rate limit exceeded after waiting 2s");
    }

    #[test]
    fn test_middleware_error_unwraps_admission_timeout() {
        let err = reqwest_middleware::Error::middleware(AdmissionTimeout {
            waited: Duration::from_millis(1500),
        });
        match ShopApiError::from(err) {
            ShopApiError::RateLimitExceeded { waited } => {
                assert_eq!(waited, Duration::from_millis(1500))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_config_is_not_rate_limit() {
        let err = ShopApiError::InvalidConfig("empty rule set".to_string());
        assert!(!err.is_rate_limit());
    }
}

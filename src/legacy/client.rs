//! Legacy REST API client implementation.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;

use crate::error::ShopApiError;
use crate::rate_limit::{RateLimitConfig, RateLimitMiddleware, RateLimiter};

/// Client for the legacy REST API.
///
/// Responses are returned as raw body text. Clones share one rate limiter.
#[derive(Clone)]
pub struct LegacyRestClient {
    http_client: ClientWithMiddleware,
    base_url: String,
    rate_limiter: RateLimiter,
}

impl LegacyRestClient {
    /// Create a new client builder.
    pub fn builder() -> LegacyRestClientBuilder {
        LegacyRestClientBuilder::new()
    }

    /// Get the rate limiter gating this client.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Get the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request.
    pub async fn get(&self, endpoint: &str) -> Result<String, ShopApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self.http_client.get(&url).send().await?;
        Self::read_body(response).await
    }

    /// Make a POST request with a JSON body supplied as text.
    pub async fn post(&self, endpoint: &str, body: impl Into<String>) -> Result<String, ShopApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .http_client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.into())
            .send()
            .await?;
        Self::read_body(response).await
    }

    async fn read_body(response: reqwest::Response) -> Result<String, ShopApiError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ShopApiError::Status { status, body })
        }
    }
}

impl std::fmt::Debug for LegacyRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyRestClient")
            .field("base_url", &self.base_url)
            .field("rate_limiter", &self.rate_limiter)
            .finish()
    }
}

/// Builder for [`LegacyRestClient`].
pub struct LegacyRestClientBuilder {
    base_url: Option<String>,
    user_agent: Option<String>,
    rate_limiter: Option<RateLimiter>,
    rate_limit_config: RateLimitConfig,
}

impl LegacyRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            rate_limiter: None,
            rate_limit_config: RateLimitConfig::default(),
        }
    }

    /// Set the base URL of the legacy API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Share an existing rate limiter, e.g. across several clients.
    ///
    /// Takes precedence over [`rate_limit_config`](Self::rate_limit_config).
    pub fn rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Configure the limiter created for this client.
    pub fn rate_limit_config(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit_config = config;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<LegacyRestClient, ShopApiError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ShopApiError::InvalidConfig("base URL is required".to_string()))?;

        let rate_limiter = match self.rate_limiter {
            Some(limiter) => limiter,
            None => RateLimiter::new(self.rate_limit_config)?,
        };

        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("shop-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("shop-api-client"));
        headers.insert(USER_AGENT, header_value);

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let http_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .with(RateLimitMiddleware::new(rate_limiter.clone()))
            .build();

        Ok(LegacyRestClient {
            http_client,
            base_url,
            rate_limiter,
        })
    }
}

impl Default for LegacyRestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Client configuration

use crate::http::Tokens;
use crate::{ClientError, ClientResult};

/// Client configuration for connecting to the POS backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "http://localhost:8080/api")
    pub base_url: String,

    /// Store whose categories, places and orders this client works on
    pub store_id: i64,

    /// Bearer token for authentication
    pub access_token: Option<String>,

    /// Refresh token exchanged once on a 401
    pub refresh_token: Option<String>,

    /// Path of the refresh-token exchange, relative to `base_url`
    pub refresh_path: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Minimum interval between two sales history refreshes
    pub sales_refresh_interval_ms: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>, store_id: i64) -> Self {
        Self {
            base_url: base_url.into(),
            store_id,
            access_token: None,
            refresh_token: None,
            refresh_path: "auth/refresh".to_string(),
            timeout: 30,
            sales_refresh_interval_ms: 1000,
        }
    }

    /// Load configuration from `POS_*` environment variables.
    ///
    /// `POS_STORE_ID` is required; everything else has a default. Tokens
    /// found in `POS_COOKIE` fill in whatever `POS_ACCESS_TOKEN` and
    /// `POS_REFRESH_TOKEN` leave unset.
    pub fn from_env() -> ClientResult<Self> {
        let store_id = std::env::var("POS_STORE_ID")
            .map_err(|_| ClientError::Config("POS_STORE_ID is not set".into()))?
            .parse()
            .map_err(|_| ClientError::Config("POS_STORE_ID must be an integer".into()))?;

        let defaults = Self::new(
            std::env::var("POS_API_URL").unwrap_or_else(|_| "http://localhost:8080".into()),
            store_id,
        );

        let config = Self {
            access_token: std::env::var("POS_ACCESS_TOKEN").ok(),
            refresh_token: std::env::var("POS_REFRESH_TOKEN").ok(),
            refresh_path: std::env::var("POS_REFRESH_PATH").unwrap_or(defaults.refresh_path.clone()),
            timeout: std::env::var("POS_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout),
            sales_refresh_interval_ms: std::env::var("POS_SALES_REFRESH_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sales_refresh_interval_ms),
            ..defaults
        };

        Ok(match std::env::var("POS_COOKIE") {
            Ok(cookie) => config.with_cookie(&cookie),
            Err(_) => config,
        })
    }

    /// Set the store id
    pub fn with_store_id(mut self, store_id: i64) -> Self {
        self.store_id = store_id;
        self
    }

    /// Set the access token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the refresh token
    pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(token.into());
        self
    }

    /// Take tokens from a `Cookie` header value. Tokens already set win.
    pub fn with_cookie(mut self, header: &str) -> Self {
        let tokens = Tokens::from_cookie_header(header);
        self.access_token = self.access_token.or(tokens.access);
        self.refresh_token = self.refresh_token.or(tokens.refresh);
        self
    }

    /// Set the refresh endpoint path
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the minimum interval between sales refreshes
    pub fn with_sales_refresh_interval(mut self, millis: u64) -> Self {
        self.sales_refresh_interval_ms = millis;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<super::NetworkHttpClient> {
        super::NetworkHttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080", 1)
    }
}

//! HTTP client for the POS backend
//!
//! Every request carries `Authorization: Bearer <access token>`. A 401
//! triggers exactly one refresh-token exchange followed by one retry of
//! the failed request; a second 401 is surfaced as
//! [`ClientError::Unauthorized`].

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{ClientConfig, ClientError, ClientResult};

/// Access / refresh token pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

impl Tokens {
    /// Read the token pair from a `Cookie` header value, the way the BFF
    /// stores them (`accessToken=...; refreshToken=...`).
    pub fn from_cookie_header(header: &str) -> Self {
        let mut tokens = Self::default();
        for pair in header.split(';') {
            let Some((name, value)) = pair.trim().split_once('=') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match name.trim() {
                "accessToken" | "access_token" => tokens.access = Some(value.to_string()),
                "refreshToken" | "refresh_token" => tokens.refresh = Some(value.to_string()),
                _ => {}
            }
        }
        tokens
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest {
    refresh_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    fn token(&self) -> Option<String>;
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    refresh_path: String,
    tokens: Arc<RwLock<Tokens>>,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            refresh_path: config.refresh_path.clone(),
            tokens: Arc::new(RwLock::new(Tokens {
                access: config.access_token.clone(),
                refresh: config.refresh_token.clone(),
            })),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> Tokens {
        self.tokens.read().clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_header(&self) -> Option<String> {
        self.tokens
            .read()
            .access
            .as_ref()
            .map(|t| format!("Bearer {}", t))
    }

    async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> ClientResult<reqwest::Response> {
        let mut req = self.client.request(method.clone(), self.url(path));
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        Ok(req.send().await?)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ClientResult<T> {
        let response = self.dispatch(&method, path, body.as_ref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::handle_response(response).await;
        }

        tracing::debug!(%method, path, "Access token rejected, refreshing");
        self.refresh().await?;
        let response = self.dispatch(&method, path, body.as_ref()).await?;
        Self::handle_response(response).await
    }

    /// Exchange the refresh token for a new access token
    async fn refresh(&self) -> ClientResult<()> {
        let refresh_token = self.tokens.read().refresh.clone();
        let Some(refresh_token) = refresh_token else {
            tracing::warn!("No refresh token available");
            return Err(ClientError::Unauthorized);
        };

        let response = self
            .client
            .post(self.url(&self.refresh_path))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Token refresh failed");
            return Err(ClientError::Unauthorized);
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("refresh response: {}", e)))?;

        let mut tokens = self.tokens.write();
        tokens.access = Some(refreshed.access_token);
        if let Some(refresh) = refreshed.refresh_token {
            tokens.refresh = Some(refresh);
        }
        tracing::info!("Access token refreshed");
        Ok(())
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
                _ => Err(ClientError::Api {
                    status,
                    message: text,
                }),
            };
        }

        // DELETE and some PATCH routes answer with an empty body
        if text.trim().is_empty() {
            return Ok(serde_json::from_str("null")?);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, Some(body)).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.send(Method::PATCH, path, Some(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::DELETE, path, None).await
    }

    fn token(&self) -> Option<String> {
        self.tokens.read().access.clone()
    }
}

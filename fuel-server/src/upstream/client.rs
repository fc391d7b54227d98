//! FuelCheck HTTP client.
//!
//! Handles the OAuth client-credentials exchange, per-request correlation
//! headers and the retry-on-unauthorized policy.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tokio::sync::RwLock;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::convert::{PriceUpdate, convert_prices_response};
use super::error::UpstreamError;
use super::source::PriceSource;
use super::types::{AccessTokenResponse, PricesResponse};

/// Default base URL for the NSW API gateway.
const DEFAULT_BASE_URL: &str = "https://api.onegov.nsw.gov.au";

const TOKEN_PATH: &str = "/oauth/client_credential/accesstoken";
const FULL_PRICES_PATH: &str = "/FuelPriceCheck/v1/fuel/prices";
const NEW_PRICES_PATH: &str = "/FuelPriceCheck/v1/fuel/prices/new";

/// Default number of retries after a 401.
const DEFAULT_AUTH_RETRIES: u32 = 1;

/// Default delay before retrying after a 401.
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Configuration for the FuelCheck client.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// API key, sent as the `apikey` header and used for the token exchange
    pub api_key: String,
    /// API secret, used only for the token exchange
    pub api_secret: String,
    /// Base URL for the API (defaults to the NSW gateway)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// How many times to retry a fetch after HTTP 401
    pub auth_retries: u32,
    /// Delay before each 401 retry
    pub retry_backoff: Duration,
}

impl UpstreamConfig {
    /// Create a new config with the given credentials.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            auth_retries: DEFAULT_AUTH_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the number of retries after HTTP 401.
    pub fn with_auth_retries(mut self, retries: u32) -> Self {
        self.auth_retries = retries;
        self
    }

    /// Set the delay before each 401 retry.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }
}

/// FuelCheck API client.
///
/// Cheap to clone; clones share the cached token and the call counter.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    basic_credentials: HeaderValue,
    auth_retries: u32,
    retry_backoff: Duration,
    token: Arc<RwLock<Option<String>>>,
    calls: Arc<AtomicU64>,
}

impl UpstreamClient {
    /// Create a new client with the given configuration.
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| UpstreamError::Config("invalid API key format".to_string()))?;
        headers.insert(HeaderName::from_static("apikey"), api_key);

        let encoded = BASE64.encode(format!("{}:{}", config.api_key, config.api_secret));
        let mut basic_credentials = HeaderValue::from_str(&format!("Basic {encoded}"))
            .map_err(|_| UpstreamError::Config("invalid API credentials".to_string()))?;
        basic_credentials.set_sensitive(true);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            basic_credentials,
            auth_retries: config.auth_retries,
            retry_backoff: config.retry_backoff,
            token: Arc::new(RwLock::new(None)),
            calls: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Exchange the API credentials for a bearer token.
    ///
    /// On success the token is cached for subsequent fetches. On failure the
    /// cached token is cleared, the response is logged and the error is
    /// returned without retrying.
    pub async fn acquire_token(&self) -> Result<String, UpstreamError> {
        let url = format!("{}{}", self.base_url, TOKEN_PATH);

        self.calls.fetch_add(1, Ordering::Relaxed);
        let result = self.request_token(&url).await;

        let mut cached = self.token.write().await;
        match result {
            Ok(token) => {
                *cached = Some(token.clone());
                Ok(token)
            }
            Err(e) => {
                error!(error = %e, "could not generate access token");
                *cached = None;
                Err(e)
            }
        }
    }

    async fn request_token(&self, url: &str) -> Result<String, UpstreamError> {
        let response = self
            .http
            .get(url)
            .query(&[("grant_type", "client_credentials")])
            .header(AUTHORIZATION, self.basic_credentials.clone())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(UpstreamError::Auth {
                status: status.as_u16(),
                message: body,
            });
        }

        let token: AccessTokenResponse =
            serde_json::from_str(&body).map_err(|e| UpstreamError::json(&e, &body))?;
        debug!(
            token_type = token.token_type.as_deref().unwrap_or(""),
            expires_in = token.expires_in.as_deref().unwrap_or(""),
            "acquired access token"
        );

        Ok(token.access_token)
    }

    /// Fetch every station and current price.
    pub async fn fetch_full(&self) -> Result<PriceUpdate, UpstreamError> {
        self.fetch_prices(FULL_PRICES_PATH, "full").await
    }

    /// Fetch stations and prices updated since the last fetch.
    pub async fn fetch_incremental(&self) -> Result<PriceUpdate, UpstreamError> {
        self.fetch_prices(NEW_PRICES_PATH, "incremental").await
    }

    /// Number of HTTP attempts made so far, token requests and retries
    /// included.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Authenticated GET with a bounded retry on 401.
    ///
    /// Every attempt carries a fresh `transactionid` and `requesttimestamp`.
    /// Statuses other than 401, and transport errors, are returned at once.
    async fn fetch_prices(
        &self,
        path: &str,
        operation: &'static str,
    ) -> Result<PriceUpdate, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);

        if self.token.read().await.is_none() {
            // A failure here is logged by acquire_token; the request below
            // then goes out with an empty bearer and takes the 401 path.
            let _ = self.acquire_token().await;
        }

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let token = self.token.read().await.clone().unwrap_or_default();

            self.calls.fetch_add(1, Ordering::Relaxed);
            let response = self
                .http
                .get(&url)
                .bearer_auth(&token)
                .header("transactionid", Uuid::new_v4().to_string())
                .header("requesttimestamp", request_timestamp(Utc::now()))
                .header(CONTENT_TYPE, "application/json; charset=utf-8")
                .send()
                .await?;

            let status = response.status();

            if status.is_success() {
                let body = response.text().await?;
                return parse_prices(&body, operation);
            }

            let body = response.text().await.unwrap_or_default();

            if status == StatusCode::UNAUTHORIZED {
                if attempt <= self.auth_retries {
                    warn!(
                        operation,
                        attempt,
                        body = %body,
                        "unauthorized, refreshing token and retrying"
                    );
                    tokio::time::sleep(self.retry_backoff).await;
                    let _ = self.acquire_token().await;
                    continue;
                }

                error!(operation, attempts = attempt, "still unauthorized after token refresh");
                return Err(UpstreamError::Unauthorized { attempts: attempt });
            }

            error!(operation, status = status.as_u16(), body = %body, "price request failed");
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
    }
}

impl PriceSource for UpstreamClient {
    async fn fetch_full(&self) -> Result<PriceUpdate, UpstreamError> {
        UpstreamClient::fetch_full(self).await
    }

    async fn fetch_incremental(&self) -> Result<PriceUpdate, UpstreamError> {
        UpstreamClient::fetch_incremental(self).await
    }

    fn call_count(&self) -> u64 {
        UpstreamClient::call_count(self)
    }
}

/// Decode a prices body. An empty body means nothing changed.
fn parse_prices(body: &str, operation: &'static str) -> Result<PriceUpdate, UpstreamError> {
    if body.trim().is_empty() {
        debug!(operation, "empty prices body");
        return Ok(PriceUpdate::default());
    }

    let response: PricesResponse =
        serde_json::from_str(body).map_err(|e| UpstreamError::json(&e, body))?;
    let update = convert_prices_response(response);

    debug!(
        operation,
        stations = update.stations.len(),
        prices = update.prices.len(),
        "fetched prices"
    );

    Ok(update)
}

/// Format a `requesttimestamp` header value, e.g. `19/10/2026 02:05:09 PM`.
fn request_timestamp(now: DateTime<Utc>) -> String {
    now.format("%d/%m/%Y %I:%M:%S %p").to_string()
}

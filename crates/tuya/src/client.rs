//! HTTP client for the Tuya OpenAPI.
//!
//! Wraps [`reqwest`] with request signing and a lazily obtained access
//! token. The token is fetched on first use, refreshed once it is within a
//! minute of expiry, and dropped when the vendor reports it invalid so the
//! next call grants a new one.

use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use socbridge_core::telemetry::DataPoint;
use tokio::sync::Mutex;

use crate::error::TuyaError;
use crate::sign::{string_to_sign, RequestSigner, SIGN_METHOD};
use crate::token::{TokenInfo, TokenResult, TOKEN_PATH};

/// Default OpenAPI endpoint (Western America data center).
pub const DEFAULT_ENDPOINT: &str = "https://openapi.tuyaus.com";

/// Default timeout for a single upstream request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for one Tuya cloud project.
#[derive(Clone)]
pub struct TuyaConfig {
    /// Base URL without trailing slash, e.g. `https://openapi.tuyaeu.com`.
    pub endpoint: String,
    pub access_id: String,
    pub access_secret: String,
    /// Value of the `lang` header.
    pub lang: String,
    pub timeout: Duration,
}

impl TuyaConfig {
    pub fn new(
        endpoint: impl Into<String>,
        access_id: impl Into<String>,
        access_secret: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            access_id: access_id.into(),
            access_secret: access_secret.into(),
            lang: "en".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for TuyaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TuyaConfig")
            .field("endpoint", &self.endpoint)
            .field("access_id", &self.access_id)
            .field("access_secret", &"<redacted>")
            .field("lang", &self.lang)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Response envelope shared by every OpenAPI endpoint.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    result: Option<T>,
    code: Option<i64>,
    msg: Option<String>,
    /// Server time in milliseconds.
    #[serde(default)]
    t: i64,
}

impl<T> ApiEnvelope<T> {
    fn into_result(self) -> Result<T, TuyaError> {
        if !self.success {
            return Err(TuyaError::Api {
                code: self.code.unwrap_or_default(),
                msg: self.msg.unwrap_or_default(),
            });
        }
        self.result.ok_or(TuyaError::MissingResult)
    }
}

/// Signed OpenAPI client for a single cloud project.
pub struct TuyaOpenApi {
    client: reqwest::Client,
    endpoint: String,
    lang: String,
    signer: RequestSigner,
    token: Mutex<Option<TokenInfo>>,
}

impl TuyaOpenApi {
    pub fn new(config: TuyaConfig) -> Result<Self, TuyaError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing [`reqwest::Client`]. The config's timeout is ignored.
    pub fn with_client(client: reqwest::Client, config: TuyaConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint,
            lang: config.lang,
            signer: RequestSigner::new(config.access_id, config.access_secret),
            token: Mutex::new(None),
        }
    }

    /// Grant a fresh access token, replacing any cached one.
    pub async fn connect(&self) -> Result<(), TuyaError> {
        let mut guard = self.token.lock().await;
        let token = self.grant_token().await?;
        tracing::info!(uid = %token.uid, "Obtained Tuya access token");
        *guard = Some(token);
        Ok(())
    }

    /// Whether a token is currently cached.
    pub async fn is_connected(&self) -> bool {
        self.token.lock().await.is_some()
    }

    /// Signed GET returning the envelope's `result`.
    ///
    /// Obtains or refreshes the access token first when needed. A
    /// token-invalid answer clears the cached token; the error is still
    /// returned to the caller.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TuyaError> {
        let access_token = self.access_token().await?;
        let envelope: ApiEnvelope<T> = self.send(path, query, Some(&access_token)).await?;

        match envelope.into_result() {
            Err(err) if err.is_token_invalid() => {
                tracing::warn!(path, "Tuya rejected the access token, clearing it");
                *self.token.lock().await = None;
                Err(err)
            }
            other => other,
        }
    }

    /// Current data point values of one device.
    pub async fn device_status(&self, device_id: &str) -> Result<Vec<DataPoint>, TuyaError> {
        let points: Vec<DataPoint> = self
            .get(&format!("/v1.0/devices/{device_id}/status"), &[])
            .await?;
        tracing::debug!(device_id, count = points.len(), "Fetched device status");
        Ok(points)
    }

    // ---- private helpers ----

    /// Return a usable access token, granting or refreshing as needed.
    async fn access_token(&self) -> Result<String, TuyaError> {
        let mut guard = self.token.lock().await;
        let now = Utc::now().timestamp_millis();

        let token = match guard.take() {
            Some(token) if !token.is_expired(now) => token,
            Some(expired) => {
                tracing::debug!("Refreshing Tuya access token");
                self.request_token(&expired.refresh_path(), &[]).await?
            }
            None => {
                tracing::debug!("Granting Tuya access token");
                self.grant_token().await?
            }
        };

        let access_token = token.access_token.clone();
        *guard = Some(token);
        Ok(access_token)
    }

    async fn grant_token(&self) -> Result<TokenInfo, TuyaError> {
        self.request_token(TOKEN_PATH, &[("grant_type", "1")]).await
    }

    async fn request_token(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<TokenInfo, TuyaError> {
        let envelope: ApiEnvelope<TokenResult> = self.send(path, query, None).await?;
        let issued_at = if envelope.t > 0 {
            envelope.t
        } else {
            Utc::now().timestamp_millis()
        };
        let result = envelope.into_result()?;
        Ok(TokenInfo::from_result(result, issued_at))
    }

    /// Sign and send a GET request, parsing the JSON envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        access_token: Option<&str>,
    ) -> Result<ApiEnvelope<T>, TuyaError> {
        let t = Utc::now().timestamp_millis();
        let sign = self
            .signer
            .sign(access_token, t, &string_to_sign("GET", path, query, ""));

        let mut request = self
            .client
            .get(format!("{}{}", self.endpoint, path))
            .query(query)
            .header("client_id", self.signer.access_id())
            .header("sign", sign)
            .header("sign_method", SIGN_METHOD)
            .header("t", t.to_string())
            .header("lang", &self.lang);
        if let Some(token) = access_token {
            request = request.header("access_token", token);
        }

        let response = request.send().await?;
        Self::parse_response(response).await
    }

    /// Ensure a 2xx status and decode the JSON body.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TuyaError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TuyaError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

//! HTTP executors for the Starling public API.
//!
//! One [`StarlingClient`] is built per process and shared by every tool call. It is immutable
//! after construction: the access token, signing key and connection pool never change.

use crate::config::ApiConfig;
use crate::error::{Result, StarlingApiError};
use crate::response::{error_for_status, parse_response};
use crate::signing::SigningState;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use url::Url;

const JSON_MIME: &str = "application/json";

#[derive(Clone)]
pub struct StarlingClient {
    inner: Arc<StarlingClientInner>,
}

struct StarlingClientInner {
    base_url: String,
    access_token: String,
    signing: SigningState,
    http: Client,
}

impl StarlingClient {
    /// Build a client from configuration.
    ///
    /// Signing key problems are not fatal here; they are reported by
    /// [`StarlingClient::signed_call`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the token is empty or the base URL is invalid, and a
    /// request error if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder()
            .build()
            .map_err(|e| StarlingApiError::Request(format!("failed to build HTTP client: {e}")))?;
        let signing = SigningState::from_material(config.signing.as_ref());
        Ok(Self {
            inner: Arc::new(StarlingClientInner {
                base_url: config.base_url,
                access_token: config.access_token,
                signing,
                http,
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    #[must_use]
    pub fn signing(&self) -> &SigningState {
        &self.inner.signing
    }

    /// Bearer-authenticated JSON call. At most one attempt; no retries.
    ///
    /// `endpoint` is the path plus optional query string, e.g. `/api/v2/accounts`.
    ///
    /// # Errors
    ///
    /// Returns transport errors, API errors for non-2xx statuses and parse errors for malformed
    /// JSON bodies.
    pub async fn call(&self, endpoint: &str, method: Method, body: Option<&Value>) -> Result<Value> {
        let body_json = serialize_body(body)?;
        let url = self.url(endpoint)?;
        debug!(method = %method, endpoint = %path_only(endpoint), "starling api call");

        let mut request = self
            .inner
            .http
            .request(method, url)
            .bearer_auth(&self.inner.access_token)
            .header(ACCEPT, JSON_MIME);
        if let Some(text) = body_json {
            request = request.header(CONTENT_TYPE, JSON_MIME).body(text);
        }

        parse_response(request.send().await?).await
    }

    /// Bearer + signature authenticated JSON call (payment creation).
    ///
    /// The signing key is checked before anything touches the network. The date and digest are
    /// computed once and used for both the signature and the headers, so they always agree.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no usable signing key is configured, otherwise the
    /// same errors as [`StarlingClient::call`].
    pub async fn signed_call(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Value> {
        let signer = self.inner.signing.signer()?;
        let body_json = serialize_body(body)?;
        let url = self.url(endpoint)?;
        let artifact = signer.sign(&method, endpoint, body_json.as_deref())?;
        debug!(method = %method, endpoint = %path_only(endpoint), key_uid = signer.key_uid(), "signed starling api call");

        let mut request = self
            .inner
            .http
            .request(method, url)
            .header(AUTHORIZATION, artifact.authorization(&self.inner.access_token))
            .header(ACCEPT, JSON_MIME)
            .header("Date", &artifact.date)
            .header("Digest", &artifact.digest);
        if let Some(text) = body_json {
            request = request.header(CONTENT_TYPE, JSON_MIME).body(text);
        }

        parse_response(request.send().await?).await
    }

    /// POST raw bytes. `Content-Type` is only sent when given.
    ///
    /// # Errors
    ///
    /// Same as [`StarlingClient::call`].
    pub async fn upload_binary(
        &self,
        endpoint: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<Value> {
        let url = self.url(endpoint)?;
        debug!(endpoint = %path_only(endpoint), bytes = data.len(), "starling api upload");

        let mut request = self
            .inner
            .http
            .post(url)
            .bearer_auth(&self.inner.access_token)
            .body(data);
        if let Some(ct) = content_type {
            request = request.header(CONTENT_TYPE, ct);
        }

        parse_response(request.send().await?).await
    }

    /// GET raw bytes.
    ///
    /// # Errors
    ///
    /// Returns transport errors and API errors for non-2xx statuses.
    pub async fn download_binary(&self, endpoint: &str) -> Result<Vec<u8>> {
        let url = self.url(endpoint)?;
        debug!(endpoint = %path_only(endpoint), "starling api download");

        let response = self
            .inner
            .http
            .get(url)
            .bearer_auth(&self.inner.access_token)
            .send()
            .await?;
        let response = error_for_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    fn url(&self, endpoint: &str) -> Result<Url> {
        build_url(&self.inner.base_url, endpoint)
    }
}

fn build_url(base_url: &str, endpoint: &str) -> Result<Url> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), endpoint);
    Url::parse(&url).map_err(|e| StarlingApiError::Request(format!("Invalid URL: {e}")))
}

fn path_only(endpoint: &str) -> &str {
    endpoint.split('?').next().unwrap_or(endpoint)
}

/// JSON text for a request body, or `None` when the value does not count as a body.
///
/// Absent, `null`, `false`, `0` and `""` are all "no body": no payload, no `Content-Type`, and
/// the `X` digest on signed calls.
///
/// # Errors
///
/// Returns a request error if the value cannot be serialised.
pub fn serialize_body(body: Option<&Value>) -> Result<Option<String>> {
    match body {
        Some(v) if is_truthy(v) => serde_json::to_string(v)
            .map(Some)
            .map_err(|e| StarlingApiError::Request(format!("failed to serialize body: {e}"))),
        _ => Ok(None),
    }
}

#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

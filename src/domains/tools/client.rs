//! HTTP client for the upstream Carity API.
//!
//! Every tool call becomes exactly one `POST {base_url}{endpoint}` with a
//! JSON body and the `X-API-KEY` header. Failures come back as a typed
//! [`UpstreamError`] rather than a raw `reqwest::Error`.

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, StatusCode,
    header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::core::config::Config;
use crate::core::{Error, Result};

/// Header carrying the API key (`X-API-KEY`; header names are case-insensitive).
pub const API_KEY_HEADER: &str = "x-api-key";

const UNKNOWN_API_ERROR: &str = "Unknown API error occurred";

/// Why an upstream call did not produce a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The API answered with a non-2xx status.
    #[error("{message} (Status: {status})")]
    Status { status: u16, message: String },

    /// No response: connection refused, timeout, reset, unreadable body.
    #[error("{message} (Status: N/A)")]
    Transport { message: String },

    /// The request could not be issued at all.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Something that can POST a JSON body to an upstream path.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Issue one POST and return the parsed response body.
    async fn post(&self, path: &str, body: &Value) -> std::result::Result<Value, UpstreamError>;
}

/// Carity API client built once from [`Config`].
#[derive(Debug, Clone)]
pub struct CarityClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl CarityClient {
    /// Build the client with fixed headers and timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut api_key = HeaderValue::from_str(&config.credentials.upstream_api_key)
            .map_err(|_| Error::config("API_KEY contains characters not allowed in a header"))?;
        api_key.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        let timeout = config.timeout();
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.upstream.base_url.clone(),
            timeout,
        })
    }

    /// Full URL for an endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn classify(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_builder() {
            UpstreamError::Unexpected(error_chain(&err))
        } else if err.is_timeout() {
            UpstreamError::Transport {
                message: format!("timeout of {}ms exceeded", self.timeout.as_millis()),
            }
        } else {
            UpstreamError::Transport {
                message: non_empty(error_chain(&err)),
            }
        }
    }
}

#[async_trait]
impl Upstream for CarityClient {
    async fn post(&self, path: &str, body: &Value) -> std::result::Result<Value, UpstreamError> {
        let url = self.url(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) if status.is_success() => return Err(self.classify(e)),
            Err(e) => {
                debug!("{} responded {} with an unreadable body: {}", url, status, e);
                return Err(UpstreamError::Status {
                    status: status.as_u16(),
                    message: generic_status_message(status),
                });
            }
        };
        let payload = parse_body(&bytes);
        debug!("{} responded {}", url, status);

        if status.is_success() {
            Ok(payload)
        } else {
            Err(UpstreamError::Status {
                status: status.as_u16(),
                message: status_message(status, &payload),
            })
        }
    }
}

/// Parse a response body; non-JSON text (including an empty body) is kept
/// as a JSON string.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Pick the most specific message for a failed response: the body's
/// `message`, then its `error`, then a generic status line.
fn status_message(status: StatusCode, payload: &Value) -> String {
    ["message", "error"]
        .iter()
        .filter_map(|key| payload.get(*key))
        .find_map(truthy_text)
        .unwrap_or_else(|| generic_status_message(status))
}

fn generic_status_message(status: StatusCode) -> String {
    non_empty(format!("Request failed with status code {}", status.as_u16()))
}

/// Render a JSON value as message text, skipping "empty" values
/// (`null`, `false`, `0`, `""`).
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

fn non_empty(message: String) -> String {
    if message.trim().is_empty() {
        UNKNOWN_API_ERROR.to_string()
    } else {
        message
    }
}

/// `reqwest::Error` displays only its outermost layer; include the causes.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

//! HTTP transport for JSON-RPC requests.
//!
//! One `post` is one HTTP attempt. No retries happen here; a non-2xx status,
//! a connection failure or an undecodable body are all `TransportError`s,
//! while a 2xx body carrying an `error` member is returned as a normal
//! `RpcResponse`.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;
use url::Url;

use super::protocol::{RpcRequest, RpcResponse};

/// Per-request timeout for the HTTP client.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Failure to complete a request/response exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("API key contains characters not allowed in an HTTP header")]
    InvalidApiKey,

    #[error("{method} request to {endpoint} failed: {source}")]
    Request {
        method: String,
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} request to {endpoint} returned HTTP {status}: {body}")]
    Status {
        method: String,
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("{method} response from {endpoint} is not a JSON-RPC envelope: {source}")]
    Decode {
        method: String,
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{method} response from {endpoint} has id {got}, expected {expected}")]
    IdMismatch {
        method: String,
        endpoint: String,
        expected: u64,
        got: serde_json::Value,
    },
}

impl TransportError {
    /// HTTP status for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Something that can deliver one JSON-RPC request and return its response.
pub trait Transport {
    /// Endpoint description used in diagnostics.
    fn endpoint(&self) -> &str;

    fn post(&self, request: &RpcRequest) -> Result<RpcResponse, TransportError>;
}

/// Blocking HTTP POST transport authenticated with `X-API-KEY`.
///
/// The underlying connection pool lives as long as this value; dropping the
/// owning client releases it.
pub struct HttpTransport {
    http: reqwest::blocking::Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(endpoint: Url, api_key: &str) -> Result<Self, TransportError> {
        Self::with_timeout(endpoint, api_key, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: Url,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let mut key = HeaderValue::from_str(api_key).map_err(|_| TransportError::InvalidApiKey)?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);

        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(TransportError::Client)?;

        tracing::debug!(
            endpoint = %endpoint,
            timeout_secs = timeout.as_secs(),
            "created HTTP transport"
        );

        Ok(Self { http, endpoint })
    }
}

impl Transport for HttpTransport {
    fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    fn post(&self, request: &RpcRequest) -> Result<RpcResponse, TransportError> {
        let endpoint = self.endpoint.as_str();
        tracing::debug!(endpoint, method = %request.method, id = request.id, "POST");
        if tracing::enabled!(tracing::Level::TRACE) {
            tracing::trace!(
                payload = %serde_json::to_string_pretty(request).unwrap_or_default(),
                "request payload"
            );
        }

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .map_err(|source| TransportError::Request {
                method: request.method.clone(),
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(TransportError::Status {
                method: request.method.clone(),
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().map_err(|source| TransportError::Request {
            method: request.method.clone(),
            endpoint: endpoint.to_string(),
            source,
        })?;
        tracing::trace!(body = %text, "response body");

        serde_json::from_str(&text).map_err(|source| TransportError::Decode {
            method: request.method.clone(),
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

//! SearchAtlas MCP protocol client.
//!
//! protocol  -> JSON-RPC envelopes
//! transport -> Transport trait + blocking HTTP implementation
//! client    -> RpcClient (ids, tools/list, tools/call, schema discovery)
//! poll      -> TaskPoller (status checks, poll loop)
//!
//! Endpoint parsing lives here: the endpoint must be an absolute http(s) URL.

use anyhow::{Result, bail};
use url::Url;

pub mod client;
pub mod poll;
pub mod protocol;
pub mod transport;

pub use client::RpcClient;
pub use poll::{PollConfig, PollOutcome, TaskFamily, TaskPoller};
pub use protocol::{RpcRequest, RpcResponse};
pub use transport::{HttpTransport, Transport, TransportError};

/// Default SearchAtlas MCP endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://mcp.searchatlas.com/api/v1/mcp";

/// Parse an `--endpoint` value.
///
/// Accepts only absolute `http` / `https` URLs; anything else is rejected
/// before a client is built.
pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("Endpoint is empty");
    }
    let url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(e) => bail!("Invalid endpoint URL '{trimmed}': {e}"),
    };
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("Unsupported endpoint scheme '{other}' (expected http or https)"),
    }
}

/// Build a client for `endpoint` authenticated with `api_key`.
pub fn connect(endpoint: &Url, api_key: &str) -> Result<RpcClient, TransportError> {
    let transport = HttpTransport::new(endpoint.clone(), api_key)?;
    Ok(RpcClient::new(transport))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_parses() {
        let url = parse_endpoint(DEFAULT_ENDPOINT).unwrap();
        assert_eq!(url.host_str(), Some("mcp.searchatlas.com"));
        assert_eq!(url.path(), "/api/v1/mcp");
    }

    #[test]
    fn local_http_endpoint_accepted() {
        let url = parse_endpoint(" http://127.0.0.1:8080/mcp ").unwrap();
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn non_http_scheme_rejected() {
        let err = parse_endpoint("wss://mcp.example/ws").unwrap_err();
        assert!(err.to_string().contains("scheme"));
    }

    #[test]
    fn relative_endpoint_rejected() {
        assert!(parse_endpoint("/api/v1/mcp").is_err());
    }

    #[test]
    fn empty_endpoint_rejected() {
        let err = parse_endpoint("   ").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}

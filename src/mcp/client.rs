//! JSON-RPC client: request ids, tool invocation, schema discovery.

use std::cell::Cell;

use serde_json::{Map, Value};

use super::protocol::{METHOD_TOOLS_CALL, METHOD_TOOLS_LIST, RpcRequest, RpcResponse};
use super::transport::{HttpTransport, Transport, TransportError};

/// Client for the SearchAtlas MCP endpoint.
///
/// Each instance owns its id counter: ids start at 1 and increase by one per
/// request, never reused. Nothing is shared between instances.
pub struct RpcClient<T = HttpTransport> {
    transport: T,
    next_id: Cell<u64>,
}

impl<T: Transport> RpcClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            next_id: Cell::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    fn take_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// Send one JSON-RPC request and return the matching response.
    pub fn send(&self, method: &str, params: Value) -> Result<RpcResponse, TransportError> {
        let request = RpcRequest::new(self.take_id(), method, params);
        let response = self.transport.post(&request)?;

        if !response.matches_id(request.id) {
            return Err(TransportError::IdMismatch {
                method: request.method,
                endpoint: self.endpoint().to_string(),
                expected: request.id,
                got: response.id.unwrap_or(Value::Null),
            });
        }
        if let Some(err) = &response.error {
            tracing::debug!(code = err.code, message = %err.message, "RPC error");
        }
        Ok(response)
    }

    /// `tools/list` with no arguments.
    pub fn list_tools(&self) -> Result<RpcResponse, TransportError> {
        self.send(METHOD_TOOLS_LIST, Value::Object(Map::new()))
    }

    /// `tools/call` for `name` / `op`. `params` is passed through unvalidated.
    pub fn call_tool(
        &self,
        name: &str,
        op: &str,
        params: Map<String, Value>,
    ) -> Result<RpcResponse, TransportError> {
        self.send(
            METHOD_TOOLS_CALL,
            RpcRequest::tool_call_params(name, op, params),
        )
    }

    /// Probe `name` / `op` with an empty parameter set.
    ///
    /// The server answers a call missing required parameters with an error
    /// whose `data` holds the expected schema; the response is returned as-is.
    pub fn discover_schema(&self, name: &str, op: &str) -> Result<RpcResponse, TransportError> {
        self.call_tool(name, op, Map::new())
    }
}

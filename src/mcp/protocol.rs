//! JSON-RPC 2.0 envelopes used on the wire.
//!
//! Requests are always typed. Responses keep `result` / `error.data` as raw
//! JSON because their shape is owned by the server (tool-defined results,
//! schema payloads inside validation errors).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// JSON-RPC version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// Method used to enumerate tools.
pub const METHOD_TOOLS_LIST: &str = "tools/list";

/// Method used to invoke a tool operation.
pub const METHOD_TOOLS_CALL: &str = "tools/call";

/// A JSON-RPC request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Value,
}

impl RpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }

    /// `tools/call` params: `{name, arguments: {op, params}}`.
    pub fn tool_call_params(name: &str, op: &str, params: Map<String, Value>) -> Value {
        serde_json::json!({
            "name": name,
            "arguments": {
                "op": op,
                "params": Value::Object(params),
            }
        })
    }
}

/// A JSON-RPC response envelope.
///
/// An `error` member is a protocol-level outcome, not a failure of the
/// exchange; callers render it like any other response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// `Some` whenever the key is present, including an explicit `null`.
fn present<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(de).map(Some)
}

impl RpcResponse {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whether the envelope id is compatible with `expected`.
    ///
    /// A missing or `null` id is accepted: servers answer envelope-level
    /// failures (parse errors, invalid requests) with `id: null`.
    pub fn matches_id(&self, expected: u64) -> bool {
        match &self.id {
            None | Some(Value::Null) => true,
            Some(v) => v.as_u64() == Some(expected),
        }
    }

    /// `result[0].text`, the nested JSON string most tools answer with.
    pub fn first_text(&self) -> Option<&str> {
        self.result
            .as_ref()?
            .as_array()?
            .first()?
            .get("text")?
            .as_str()
    }
}

/// A JSON-RPC error object.
///
/// `data` is forwarded untouched: on missing-parameter errors the server
/// puts the expected schema there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_with_version() {
        let req = RpcRequest::new(3, METHOD_TOOLS_LIST, json!({}));
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(
            v,
            json!({"jsonrpc":"2.0","id":3,"method":"tools/list","params":{}})
        );
    }

    #[test]
    fn tool_call_params_shape() {
        let mut params = Map::new();
        params.insert("hostname".into(), json!("searchatlas.com"));
        let v = RpcRequest::tool_call_params("brand_vault", "get_brand_vault_overview", params);
        assert_eq!(v["name"], "brand_vault");
        assert_eq!(v["arguments"]["op"], "get_brand_vault_overview");
        assert_eq!(v["arguments"]["params"]["hostname"], "searchatlas.com");
    }

    #[test]
    fn response_with_error_and_schema_data() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"missing field","data":{"required":["project_uuid"]}}}"#;
        let resp: RpcResponse = serde_json::from_str(raw).unwrap();
        assert!(resp.is_error());
        let err = resp.error.unwrap();
        assert_eq!(err.code, -32602);
        assert_eq!(err.data, Some(json!({"required":["project_uuid"]})));
    }

    #[test]
    fn id_matching_tolerates_null() {
        let resp: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32700,"message":"parse"}}"#)
                .unwrap();
        assert!(resp.matches_id(9));

        let resp: RpcResponse = serde_json::from_str(r#"{"id":4,"result":[]}"#).unwrap();
        assert!(resp.matches_id(4));
        assert!(!resp.matches_id(5));
    }

    #[test]
    fn first_text_reads_nested_content() {
        let resp: RpcResponse =
            serde_json::from_str(r#"{"id":1,"result":[{"type":"text","text":"{\"a\":1}"}]}"#)
                .unwrap();
        assert_eq!(resp.first_text(), Some(r#"{"a":1}"#));

        let resp: RpcResponse = serde_json::from_str(r#"{"id":1,"result":{"tools":[]}}"#).unwrap();
        assert_eq!(resp.first_text(), None);
    }

    #[test]
    fn null_result_survives_round_trip() {
        let body = json!({"jsonrpc": "2.0", "id": 1, "result": null});
        let resp: RpcResponse = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(resp.result, Some(Value::Null));
        assert_eq!(serde_json::to_value(&resp).unwrap(), body);

        let absent: RpcResponse = serde_json::from_value(json!({"id": 1})).unwrap();
        assert_eq!(absent.result, None);
    }
}

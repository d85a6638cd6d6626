/*!
render.rs - turning a JSON-RPC response into output.

Rich mode:
  - `result` = [ {text} ]   -> text pretty-printed as JSON if it parses, else raw
  - `result` = [ item ]     -> item pretty-printed
  - other `result`          -> pretty-printed
  - `error`                 -> red message, then pretty `data` (the schema on
                               discovery calls)
  - neither                 -> the whole body pretty-printed

JSON mode prints the whole envelope.
*/

use serde_json::Value;

use crate::cmd::format::{Role, StyleOptions, color, emoji};
use crate::cmd::shared::OutputFormat;
use crate::mcp::RpcResponse;

fn pretty(v: &Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

/// Pretty-print `text` if it is JSON, otherwise hand it back untouched.
pub fn pretty_text(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(v) => pretty(&v),
        Err(_) => text.to_string(),
    }
}

fn render_result(result: &Value) -> String {
    if let Some([item]) = result.as_array().map(Vec::as_slice) {
        return match item.get("text").and_then(Value::as_str) {
            Some(text) => pretty_text(text),
            None => pretty(item),
        };
    }
    pretty(result)
}

/// Human rendering of a response.
pub fn render_rich(resp: &RpcResponse, style: &StyleOptions) -> String {
    if let Some(err) = &resp.error {
        let head = format!("{} Error: {}", emoji("error", style), err.message);
        let mut out = color(Role::Error, head.trim_start(), style);
        if let Some(data) = &err.data {
            out.push('\n');
            out.push_str(&pretty(data));
        }
        return out;
    }
    if let Some(result) = &resp.result {
        return render_result(result);
    }
    serde_json::to_string_pretty(resp).unwrap_or_default()
}

/// Print a response on stdout in the requested format.
pub fn print_response(resp: &RpcResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(resp).unwrap_or_default()
        ),
        OutputFormat::Rich => println!("{}", render_rich(resp, &StyleOptions::detect())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resp(v: Value) -> RpcResponse {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn single_text_item_is_pretty_json() {
        let r = resp(json!({"id": 1, "result": [{"type": "text", "text": "{\"a\":1}"}]}));
        assert_eq!(render_rich(&r, &StyleOptions::plain()), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn single_text_item_non_json_is_raw() {
        let r = resp(json!({"id": 1, "result": [{"text": "plain words"}]}));
        assert_eq!(render_rich(&r, &StyleOptions::plain()), "plain words");
    }

    #[test]
    fn single_item_without_text() {
        let r = resp(json!({"id": 1, "result": [{"k": "v"}]}));
        assert_eq!(render_rich(&r, &StyleOptions::plain()), "{\n  \"k\": \"v\"\n}");
    }

    #[test]
    fn multi_item_result_pretty_printed_whole() {
        let r = resp(json!({"id": 1, "result": [{"text": "a"}, {"text": "b"}]}));
        let out = render_rich(&r, &StyleOptions::plain());
        assert!(out.starts_with('['));
        assert!(out.contains("\"b\""));
    }

    #[test]
    fn error_shows_message_then_schema() {
        let r = resp(json!({
            "id": 1,
            "error": {
                "code": -32602,
                "message": "missing params",
                "data": {"required": ["hostname"]}
            }
        }));
        let out = render_rich(&r, &StyleOptions::plain());
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("Error: missing params"));
        assert!(out.contains("\"hostname\""));
    }

    #[test]
    fn error_without_data_is_one_line() {
        let r = resp(json!({"id": 1, "error": {"code": 1, "message": "boom"}}));
        assert_eq!(render_rich(&r, &StyleOptions::plain()), "Error: boom");
    }

    #[test]
    fn body_with_neither_printed_whole() {
        let r = resp(json!({"jsonrpc": "2.0", "id": 3}));
        let out = render_rich(&r, &StyleOptions::plain());
        assert!(out.contains("\"jsonrpc\": \"2.0\""));
        assert!(out.contains("\"id\": 3"));
    }

    #[test]
    fn explicit_null_result_is_rendered_as_result() {
        let r = resp(json!({"jsonrpc": "2.0", "id": 4, "result": null}));
        assert_eq!(render_rich(&r, &StyleOptions::plain()), "null");
    }
}

/*!
tools.rs - `searchatlas tools`.

  - `tools -c KEY`  static category table, no network call
  - `tools`         live `tools/list`; accepts `result.tools` or a bare
                    `result` array

JSON output (category):
{ "key": "otto", "label": "OTTO SEO", "tools": ["..."] }

JSON output (live): the raw response envelope.
*/

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use crate::catalog::{Category, ToolCatalog};
use crate::cmd::format::{StyleOptions, TableOpts, box_header, emoji, table, truncate_ellipsis};
use crate::cmd::render::print_response;
use crate::cmd::shared::{GlobalArgs, OutputFormat, UsageError};
use crate::mcp::{RpcClient, RpcResponse, Transport};
use crate::utils::with_spinner;

/// Description column width for the live listing.
const DESCRIPTION_WIDTH: usize = 80;

#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Show the static entry for one category instead of the live list
    #[arg(short = 'c', long, value_name = "KEY")]
    pub category: Option<String>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub fn execute_tools(args: ToolsArgs, globals: &GlobalArgs, catalog: &ToolCatalog) -> Result<()> {
    if let Some(key) = args.category.as_deref() {
        let category = lookup_category(catalog, key)?;
        if args.format.is_json() {
            println!("{}", serde_json::to_string_pretty(category)?);
        } else {
            println!("{}", render_category(category, &StyleOptions::detect()));
        }
        return Ok(());
    }

    let client = globals.connect()?;
    let resp = with_spinner("Fetching tool list...", globals.spinner(args.format), || {
        list_live(&client)
    })?;

    if args.format.is_json() || resp.is_error() {
        print_response(&resp, args.format);
        return Ok(());
    }
    let entries = tool_entries(resp.result.as_ref().unwrap_or(&Value::Null));
    println!("{}", render_live(&entries, &StyleOptions::detect()));
    Ok(())
}

fn list_live<T: Transport>(client: &RpcClient<T>) -> Result<RpcResponse> {
    Ok(client.list_tools()?)
}

fn lookup_category<'a>(catalog: &'a ToolCatalog, key: &str) -> Result<&'a Category, UsageError> {
    catalog
        .category(key)
        .ok_or_else(|| UsageError::UnknownCategory {
            key: key.to_string(),
            choices: catalog.category_keys().join(", "),
        })
}

/// `(name, description)` pairs from either listing shape.
pub fn tool_entries(result: &Value) -> Vec<(String, String)> {
    let list = result
        .get("tools")
        .and_then(Value::as_array)
        .or_else(|| result.as_array());
    let Some(list) = list else {
        return Vec::new();
    };
    list.iter()
        .map(|t| {
            let field = |k: &str| t.get(k).and_then(Value::as_str).unwrap_or("").to_string();
            (field("name"), field("description"))
        })
        .collect()
}

fn render_category(category: &Category, style: &StyleOptions) -> String {
    let subtitle = format!("{} tools", category.tools.len());
    let header = box_header(
        format!("{} {}", emoji("tool", style), category.label).trim_start(),
        Some(subtitle),
        style,
    );
    let rows: Vec<Vec<String>> = category
        .tools
        .iter()
        .enumerate()
        .map(|(i, t)| vec![(i + 1).to_string(), t.clone()])
        .collect();
    format!(
        "{header}\n{}",
        table(&["#", "TOOL"], &rows, TableOpts::default(), style)
    )
}

fn render_live(entries: &[(String, String)], style: &StyleOptions) -> String {
    let header = box_header(
        format!("{} SearchAtlas MCP Tools", emoji("list", style)).trim_start(),
        Some(format!("{} available", entries.len())),
        style,
    );
    let rows: Vec<Vec<String>> = entries
        .iter()
        .enumerate()
        .map(|(i, (name, desc))| {
            vec![
                (i + 1).to_string(),
                name.clone(),
                truncate_ellipsis(desc.lines().next().unwrap_or(""), DESCRIPTION_WIDTH),
            ]
        })
        .collect();
    format!(
        "{header}\n{}",
        table(&["#", "NAME", "DESCRIPTION"], &rows, TableOpts::default(), style)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::client::testing::ScriptedTransport;
    use serde_json::json;

    #[test]
    fn entries_from_tools_member() {
        let result = json!({"tools": [
            {"name": "brand_vault", "description": "Brand Vault ops"},
            {"name": "seo_analysis"}
        ]});
        assert_eq!(
            tool_entries(&result),
            vec![
                ("brand_vault".to_string(), "Brand Vault ops".to_string()),
                ("seo_analysis".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn entries_from_bare_array() {
        let result = json!([{"name": "gsc", "description": "Search Console"}]);
        assert_eq!(tool_entries(&result).len(), 1);
        assert!(tool_entries(&json!({"other": 1})).is_empty());
    }

    #[test]
    fn live_description_truncated() {
        let long = "d".repeat(200);
        let mut style = StyleOptions::plain();
        style.term_width = 220;
        let out = render_live(&[("t".into(), long)], &style);
        let row = out.lines().last().unwrap();
        assert!(row.contains('…'));
        assert!(!row.contains(&"d".repeat(80)));
        assert!(row.contains(&"d".repeat(79)));
    }

    #[test]
    fn unknown_category_lists_choices() {
        let catalog = ToolCatalog::builtin().unwrap();
        let err = lookup_category(&catalog, "nope").unwrap_err();
        assert!(err.to_string().contains("otto"));
        assert!(lookup_category(&catalog, "OTTO").is_ok());
    }

    #[test]
    fn category_table_lists_tools() {
        let catalog = ToolCatalog::builtin().unwrap();
        let cat = lookup_category(&catalog, "otto").unwrap();
        let out = render_category(cat, &StyleOptions::plain());
        assert!(out.contains("task_management"));
        assert!(out.contains("OTTO SEO"));
    }

    #[test]
    fn live_listing_sends_tools_list() {
        let client = RpcClient::new(ScriptedTransport::new(vec![
            json!({"jsonrpc": "2.0", "result": {"tools": [{"name": "a"}]}}),
        ]));
        let resp = list_live(&client).unwrap();
        assert_eq!(tool_entries(resp.result.as_ref().unwrap()).len(), 1);
        assert_eq!(client.transport_calls(), 1);
    }
}

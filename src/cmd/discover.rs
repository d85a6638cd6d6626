/*!
discover.rs - `searchatlas discover TOOL OP`.

Calls the operation with empty params. The server answers with a validation
error whose `data` is the expected parameter schema; that payload is printed
as-is.
*/

use anyhow::Result;
use clap::Args;

use crate::cmd::format::{Role, StyleOptions, box_header, color, emoji};
use crate::cmd::render::{print_response, render_rich};
use crate::cmd::shared::{GlobalArgs, OutputFormat};
use crate::mcp::{RpcClient, RpcResponse, Transport};
use crate::utils::with_spinner;

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Tool name
    #[arg(value_name = "TOOL")]
    pub tool: String,

    /// Operation to inspect
    #[arg(value_name = "OP")]
    pub op: String,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub fn execute_discover(args: DiscoverArgs, globals: &GlobalArgs) -> Result<()> {
    let client = globals.connect()?;
    let resp = with_spinner(
        format!("Discovering {}.{}...", args.tool, args.op),
        globals.spinner(args.format),
        || discover(&client, &args.tool, &args.op),
    )?;

    if args.format.is_json() {
        print_response(&resp, args.format);
    } else {
        println!(
            "{}",
            render_discovery(&args.tool, &args.op, &resp, &StyleOptions::detect())
        );
    }
    Ok(())
}

fn discover<T: Transport>(client: &RpcClient<T>, tool: &str, op: &str) -> Result<RpcResponse> {
    Ok(client.discover_schema(tool, op)?)
}

fn render_discovery(tool: &str, op: &str, resp: &RpcResponse, style: &StyleOptions) -> String {
    let title = format!("{} Schema Discovery", emoji("search", style));
    let mut out = box_header(title.trim_start(), Some(format!("{tool} → {op}")), style);
    out.push('\n');
    if !resp.is_error() {
        out.push_str(&color(
            Role::Dim,
            "Operation accepted empty params; no schema returned.",
            style,
        ));
        out.push('\n');
    }
    out.push_str(&render_rich(resp, style));
    out
}

/*!
call.rs - `searchatlas call TOOL OP`.

Parameter sources, lowest precedence first:
  --param-file params.(json|yaml)
  -p/--params '{"k": "v"}'
  --param KEY=VALUE (repeatable; values parsed as JSON literals when possible)

`--dry-run` prints the `tools/call` envelope (id 1) without a key or network.
Server-side `error` responses are printed and still exit 0.
*/

use anyhow::Result;
use clap::Args;
use serde_json::{Map, Value};

use crate::cmd::render::print_response;
use crate::cmd::shared::{GlobalArgs, OutputFormat, build_params};
use crate::mcp::protocol::METHOD_TOOLS_CALL;
use crate::mcp::{RpcRequest, RpcResponse};
use crate::utils::with_spinner;

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Tool name (e.g. brand_vault)
    #[arg(value_name = "TOOL")]
    pub tool: String,

    /// Operation within the tool (e.g. list_brand_vaults)
    #[arg(value_name = "OP")]
    pub op: String,

    /// Params as a JSON object
    #[arg(short = 'p', long = "params", value_name = "JSON", default_value = "{}")]
    pub params: String,

    /// Single parameter (KEY=VALUE), repeatable; overrides -p and --param-file
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub pairs: Vec<String>,

    /// Load parameters from a JSON or YAML file
    #[arg(long = "param-file", value_name = "PATH")]
    pub param_file: Option<String>,

    /// Print the request envelope instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub fn execute_call(args: CallArgs, globals: &GlobalArgs) -> Result<()> {
    let params = build_params(&args.params, args.param_file.as_deref(), &args.pairs)?;

    if args.dry_run {
        let envelope = dry_run_envelope(&args.tool, &args.op, params);
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    let resp = invoke(globals, &args.tool, &args.op, params, args.format)?;
    print_response(&resp, args.format);
    Ok(())
}

/// The envelope a fresh client would send first.
pub fn dry_run_envelope(tool: &str, op: &str, params: Map<String, Value>) -> RpcRequest {
    RpcRequest::new(
        1,
        METHOD_TOOLS_CALL,
        RpcRequest::tool_call_params(tool, op, params),
    )
}

/// Connect and run one `tools/call` behind a spinner.
pub fn invoke(
    globals: &GlobalArgs,
    tool: &str,
    op: &str,
    params: Map<String, Value>,
    format: OutputFormat,
) -> Result<RpcResponse> {
    let client = globals.connect()?;
    tracing::debug!(endpoint = client.endpoint(), tool, op, "invoking");
    let resp = with_spinner(
        format!("Calling {tool}.{op}..."),
        globals.spinner(format),
        || client.call_tool(tool, op, params),
    )?;
    Ok(resp)
}

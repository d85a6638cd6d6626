/*!
wait.rs - `searchatlas wait`.

Calls `otto_wait` on the family's task tool with empty params. The server
decides how long to block; `--seconds` only labels the spinner.
*/

use anyhow::Result;
use clap::Args;
use serde_json::Map;

use crate::cmd::render::print_response;
use crate::cmd::shared::{GlobalArgs, OutputFormat};
use crate::mcp::{RpcClient, RpcResponse, TaskFamily, Transport};
use crate::utils::with_spinner;

/// Operation name shared by both task tools.
const WAIT_OP: &str = "otto_wait";

#[derive(Args, Debug)]
pub struct WaitArgs {
    /// Expected wait, shown while the server blocks
    #[arg(long, value_name = "N", default_value_t = 5)]
    pub seconds: u64,

    /// Task family
    #[arg(long, value_enum, default_value_t)]
    pub tool: TaskFamily,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub fn execute_wait(args: WaitArgs, globals: &GlobalArgs) -> Result<()> {
    let client = globals.connect()?;
    let resp = with_spinner(
        format!("Waiting ~{}s (server-controlled)...", args.seconds),
        globals.spinner(args.format),
        || wait(&client, args.tool),
    )?;
    print_response(&resp, args.format);
    Ok(())
}

fn wait<T: Transport>(client: &RpcClient<T>, family: TaskFamily) -> Result<RpcResponse> {
    Ok(client.call_tool(family.tool(), WAIT_OP, Map::new())?)
}

/*!
shortcut.rs - per-domain shortcut commands (brand, otto, geo, gbp, ppc, site,
content).

All shortcuts share one argument shape; how positionals map to `(tool, op)`
comes from the shortcut table in `data/categories.yaml`:

  fixed   searchatlas brand [OP]          tool fixed
  routed  searchatlas geo [OP]            tool picked from the op, with a fallback
  open    searchatlas otto [TOOL] [OP]    per-shortcut defaults

`--hostname` is injected as `params.hostname`. Responses render like `call`.
*/

use anyhow::{Result, anyhow};
use clap::Args;
use serde_json::{Map, Value};

use crate::catalog::{Shortcut, ToolCatalog};
use crate::cmd::call::invoke;
use crate::cmd::format::{Role, StyleOptions, color};
use crate::cmd::render::print_response;
use crate::cmd::shared::{GlobalArgs, OutputFormat, build_params};

#[derive(Args, Debug)]
pub struct ShortcutArgs {
    /// [OP] or [TOOL] [OP], depending on the shortcut
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Params as a JSON object
    #[arg(short = 'p', long = "params", value_name = "JSON", default_value = "{}")]
    pub params: String,

    /// Single parameter (KEY=VALUE), repeatable
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub pairs: Vec<String>,

    /// Site hostname, sent as params.hostname
    #[arg(long)]
    pub hostname: Option<String>,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Resolved shortcut invocation.
#[derive(Debug, PartialEq)]
pub struct Plan {
    pub tool: String,
    pub op: String,
    pub params: Map<String, Value>,
}

pub fn execute_shortcut(
    name: &str,
    args: ShortcutArgs,
    globals: &GlobalArgs,
    catalog: &ToolCatalog,
) -> Result<()> {
    let shortcut = catalog
        .shortcut(name)
        .ok_or_else(|| anyhow!("no shortcut named '{name}' in the tool catalogue"))?;
    let plan = plan(shortcut, &args)?;

    if args.args.is_empty() && !args.format.is_json() && !globals.quiet {
        let style = StyleOptions::detect();
        eprintln!(
            "{}",
            color(
                Role::Dim,
                format!("{}: {}.{} ({})", shortcut.label, plan.tool, plan.op, shortcut.hint()),
                &style
            )
        );
    }
    tracing::debug!(shortcut = name, tool = %plan.tool, op = %plan.op, "shortcut resolved");

    let resp = invoke(globals, &plan.tool, &plan.op, plan.params, args.format)?;
    print_response(&resp, args.format);
    Ok(())
}

/// Map shortcut arguments to a concrete call.
pub fn plan(shortcut: &Shortcut, args: &ShortcutArgs) -> Result<Plan> {
    let (tool, op) = shortcut.resolve(&args.args)?;
    let mut params = build_params(&args.params, None, &args.pairs)?;
    if let Some(host) = &args.hostname {
        params.insert("hostname".into(), Value::String(host.clone()));
    }
    Ok(Plan { tool, op, params })
}

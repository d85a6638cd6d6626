use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod catalog;
mod cmd;
mod mcp;
mod playbook;
mod utils;

use catalog::ToolCatalog;
use cmd::format::{Role, StyleOptions, panel};
use cmd::{
    CallArgs, DiscoverArgs, GlobalArgs, PlaybookArgs, ShortcutArgs, StatusArgs, ToolsArgs,
    WaitArgs,
};

/// SearchAtlas MCP CLI
///
/// Command layout:
///   searchatlas tools [-c KEY]                       list tools (live or by category)
///   searchatlas discover TOOL OP                     print an operation's param schema
///   searchatlas call TOOL OP [-p JSON] [--param K=V] invoke an operation
///   searchatlas status TASK_ID [--poll]              check / poll an async task
///   searchatlas wait [--seconds N]                   server-side wait between steps
///   searchatlas playbook list | show N | run N       summit challenge playbooks
///   searchatlas brand|otto|geo|gbp|ppc|site|content  per-domain shortcuts
///
/// Global flags / env:
///   -v / -vv           Increase verbosity (RUST_LOG overrides)
///   -q / --quiet       Errors only
///   --api-key          or MCP_API_KEY
///   --endpoint         or SEARCHATLAS_ENDPOINT
///   --playbooks        or SEARCHATLAS_PLAYBOOKS
///
/// Examples:
///   searchatlas discover brand_vault get_brand_vault_overview
///   searchatlas call seo_analysis get_project_issues_summary --param project_uuid=abc123
///   searchatlas status 4f2c --poll --timeout 300
///   searchatlas brand get_brand_vault_overview --hostname searchatlas.com
#[derive(Parser, Debug)]
#[command(
    name = "searchatlas",
    version,
    author,
    about = "SearchAtlas MCP CLI - call SearchAtlas tools over JSON-RPC",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// API key sent as X-API-KEY
    #[arg(
        long = "api-key",
        env = "MCP_API_KEY",
        global = true,
        hide_env_values = true,
        value_name = "KEY"
    )]
    api_key: Option<String>,

    /// MCP endpoint URL
    #[arg(
        long,
        env = "SEARCHATLAS_ENDPOINT",
        global = true,
        default_value = mcp::DEFAULT_ENDPOINT,
        value_name = "URL"
    )]
    endpoint: String,

    /// Playbook catalogue file
    #[arg(long, env = playbook::PLAYBOOK_ENV, global = true, value_name = "PATH")]
    playbooks: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tools (live, or one static category with -c)
    Tools(ToolsArgs),

    /// Discover an operation's parameter schema
    Discover(DiscoverArgs),

    /// Call a tool operation
    Call(CallArgs),

    /// Check or poll an async task
    Status(StatusArgs),

    /// Server-side wait between dependent steps
    Wait(WaitArgs),

    /// Summit challenge playbooks
    Playbook(PlaybookArgs),

    /// Brand Vault shortcut: brand [OP]
    Brand(ShortcutArgs),

    /// OTTO SEO shortcut: otto [TOOL] [OP]
    Otto(ShortcutArgs),

    /// LLM visibility / sentiment shortcut: geo [OP]
    Geo(ShortcutArgs),

    /// Google Business Profile shortcut: gbp [TOOL] [OP]
    Gbp(ShortcutArgs),

    /// PPC / Google Ads shortcut: ppc [TOOL] [OP]
    Ppc(ShortcutArgs),

    /// Site Explorer shortcut: site [TOOL] [OP]
    Site(ShortcutArgs),

    /// Content Genius shortcut: content [TOOL] [OP]
    Content(ShortcutArgs),
}

fn main() {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        let style = StyleOptions::detect();
        let mut body = format!("{e:#}");
        if let Some(te) = e.downcast_ref::<mcp::TransportError>()
            && matches!(te.status(), Some(401 | 403))
        {
            body.push_str("\nCheck --api-key / MCP_API_KEY.");
        }
        eprintln!("{}", panel("Error", &body, Role::Error, &style));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let globals = GlobalArgs {
        api_key: cli.api_key,
        endpoint: mcp::parse_endpoint(&cli.endpoint)?,
        playbooks: cli.playbooks,
        quiet: cli.quiet,
    };
    tracing::debug!(endpoint = %globals.endpoint, "resolved endpoint");
    let catalog = ToolCatalog::builtin()?;

    match cli.command {
        Commands::Tools(args) => cmd::execute_tools(args, &globals, &catalog),
        Commands::Discover(args) => cmd::execute_discover(args, &globals),
        Commands::Call(args) => cmd::execute_call(args, &globals),
        Commands::Status(args) => cmd::execute_status(args, &globals),
        Commands::Wait(args) => cmd::execute_wait(args, &globals),
        Commands::Playbook(args) => cmd::execute_playbook(args, &globals),
        Commands::Brand(args) => cmd::execute_shortcut("brand", args, &globals, &catalog),
        Commands::Otto(args) => cmd::execute_shortcut("otto", args, &globals, &catalog),
        Commands::Geo(args) => cmd::execute_shortcut("geo", args, &globals, &catalog),
        Commands::Gbp(args) => cmd::execute_shortcut("gbp", args, &globals, &catalog),
        Commands::Ppc(args) => cmd::execute_shortcut("ppc", args, &globals, &catalog),
        Commands::Site(args) => cmd::execute_shortcut("site", args, &globals, &catalog),
        Commands::Content(args) => cmd::execute_shortcut("content", args, &globals, &catalog),
    }
}

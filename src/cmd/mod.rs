/*!
Command dispatcher module: declarations + re-exports only.

  src/cmd/
    mod.rs        (this file)
    shared.rs     GlobalArgs, OutputFormat, UsageError, params assembly
    format.rs     boxes / tables / colors for rich output
    render.rs     JSON-RPC response rendering
    tools.rs      ToolsArgs     + execute_tools
    discover.rs   DiscoverArgs  + execute_discover
    call.rs       CallArgs      + execute_call
    status.rs     StatusArgs    + execute_status
    wait.rs       WaitArgs      + execute_wait
    playbook.rs   PlaybookArgs  + execute_playbook
    shortcut.rs   ShortcutArgs  + execute_shortcut

Conventions:
  - Each subcommand module exposes one `execute_*` returning `anyhow::Result<()>`.
  - Argument structs derive `clap::Args`; every rendering command takes
    `--format rich|json`.
*/

pub mod call;
pub mod discover;
pub mod format;
pub mod playbook;
pub mod render;
pub mod shared;
pub mod shortcut;
pub mod status;
pub mod tools;
pub mod wait;

pub use call::{CallArgs, execute_call};
pub use discover::{DiscoverArgs, execute_discover};
pub use playbook::{PlaybookArgs, execute_playbook};
pub use shared::GlobalArgs;
pub use shortcut::{ShortcutArgs, execute_shortcut};
pub use status::{StatusArgs, execute_status};
pub use tools::{ToolsArgs, execute_tools};
pub use wait::{WaitArgs, execute_wait};

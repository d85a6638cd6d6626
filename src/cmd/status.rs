/*!
status.rs - `searchatlas status TASK_ID`.

One status check by default; `--poll` keeps checking every `--interval`
seconds until a terminal status (SUCCESS, COMPLETED, FAILED, ERROR) or
`--timeout`. Every intermediate response is printed.

Outcomes are reported distinctly: single check, finished, timed out.
A timeout exits 0; the task is still running server-side. In JSON mode the
responses go to stdout (one pretty-printed envelope each) and the outcome line to stderr.
*/

use std::cell::RefCell;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::cmd::format::{Role, StyleOptions, color, emoji};
use crate::cmd::render::render_rich;
use crate::cmd::shared::{GlobalArgs, OutputFormat};
use crate::mcp::poll::{DEFAULT_INTERVAL, DEFAULT_TIMEOUT, extract_status};
use crate::mcp::{PollConfig, PollOutcome, RpcResponse, TaskFamily, TaskPoller};
use crate::utils::Spinner;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Task identifier returned by an async operation
    #[arg(value_name = "TASK_ID")]
    pub task_id: String,

    /// Task family (selects the status operation)
    #[arg(long, value_enum, default_value_t)]
    pub tool: TaskFamily,

    /// Keep checking until the task finishes or the timeout passes
    #[arg(long)]
    pub poll: bool,

    /// Poll timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Seconds between checks
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

impl StatusArgs {
    fn poll_config(&self) -> PollConfig {
        PollConfig {
            poll: self.poll,
            timeout: Duration::from_secs(self.timeout),
            interval: Duration::from_secs(self.interval),
        }
    }
}

pub fn execute_status(args: StatusArgs, globals: &GlobalArgs) -> Result<()> {
    let client = globals.connect()?;
    let style = StyleOptions::detect();
    let json = args.format.is_json();
    let chatty = !json && !globals.quiet;

    let poller = TaskPoller::new(&client, args.tool, args.poll_config());
    let show_spinner = globals.spinner(args.format);
    let checking = format!("Checking task {}...", args.task_id);
    let spinner = RefCell::new(Some(Spinner::start(&checking, show_spinner)));
    let mut check = 0usize;
    let outcome = poller.run(
        &args.task_id,
        |resp| {
            if let Some(s) = spinner.borrow_mut().take() {
                s.finish();
            }
            check += 1;
            println!("{}", check_report(resp, check, args.poll, json, &style));
        },
        |wait| {
            if chatty {
                eprintln!(
                    "{}",
                    color(Role::Dim, format!("waiting {}s...", wait.as_secs()), &style)
                );
            }
            *spinner.borrow_mut() = Some(Spinner::start(&checking, show_spinner));
        },
    );
    if let Some(s) = spinner.borrow_mut().take() {
        s.finish();
    }
    let outcome = outcome?;

    tracing::debug!(calls = outcome.calls(), "status checks done");
    let (role, message) = outcome_message(&outcome, &args.task_id, args.timeout);
    if json {
        eprintln!("{message}");
    } else {
        let tag = match role {
            Role::Success => "success",
            Role::Error => "error",
            Role::Warning => "clock",
            _ => "info",
        };
        let line = format!("{} {message}", emoji(tag, &style));
        println!("{}", color(role, line.trim_start(), &style));
    }
    Ok(())
}

/// What gets printed for one status response.
fn check_report(
    resp: &RpcResponse,
    check: usize,
    poll: bool,
    json: bool,
    style: &StyleOptions,
) -> String {
    if json {
        return serde_json::to_string_pretty(resp).unwrap_or_default();
    }
    let body = render_rich(resp, style);
    if !poll {
        return body;
    }
    let status = extract_status(resp);
    let label = if status.is_empty() { "?" } else { status.as_str() };
    let tag = color(Role::Secondary, format!("[check {check}] {label}"), style);
    format!("{tag}\n{body}")
}

/// Outcome line for each way the check/poll can end.
fn outcome_message(outcome: &PollOutcome, task_id: &str, timeout_secs: u64) -> (Role, String) {
    fn shown(status: &str) -> &str {
        if status.is_empty() { "UNKNOWN" } else { status }
    }
    match outcome {
        PollOutcome::Checked { status, .. } => (
            Role::Primary,
            format!("Task {task_id} status: {}", shown(status)),
        ),
        PollOutcome::Finished { status, calls } => {
            let role = if matches!(status.as_str(), "FAILED" | "ERROR") {
                Role::Error
            } else {
                Role::Success
            };
            (
                role,
                format!("Task {task_id} finished with {status} after {calls} check(s)"),
            )
        }
        PollOutcome::TimedOut { last_status, calls } => (
            Role::Warning,
            format!(
                "Timed out after {timeout_secs}s ({calls} check(s)); task {task_id} still running \
                 (last status: {}). Run `searchatlas status {task_id} --poll` to keep waiting.",
                shown(last_status)
            ),
        ),
    }
}

/*!
playbook.rs - `searchatlas playbook list | show N | run N`.

Playbooks come from the catalogue file (`--playbooks`, SEARCHATLAS_PLAYBOOKS,
next to the executable, or the bundled copy). N is 1-based.

  list  table of #, DAY, PLAYBOOK, TIME, AGENTS
  show  header box, instructions, benefits, sample prompt
  run   header box, detected `tool → op` calls as ready-to-run commands,
        then the full instructions

JSON:
  list -> { "count": N, "playbooks": [ {record}, ... ] }
  show -> the record as stored in the file
  run  -> { "number": N, "name": "...", "calls": [ {"tool","op"} ], "instruction": "..." }
*/

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use crate::cmd::format::{Role, StyleOptions, TableOpts, box_header, color, emoji, panel, table};
use crate::cmd::shared::{GlobalArgs, OutputFormat};
use crate::playbook::{self, Catalogue, Playbook};

#[derive(Args, Debug)]
pub struct PlaybookArgs {
    #[command(subcommand)]
    pub action: PlaybookAction,
}

#[derive(Subcommand, Debug)]
pub enum PlaybookAction {
    /// List all playbooks
    List {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Show one playbook in full
    Show {
        /// Playbook number (1-based)
        #[arg(value_name = "N")]
        number: usize,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Print the tool calls a playbook walks through
    Run {
        /// Playbook number (1-based)
        #[arg(value_name = "N")]
        number: usize,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

pub fn execute_playbook(args: PlaybookArgs, globals: &GlobalArgs) -> Result<()> {
    let catalogue = playbook::load_default(globals.playbooks.as_deref())?;
    let style = StyleOptions::detect();

    let out = match args.action {
        PlaybookAction::List { format } if format.is_json() => {
            let records: Vec<&serde_json::Value> = catalogue.iter().map(Playbook::raw).collect();
            serde_json::to_string_pretty(&json!({
                "count": records.len(),
                "playbooks": records,
            }))?
        }
        PlaybookAction::List { .. } => render_list(&catalogue, &style),
        PlaybookAction::Show { number, format } => {
            let pb = catalogue.get(number)?;
            if format.is_json() {
                serde_json::to_string_pretty(pb.raw())?
            } else {
                render_show(number, pb, &style)
            }
        }
        PlaybookAction::Run { number, format } => {
            let pb = catalogue.get(number)?;
            if format.is_json() {
                serde_json::to_string_pretty(&json!({
                    "number": number,
                    "name": pb.name,
                    "calls": pb.calls(),
                    "instruction": pb.instruction,
                }))?
            } else {
                render_run(number, pb, &style)
            }
        }
    };
    println!("{out}");
    Ok(())
}

fn render_list(catalogue: &Catalogue, style: &StyleOptions) -> String {
    if catalogue.is_empty() {
        return color(Role::Warning, "No playbooks in the catalogue.", style);
    }
    let title = format!("{} Summit Challenge Playbooks", emoji("book", style));
    let header = box_header(
        title.trim_start(),
        Some(format!("{} playbooks", catalogue.len())),
        style,
    );
    let rows: Vec<Vec<String>> = catalogue
        .iter()
        .enumerate()
        .map(|(i, pb)| {
            vec![
                (i + 1).to_string(),
                pb.day_label(),
                pb.name.clone(),
                pb.time_label().to_string(),
                pb.agent_namespaces.join(", "),
            ]
        })
        .collect();
    let hint = color(
        Role::Dim,
        "Use `searchatlas playbook show N` for details.",
        style,
    );
    format!(
        "{header}\n{}\n\n{hint}",
        table(
            &["#", "DAY", "PLAYBOOK", "TIME", "AGENTS"],
            &rows,
            TableOpts::default(),
            style
        )
    )
}

fn playbook_header(number: usize, pb: &Playbook, style: &StyleOptions) -> String {
    let subtitle = format!(
        "Day {} · Action {} · {}",
        pb.day_label(),
        pb.action_label(),
        pb.time_label()
    );
    box_header(format!("#{number} {}", pb.name), Some(subtitle), style)
}

fn render_show(number: usize, pb: &Playbook, style: &StyleOptions) -> String {
    let mut parts = vec![playbook_header(number, pb, style)];
    if !pb.description.is_empty() {
        parts.push(pb.description.clone());
    }
    if !pb.agent_namespaces.is_empty() {
        parts.push(format!(
            "{} {}",
            color(Role::Accent, "Agents:", style),
            pb.agent_namespaces.join(", ")
        ));
    }
    parts.push(panel("Instructions", &pb.instruction, Role::Primary, style));
    if !pb.expected_benefits.is_empty() {
        let benefits: Vec<String> = pb
            .expected_benefits
            .iter()
            .map(|b| format!("  + {b}"))
            .collect();
        parts.push(format!(
            "{}\n{}",
            color(Role::Success, "Expected benefits:", style),
            benefits.join("\n")
        ));
    }
    if let Some(sample) = pb.sample() {
        parts.push(panel("Sample prompt", sample, Role::Accent, style));
    }
    parts.join("\n\n")
}

fn render_run(number: usize, pb: &Playbook, style: &StyleOptions) -> String {
    let mut parts = vec![playbook_header(number, pb, style)];
    let calls = pb.calls();
    if calls.is_empty() {
        parts.push(color(
            Role::Warning,
            "No `tool → op` references found; follow the instructions below.",
            style,
        ));
    } else {
        let lines: Vec<String> = calls
            .iter()
            .map(|c| format!("  $ searchatlas call {} {}", c.tool, c.op))
            .collect();
        parts.push(format!(
            "{}\n{}",
            color(Role::Accent, "Tool calls:", style),
            lines.join("\n")
        ));
    }
    parts.push(panel("Instructions", &pb.instruction, Role::Primary, style));
    parts.join("\n\n")
}

//! Summit challenge playbook catalogue.
//!
//! Playbooks are read once from a JSON file (`{"playbooks": [...]}`) and are
//! read-only afterwards. They are addressed by 1-based position.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// File name looked up next to the executable.
pub const PLAYBOOK_FILE: &str = "summit-challenge-playbooks.json";

/// Environment variable overriding the playbook file location.
pub const PLAYBOOK_ENV: &str = "SEARCHATLAS_PLAYBOOKS";

#[derive(Debug, Error)]
pub enum PlaybookError {
    #[error("Playbook file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Playbook file {} could not be read: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Playbook file {} is malformed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid playbook number {index}. Choose 1-{len}.")]
    OutOfRange { index: usize, len: usize },
}

/// One workflow record.
///
/// The record is also kept exactly as it appeared in the file (`raw`), so
/// JSON output re-emits it unchanged. Loosely typed fields (`day`,
/// `action_number`) are kept as JSON and shown with a `?` fallback.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Playbook {
    pub name: String,
    #[serde(default)]
    pub day: Value,
    #[serde(default)]
    pub action_number: Value,
    #[serde(default)]
    pub time_estimate: Option<String>,
    #[serde(default)]
    pub agent_namespaces: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub expected_benefits: Vec<String>,
    #[serde(default)]
    pub sample_prompt: Option<String>,
    #[serde(default)]
    sample_chat: Option<String>,
    #[serde(skip)]
    raw: Value,
}

/// Display form of a loosely typed field: numbers and strings as-is, else `?`.
fn shown(v: &Value) -> String {
    match v {
        Value::String(s) if !s.trim().is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => "?".to_string(),
    }
}

impl Playbook {
    fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let mut pb: Playbook = serde_json::from_value(raw.clone())?;
        pb.raw = raw;
        Ok(pb)
    }

    /// The record as stored in the file.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn day_label(&self) -> String {
        shown(&self.day)
    }

    pub fn action_label(&self) -> String {
        shown(&self.action_number)
    }

    pub fn time_label(&self) -> &str {
        self.time_estimate
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("?")
    }

    /// Sample prompt, falling back to the older `sample_chat` key.
    pub fn sample(&self) -> Option<&str> {
        self.sample_prompt
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.sample_chat.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    /// Tool calls referenced in the instructions.
    pub fn calls(&self) -> Vec<ToolCall> {
        extract_calls(&self.instruction)
    }
}

#[derive(Deserialize)]
struct PlaybookFile {
    #[serde(default)]
    playbooks: Vec<Value>,
}

/// Ordered, immutable playbook collection.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    playbooks: Vec<Playbook>,
}

impl Catalogue {
    /// Read and parse the playbook file at `path`.
    pub fn load(path: &Path) -> Result<Self, PlaybookError> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                PlaybookError::Missing {
                    path: path.to_path_buf(),
                }
            } else {
                PlaybookError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let catalogue = Self::from_json_str(&raw).map_err(|source| PlaybookError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), count = catalogue.len(), "loaded playbooks");
        Ok(catalogue)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let file: PlaybookFile = serde_json::from_str(raw)?;
        let playbooks = file
            .playbooks
            .into_iter()
            .map(Playbook::from_value)
            .collect::<Result<_, _>>()?;
        Ok(Self { playbooks })
    }

    pub fn len(&self) -> usize {
        self.playbooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playbooks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Playbook> {
        self.playbooks.iter()
    }

    /// Playbook at 1-based `index`.
    pub fn get(&self, index: usize) -> Result<&Playbook, PlaybookError> {
        index
            .checked_sub(1)
            .and_then(|i| self.playbooks.get(i))
            .ok_or(PlaybookError::OutOfRange {
                index,
                len: self.playbooks.len(),
            })
    }
}

/// Candidate playbook file locations, in lookup order.
///
/// An explicit override is the only candidate when present. Otherwise the
/// file next to the executable is tried first, then the copy bundled with
/// the crate sources.
pub fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(p) = explicit {
        return vec![p.to_path_buf()];
    }
    let mut out = Vec::new();
    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        out.push(dir.join(PLAYBOOK_FILE));
    }
    out.push(
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("data")
            .join(PLAYBOOK_FILE),
    );
    out
}

/// Load the catalogue from the first existing candidate.
pub fn load_default(explicit: Option<&Path>) -> Result<Catalogue, PlaybookError> {
    let candidates = candidate_paths(explicit);
    let path = candidates
        .iter()
        .find(|p| p.is_file())
        .or_else(|| candidates.first())
        .cloned()
        .unwrap_or_else(|| PathBuf::from(PLAYBOOK_FILE));
    Catalogue::load(&path)
}

/// A `tool → operation` reference found in free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCall {
    pub tool: String,
    pub op: String,
}

fn arrow_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\w+)\s*(?:→|->)\s*(\w+)").expect("static regex"))
}

/// Scan instructions for `word → word` / `word -> word` pairs.
///
/// Best-effort text mining: references written any other way are silently
/// skipped, and a chain `a → b → c` yields only `(a, b)` since matches do not
/// overlap.
pub fn extract_calls(instruction: &str) -> Vec<ToolCall> {
    arrow_pattern()
        .captures_iter(instruction)
        .map(|c| ToolCall {
            tool: c[1].to_string(),
            op: c[2].to_string(),
        })
        .collect()
}

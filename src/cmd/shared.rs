/*!
shared.rs - shared helpers for subcommands.

Focus:
  - OutputFormat (rich | json) shared by every rendering command
  - GlobalArgs: global flags resolved once in main
  - UsageError: user/configuration errors, raised before any network call
  - API key resolution + client construction
  - params assembly: --param-file < -p JSON < --param KEY=VALUE
*/

use std::path::PathBuf;

use anyhow::Result;
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use crate::mcp::{self, RpcClient};

/* ---- Output Format ---- */

/// Output mode accepted by `--format`.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputFormat {
    /// Tables, boxes and colors
    #[default]
    Rich,
    /// Raw JSON on stdout
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

/* ---- Errors ---- */

/// Errors caused by the user's input or environment rather than the server.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error(
        "MCP_API_KEY not set. Pass --api-key or set the MCP_API_KEY environment variable."
    )]
    MissingApiKey,

    #[error("Invalid JSON params: {0}")]
    InvalidParams(#[source] serde_json::Error),

    #[error("JSON params must be an object, got: {0}")]
    ParamsNotObject(String),

    #[error("invalid --param (expected KEY=VALUE): {0}")]
    InvalidParam(String),

    #[error("param file {path}: {reason}")]
    ParamFile { path: String, reason: String },

    #[error("unknown category '{key}'. Choose one of: {choices}")]
    UnknownCategory { key: String, choices: String },
}

/* ---- Global Args ---- */

/// Global flags after resolution, handed to each `execute_*`.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_key: Option<String>,
    pub endpoint: Url,
    pub playbooks: Option<PathBuf>,
    pub quiet: bool,
}

impl GlobalArgs {
    /// Spinners only in rich mode and when not silenced.
    pub fn spinner(&self, format: OutputFormat) -> bool {
        !self.quiet && !format.is_json()
    }

    /// Resolve the key and build a client. Fails before any request is sent.
    pub fn connect(&self) -> Result<RpcClient> {
        let key = resolve_api_key(self.api_key.as_deref())?;
        Ok(mcp::connect(&self.endpoint, &key)?)
    }
}

/// The API key from `--api-key` / `MCP_API_KEY`; blank counts as missing.
pub fn resolve_api_key(raw: Option<&str>) -> Result<String, UsageError> {
    match raw.map(str::trim) {
        Some(k) if !k.is_empty() => Ok(k.to_string()),
        _ => Err(UsageError::MissingApiKey),
    }
}

/* ---- Params ---- */

/// Parse a `-p/--params` JSON object.
pub fn parse_params(raw: &str) -> Result<Map<String, Value>, UsageError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(raw).map_err(UsageError::InvalidParams)? {
        Value::Object(map) => Ok(map),
        other => Err(UsageError::ParamsNotObject(other.to_string())),
    }
}

/// Interpret a `--param` value: a JSON literal when it parses, else a string.
///
/// `42` -> number, `true` -> bool, `["a"]` -> array, `abc` -> "abc".
pub fn parse_literal(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Apply `KEY=VALUE` pairs on top of `params` (pairs win).
pub fn apply_param_pairs(
    pairs: &[String],
    params: &mut Map<String, Value>,
) -> Result<(), UsageError> {
    for kv in pairs {
        let Some((k, v)) = kv.split_once('=') else {
            return Err(UsageError::InvalidParam(kv.clone()));
        };
        let key = k.trim();
        if key.is_empty() {
            return Err(UsageError::InvalidParam(kv.clone()));
        }
        params.insert(key.to_string(), parse_literal(v.trim()));
    }
    Ok(())
}

/// Load a JSON or YAML (`.yaml` / `.yml`) params file; root must be an object.
pub fn load_param_file(path: &str) -> Result<Map<String, Value>, UsageError> {
    let file_err = |reason: String| UsageError::ParamFile {
        path: path.to_string(),
        reason,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| file_err(e.to_string()))?;
    let lower = path.to_ascii_lowercase();

    let value: Value = if lower.ends_with(".yaml") || lower.ends_with(".yml") {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(&raw).map_err(|e| file_err(format!("invalid YAML: {e}")))?;
        serde_json::to_value(yaml).map_err(|e| file_err(format!("unsupported YAML: {e}")))?
    } else {
        serde_json::from_str(&raw).map_err(|e| file_err(format!("invalid JSON: {e}")))?
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(file_err("root must be an object".into())),
    }
}

/// Assemble call params: file entries, then `-p` JSON, then `--param` pairs.
pub fn build_params(
    json: &str,
    param_file: Option<&str>,
    pairs: &[String],
) -> Result<Map<String, Value>, UsageError> {
    let mut params = match param_file {
        Some(path) => load_param_file(path)?,
        None => Map::new(),
    };
    params.extend(parse_params(json)?);
    apply_param_pairs(pairs, &mut params)?;
    Ok(params)
}

/* ---- Tests ---- */

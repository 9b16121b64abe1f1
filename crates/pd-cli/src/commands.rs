//! Subcommand handlers. Each one takes already-read input and produces the
//! text to print, so they can be exercised without touching the terminal.

use anyhow::{Context, Result};
use pd_core::{Prompt, convert_events, decode_response};
use pd_editor::service::CompletionRequest;
use pd_editor::{AiService, MemoryCanvas, ModelClient, ServiceConfig, ServiceError, apply_changes};
use serde::Serialize;
use serde_json::{Value, json};
use std::io::{Read, Write};
use std::path::Path;

/// Read a file argument, `-` meaning stdin.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    let Some(path) = path else {
        return Ok(ServiceConfig::default());
    };
    let text = read_input(path)?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn parse_prompt(text: &str) -> Result<Prompt> {
    serde_json::from_str(text).context("parsing prompt JSON")
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}

// ─── validate / convert ──────────────────────────────────────────────────

pub fn validate(raw: &str) -> Result<String> {
    let response = decode_response(raw)?;
    log::info!("{} event(s) accepted", response.events.len());
    to_json(&response, true)
}

pub fn convert(raw: &str, apply: bool, pretty: bool) -> Result<String> {
    let response = decode_response(raw)?;
    let conversion = convert_events(&Prompt::default(), &response.events);
    let warnings: Vec<String> = conversion.warnings.iter().map(ToString::to_string).collect();

    let mut out = json!({
        "changes": serde_json::to_value(&conversion.changes)?,
        "warnings": warnings,
    });

    if apply {
        let mut canvas = MemoryCanvas::new();
        let report = apply_changes(&mut canvas, &conversion.changes);
        let refused: Vec<String> = report.warnings.iter().map(ToString::to_string).collect();
        out["applied"] = json!(report.applied);
        out["refused"] = json!(refused);
        out["talk"] = json!(report.talk);
        out["canvas"] = serde_json::to_value(canvas.snapshot())?;
    }

    to_json(&out, pretty)
}

// ─── prompt inspection ───────────────────────────────────────────────────

pub fn describe(prompt: &str) -> Result<String> {
    Ok(pd_core::prompt::describe_context(&parse_prompt(prompt)?))
}

pub fn messages(prompt: &str, config: &ServiceConfig) -> Result<String> {
    let messages = pd_core::build_messages(&parse_prompt(prompt)?, &config.system_prompt);
    to_json(&messages, true)
}

// ─── replay ──────────────────────────────────────────────────────────────

/// Model client that answers every request with a recorded response.
pub struct RecordedModel {
    response: String,
}

impl RecordedModel {
    pub fn new(response: String) -> Self {
        Self { response }
    }
}

impl ModelClient for RecordedModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ServiceError> {
        log::debug!(
            "replaying recorded response for {} ({} message(s))",
            request.model,
            request.messages.len()
        );
        Ok(self.response.clone())
    }
}

/// Stream the changes a recorded response produces, one JSON line each,
/// paced by `config.stream_delay_ms`. Returns the number of changes written.
pub async fn replay<W: Write>(
    prompt: &str,
    response: String,
    config: ServiceConfig,
    out: &mut W,
) -> Result<usize> {
    let prompt = parse_prompt(prompt)?;
    let service = AiService::new(RecordedModel::new(response), config);
    let mut stream = service.stream(&prompt).await?;

    for warning in stream.warnings() {
        log::warn!("{warning}");
    }

    let mut written = 0;
    while let Some(change) = stream.next().await {
        let line: Value = serde_json::to_value(&change)?;
        writeln!(out, "{line}")?;
        written += 1;
    }
    Ok(written)
}

//! Prompt → changes orchestration.
//!
//! `AiService` owns one request/response cycle per user turn:
//! build chat messages → ask the model → decode → convert. The network
//! transport is injected through `ModelClient`; this crate never talks to a
//! model API itself. Conversion only starts once the model call has fully
//! completed, so a call dropped or aborted mid-flight converts nothing.

use pd_core::convert::{Conversion, convert_events};
use pd_core::prompt::{ChatMessage, DEFAULT_SYSTEM_PROMPT, build_messages};
use pd_core::{Change, ConversionWarning, Prompt, ResponseError, decode_response};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

// ─── Config ───────────────────────────────────────────────────────────────

/// Configuration for `AiService`.
///
/// Deserializable from JSON; every field left out keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Model name passed through to the client. Default: `gpt-4.1`.
    pub model: String,

    /// Completion token cap. Default: **4096**.
    pub max_tokens: u32,

    /// Sampling temperature. Default: **0.7**.
    pub temperature: f32,

    /// Ask the model for a bare JSON object response. Default: **true**.
    pub json_response: bool,

    /// Pause between consecutive changes yielded by `stream`. Default: **100 ms**.
    pub stream_delay_ms: u64,

    /// Log decoded events and converted changes at debug level. Default: **false**.
    pub log_payloads: bool,

    /// System message sent ahead of every prompt.
    pub system_prompt: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4.1".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            json_response: true,
            stream_delay_ms: 100,
            log_payloads: false,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

// ─── Model client seam ────────────────────────────────────────────────────

/// Everything a transport needs to issue one chat completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub json_response: bool,
}

/// A chat-completion transport. Returns the raw text of the first choice.
pub trait ModelClient {
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, ServiceError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("model transport failed: {0}")]
    Transport(String),

    #[error("model call was aborted")]
    Aborted,

    #[error("model returned no content")]
    EmptyResponse,

    #[error(transparent)]
    Response(#[from] ResponseError),
}

// ─── Service ──────────────────────────────────────────────────────────────

/// Result of one generate call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiResult {
    pub changes: Vec<Change>,
    /// Events skipped during conversion.
    pub warnings: Vec<ConversionWarning>,
}

pub struct AiService<C> {
    client: C,
    config: ServiceConfig,
}

impl<C: ModelClient> AiService<C> {
    pub fn new(client: C, config: ServiceConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one full cycle and return every change at once.
    ///
    /// # Errors
    /// Transport failures and malformed responses are terminal for the
    /// request. Per-event conversion problems are returned as warnings.
    pub async fn generate(&self, prompt: &Prompt) -> Result<AiResult, ServiceError> {
        let conversion = self.run(prompt).await?;
        Ok(AiResult {
            changes: conversion.changes,
            warnings: conversion.warnings,
        })
    }

    /// Run one full cycle, then hand changes out one at a time with
    /// `stream_delay_ms` between them.
    pub async fn stream(&self, prompt: &Prompt) -> Result<ChangeStream, ServiceError> {
        let conversion = self.run(prompt).await?;
        Ok(ChangeStream::new(
            conversion,
            Duration::from_millis(self.config.stream_delay_ms),
        ))
    }

    async fn run(&self, prompt: &Prompt) -> Result<Conversion, ServiceError> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: build_messages(prompt, &self.config.system_prompt),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            json_response: self.config.json_response,
        };

        let raw = self.client.complete(&request).await?;
        if raw.trim().is_empty() {
            return Err(ServiceError::EmptyResponse);
        }

        let response = decode_response(&raw)?;
        if self.config.log_payloads {
            log::debug!("decoded events: {:?}", response.events);
        }

        let conversion = convert_events(prompt, &response.events);
        if self.config.log_payloads {
            log::debug!("converted changes: {:?}", conversion.changes);
        }
        Ok(conversion)
    }
}

// ─── Streaming ────────────────────────────────────────────────────────────

/// Paced, in-order delivery of an already-converted batch.
/// Dropping the stream stops delivery; nothing is left half-applied here.
#[derive(Debug)]
pub struct ChangeStream {
    changes: std::vec::IntoIter<Change>,
    warnings: Vec<ConversionWarning>,
    delay: Duration,
    started: bool,
}

impl ChangeStream {
    fn new(conversion: Conversion, delay: Duration) -> Self {
        Self {
            changes: conversion.changes.into_iter(),
            warnings: conversion.warnings,
            delay,
            started: false,
        }
    }

    /// Next change, after the pacing delay (none before the first).
    ///
    /// The change is only taken once the delay has elapsed, so dropping this
    /// future mid-sleep leaves it for the next call.
    pub async fn next(&mut self) -> Option<Change> {
        if self.changes.as_slice().is_empty() {
            return None;
        }
        if self.started && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.started = true;
        self.changes.next()
    }

    pub fn remaining(&self) -> usize {
        self.changes.len()
    }

    pub fn warnings(&self) -> &[ConversionWarning] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_fills_missing_fields() {
        let config: ServiceConfig =
            serde_json::from_str(r#"{ "model": "local", "stream_delay_ms": 0 }"#).unwrap();
        assert_eq!(config.model, "local");
        assert_eq!(config.stream_delay_ms, 0);
        assert_eq!(config.max_tokens, 4096);
        assert!(config.json_response);
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }
}

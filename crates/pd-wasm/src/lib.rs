//! WASM bridge for PD. Exposes response decoding and change conversion to
//! the browser canvas host.
//!
//! Compiled via `wasm-pack build --target web`. Every function takes and
//! returns JSON strings: `{"ok":true,...}` on success or
//! `{"ok":false,"error":"..."}` on failure, so the host never has to catch
//! a thrown value.

use pd_core::prompt::Prompt;
use pd_core::{ModelResponse, convert_events};
use pd_editor::{MemoryCanvas, apply_changes};
use serde_json::{Value, json};
use wasm_bindgen::prelude::*;

// ─── Canvas mirror ───────────────────────────────────────────────────────

/// Headless mirror of the host canvas.
///
/// Lets the host preview what a model response would do before committing
/// it to the real editor, and produce the `canvasContent` for the next turn.
#[wasm_bindgen]
pub struct PdCanvas {
    canvas: MemoryCanvas,
}

#[wasm_bindgen]
impl PdCanvas {
    #[wasm_bindgen(constructor)]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        Self {
            canvas: MemoryCanvas::new(),
        }
    }

    /// Decode, convert and apply one raw model response.
    ///
    /// Returns `{"ok":true,"applied":n,"talk":..,"warnings":[..]}` where
    /// `warnings` holds both skipped events and refused changes.
    pub fn apply_response(&mut self, raw: &str) -> String {
        let response = match pd_core::decode_response(raw) {
            Ok(response) => response,
            Err(e) => return error_json(&e.to_string()),
        };
        let conversion = convert_events(&Prompt::default(), &response.events);
        let report = apply_changes(&mut self.canvas, &conversion.changes);

        let warnings: Vec<String> = conversion
            .warnings
            .iter()
            .map(ToString::to_string)
            .chain(report.warnings.iter().map(ToString::to_string))
            .collect();
        for warning in &warnings {
            console_warn(warning);
        }

        json!({
            "ok": true,
            "applied": report.applied,
            "talk": report.talk,
            "warnings": warnings,
        })
        .to_string()
    }

    /// Shapes currently on the mirror, in the host's `canvasContent` shape.
    pub fn snapshot(&self) -> String {
        match serde_json::to_string(&self.canvas.snapshot()) {
            Ok(json) => format!(r#"{{"ok":true,"canvasContent":{json}}}"#),
            Err(e) => error_json(&format!("Serialization error: {e}")),
        }
    }

    pub fn shape_count(&self) -> usize {
        self.canvas.len()
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("PD WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

fn console_warn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&msg.into());
    #[cfg(not(target_arch = "wasm32"))]
    log::warn!("{msg}");
}

fn error_json(message: &str) -> String {
    json!({ "ok": false, "error": message }).to_string()
}

fn response_json(response: &ModelResponse) -> Result<Value, serde_json::Error> {
    Ok(json!({
        "strategy": response.long_description_of_strategy,
        "events": serde_json::to_value(&response.events)?,
    }))
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// Decode a raw model response into sanitized, validated events.
/// Returns `{"ok":true,"strategy":"..","events":[...]}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn decode_response(raw: &str) -> String {
    console_error_panic_hook_setup();
    match pd_core::decode_response(raw) {
        Ok(response) => match response_json(&response) {
            Ok(mut value) => {
                value["ok"] = Value::Bool(true);
                value.to_string()
            }
            Err(e) => error_json(&format!("Serialization error: {e}")),
        },
        Err(e) => error_json(&e.to_string()),
    }
}

/// Decode a raw model response and convert it into editor changes.
/// Returns `{"ok":true,"changes":[...],"warnings":["..."]}`.
///
/// `prompt_json` is the prompt that produced the response; pass an empty
/// string when it is not at hand.
#[wasm_bindgen]
pub fn convert_response(raw: &str, prompt_json: &str) -> String {
    console_error_panic_hook_setup();
    let prompt = match parse_prompt_or_default(prompt_json) {
        Ok(prompt) => prompt,
        Err(e) => return error_json(&e),
    };
    let response = match pd_core::decode_response(raw) {
        Ok(response) => response,
        Err(e) => return error_json(&e.to_string()),
    };

    let conversion = convert_events(&prompt, &response.events);
    let warnings: Vec<String> = conversion.warnings.iter().map(ToString::to_string).collect();
    for warning in &warnings {
        console_warn(warning);
    }
    match serde_json::to_value(&conversion.changes) {
        Ok(changes) => json!({ "ok": true, "changes": changes, "warnings": warnings }).to_string(),
        Err(e) => error_json(&format!("Serialization error: {e}")),
    }
}

/// Human-readable canvas summary the model sees ahead of the user text.
/// Returns `{"ok":true,"text":"..."}`.
#[wasm_bindgen]
pub fn describe_prompt(prompt_json: &str) -> String {
    match serde_json::from_str::<Prompt>(prompt_json) {
        Ok(prompt) => {
            json!({ "ok": true, "text": pd_core::prompt::describe_context(&prompt) }).to_string()
        }
        Err(e) => error_json(&format!("Invalid prompt: {e}")),
    }
}

/// Chat messages for one model call. An empty `system_prompt` selects the
/// built-in one. Returns `{"ok":true,"messages":[...]}`.
#[wasm_bindgen]
pub fn build_messages(prompt_json: &str, system_prompt: &str) -> String {
    let prompt = match serde_json::from_str::<Prompt>(prompt_json) {
        Ok(prompt) => prompt,
        Err(e) => return error_json(&format!("Invalid prompt: {e}")),
    };
    let system = if system_prompt.is_empty() {
        pd_core::prompt::DEFAULT_SYSTEM_PROMPT
    } else {
        system_prompt
    };
    match serde_json::to_value(pd_core::build_messages(&prompt, system)) {
        Ok(messages) => json!({ "ok": true, "messages": messages }).to_string(),
        Err(e) => error_json(&format!("Serialization error: {e}")),
    }
}

/// Editor-namespaced form of a model shape id (`box` → `shape:box`).
#[wasm_bindgen]
pub fn namespace_shape_id(raw: &str) -> String {
    pd_core::namespace_id(raw).into_owned()
}

fn parse_prompt_or_default(prompt_json: &str) -> Result<Prompt, String> {
    if prompt_json.trim().is_empty() {
        return Ok(Prompt::default());
    }
    serde_json::from_str(prompt_json).map_err(|e| format!("Invalid prompt: {e}"))
}

//! The caller's request and the chat messages built from it.
//!
//! A `Prompt` is what the canvas host sends per user turn: the user message
//! (plain or multimodal), a snapshot of the canvas, and two bounding boxes.
//! `build_messages` turns it into the system + user chat messages sent to
//! the model; the transport that sends them lives outside this crate.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write as _;

/// Instruction block sent as the system message by default.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a drawing assistant working on an infinite canvas.
Answer every request with a single JSON object of the form
{"long_description_of_strategy": string, "events": Event[]}.

Each event has a "type" and an optional "intent":
- {"type":"think","text"}: private reasoning, not shown to the user.
- {"type":"talk","text"}: a message for the user.
- {"type":"create"|"update","shape": Shape}
- {"type":"move","shapeId","x","y"}
- {"type":"delete","shapeId"}

Each shape has a "type", a "shapeId" and an optional "note":
- text: x, y, text, color?, textAlign? ("start" | "middle" | "end")
- rectangle | ellipse: x, y, width, height, color?, fill?, text?
- line: x1, y1, x2, y2, color?
- arrow: x1, y1, x2, y2, fromId?, toId?, color?, text?

Colors: red, light-red, green, light-green, blue, light-blue, orange,
yellow, black, violet, light-violet, grey, white.
Fills: none, tint, semi, solid, pattern.
Reuse the ids of existing shapes when updating, moving or deleting them."#;

// ─── Prompt ──────────────────────────────────────────────────────────────

/// One user turn as serialized by the canvas host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub message: PromptMessage,
    /// Optional screenshot of the prompt area, as a data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub canvas_content: CanvasContent,
    #[serde(default)]
    pub context_bounds: Bounds,
    #[serde(default)]
    pub prompt_bounds: Bounds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// Plain text or an ordered list of text/image parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptMessage {
    Text(String),
    Parts(Vec<MessagePart>),
}

impl Default for PromptMessage {
    fn default() -> Self {
        PromptMessage::Text(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessagePart {
    Text {
        #[serde(default)]
        text: String,
    },
    Image {
        #[serde(default)]
        src: Option<String>,
    },
}

/// Snapshot of the editor's records. Shapes are kept as opaque JSON: the
/// editor owns their schema and only a few common fields are read here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasContent {
    #[serde(default)]
    pub shapes: Vec<Value>,
    #[serde(default)]
    pub bindings: Vec<Value>,
    #[serde(default)]
    pub assets: Vec<Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

// ─── Chat messages ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: ChatContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Build the system and user messages for one model call.
///
/// The user message opens with a summary of the canvas so the model can
/// reuse existing shape ids. Image parts without a `src` are dropped.
pub fn build_messages(prompt: &Prompt, system_prompt: &str) -> Vec<ChatMessage> {
    let summary = format!("{}\nUser instruction: ", describe_context(prompt));

    let content = match &prompt.message {
        PromptMessage::Text(text) => ChatContent::Text(format!("{summary}{text}")),
        PromptMessage::Parts(parts) => {
            let mut out = vec![ContentPart::Text { text: summary }];
            for part in parts {
                match part {
                    MessagePart::Text { text } => out.push(ContentPart::Text { text: text.clone() }),
                    MessagePart::Image { src: Some(src) } => out.push(ContentPart::ImageUrl {
                        image_url: ImageUrl { url: src.clone() },
                    }),
                    MessagePart::Image { src: None } => {}
                }
            }
            ChatContent::Parts(out)
        }
    };

    vec![
        ChatMessage {
            role: Role::System,
            content: ChatContent::Text(system_prompt.to_string()),
        },
        ChatMessage {
            role: Role::User,
            content,
        },
    ]
}

/// Canvas summary block: viewport, shape list, binding count.
pub fn describe_context(prompt: &Prompt) -> String {
    let b = prompt.context_bounds;
    format!(
        "Current canvas state:\n\
         - Viewport: x={:.0}, y={:.0}, w={:.0}, h={:.0}\n\
         - Shapes on canvas:\n{}\n\
         - Existing bindings: {}\n",
        b.x,
        b.y,
        b.w,
        b.h,
        describe_canvas(&prompt.canvas_content),
        prompt.canvas_content.bindings.len()
    )
}

/// One line per existing shape, e.g.
/// `  1. geo (id: shape:box), position: (10, 20), geo: rectangle size: 100x50`.
pub fn describe_canvas(content: &CanvasContent) -> String {
    if content.shapes.is_empty() {
        return "  (canvas is empty)".to_string();
    }

    let mut out = String::new();
    for (i, shape) in content.shapes.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let kind = shape.get("type").and_then(Value::as_str).unwrap_or("unknown");
        let id = shape.get("id").and_then(Value::as_str).unwrap_or("?");
        let x = number(shape, "x").unwrap_or(0.0);
        let y = number(shape, "y").unwrap_or(0.0);
        let _ = write!(out, "  {}. {kind} (id: {id}), position: ({x:.0}, {y:.0})", i + 1);
        if let Some(details) = shape_details(kind, shape.get("props")) {
            let _ = write!(out, ", {details}");
        }
    }
    out
}

fn shape_details(kind: &str, props: Option<&Value>) -> Option<String> {
    let props = props?;
    let size = match (number(props, "w"), number(props, "h")) {
        (Some(w), Some(h)) => Some(format!("size: {w:.0}x{h:.0}")),
        _ => None,
    };

    match kind {
        "text" | "note" => {
            let text = match (props.get("text"), props.get("richText")) {
                (Some(Value::String(s)), _) => s.clone(),
                (_, Some(rich)) => rich_text_plain(rich),
                _ => String::new(),
            };
            Some(format!("text: {text:?}"))
        }
        "geo" => {
            let geo = props.get("geo").and_then(Value::as_str).unwrap_or("unknown");
            Some(match size {
                Some(size) => format!("geo: {geo} {size}"),
                None => format!("geo: {geo}"),
            })
        }
        _ => size,
    }
}

/// Collect the text runs of a serialized rich-text document.
fn rich_text_plain(doc: &Value) -> String {
    let Some(paragraphs) = doc.get("content").and_then(Value::as_array) else {
        return doc.as_str().map(str::to_string).unwrap_or_default();
    };
    paragraphs
        .iter()
        .map(|p| {
            p.get("content")
                .and_then(Value::as_array)
                .map(|runs| {
                    runs.iter()
                        .filter_map(|r| r.get("text").and_then(Value::as_str))
                        .collect::<String>()
                })
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn number(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn prompt_with_shapes(shapes: Vec<Value>) -> Prompt {
        Prompt {
            message: PromptMessage::Text("draw a cat".into()),
            canvas_content: CanvasContent {
                shapes,
                ..Default::default()
            },
            context_bounds: Bounds {
                x: 0.0,
                y: 0.0,
                w: 1000.0,
                h: 800.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn empty_canvas_is_described() {
        assert_eq!(describe_canvas(&CanvasContent::default()), "  (canvas is empty)");
    }

    #[test]
    fn shapes_are_listed_with_details() {
        let content = CanvasContent {
            shapes: vec![
                json!({ "type": "geo", "id": "shape:box", "x": 10.2, "y": 20, "props": { "geo": "rectangle", "w": 100, "h": 50 } }),
                json!({ "type": "text", "id": "shape:t", "x": 0, "y": 0, "props": { "richText": {
                    "type": "doc", "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "Hi" }] }]
                } } }),
                json!({ "type": "frame", "id": "shape:f", "props": { "w": 300, "h": 200 } }),
                json!({ "type": "draw", "id": "shape:d", "x": 1, "y": 2 }),
            ],
            ..Default::default()
        };
        assert_eq!(
            describe_canvas(&content),
            "  1. geo (id: shape:box), position: (10, 20), geo: rectangle size: 100x50\n\
             \x20 2. text (id: shape:t), position: (0, 0), text: \"Hi\"\n\
             \x20 3. frame (id: shape:f), position: (0, 0), size: 300x200\n\
             \x20 4. draw (id: shape:d), position: (1, 2)"
        );
    }

    #[test]
    fn plain_message_is_appended_to_summary() {
        let messages = build_messages(&prompt_with_shapes(vec![]), "SYS");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, ChatContent::Text("SYS".into()));
        let ChatContent::Text(user) = &messages[1].content else {
            panic!("expected text content");
        };
        assert!(user.starts_with("Current canvas state:\n- Viewport: x=0, y=0, w=1000, h=800\n"));
        assert!(user.contains("(canvas is empty)"));
        assert!(user.ends_with("User instruction: draw a cat"));
    }

    #[test]
    fn multimodal_message_becomes_parts() {
        let mut prompt = prompt_with_shapes(vec![]);
        prompt.message = PromptMessage::Parts(vec![
            MessagePart::Text { text: "copy this".into() },
            MessagePart::Image { src: Some("data:image/png;base64,AA".into()) },
            MessagePart::Image { src: None },
        ]);
        let messages = build_messages(&prompt, DEFAULT_SYSTEM_PROMPT);
        let ChatContent::Parts(parts) = &messages[1].content else {
            panic!("expected parts");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1], ContentPart::Text { text: "copy this".into() });
        assert_eq!(
            serde_json::to_value(&parts[2]).unwrap(),
            json!({ "type": "image_url", "image_url": { "url": "data:image/png;base64,AA" } })
        );
    }

    #[test]
    fn prompt_decodes_from_host_json() {
        let prompt: Prompt = serde_json::from_value(json!({
            "message": [{ "type": "text", "text": "hi" }, { "type": "image", "src": "data:x" }],
            "canvasContent": { "shapes": [], "bindings": [{}], "assets": [] },
            "contextBounds": { "x": 0, "y": 0, "w": 10, "h": 10 },
            "promptBounds": { "x": 1, "y": 1, "w": 5, "h": 5 }
        }))
        .unwrap();
        assert_eq!(prompt.canvas_content.bindings.len(), 1);
        assert_eq!(prompt.prompt_bounds.w, 5.0);
        assert!(matches!(prompt.message, PromptMessage::Parts(ref p) if p.len() == 2));
    }
}

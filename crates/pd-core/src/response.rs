//! Raw model output → typed `ModelResponse`.
//!
//! Pipeline: strip an optional Markdown code fence → parse JSON → sanitize →
//! validate. Any failure is a terminal `InvalidResponseFormat` carrying the
//! untouched raw text.

use crate::error::ResponseError;
use crate::model::ModelResponse;
use crate::sanitize::sanitize_response;
use crate::schema::validate_response;
use serde_json::Value;
use winnow::ascii::{line_ending, space0};
use winnow::combinator::{delimited, opt};
use winnow::prelude::*;
use winnow::token::{take_until, take_while};

/// Decode one complete model response.
///
/// # Errors
/// `ResponseError::InvalidResponseFormat` if the text is not JSON, or does not
/// match the Response Envelope schema after sanitization.
pub fn decode_response(raw: &str) -> Result<ModelResponse, ResponseError> {
    let body = strip_code_fence(raw);

    let mut value: Value = serde_json::from_str(body)
        .map_err(|e| invalid(raw, format!("response is not valid JSON: {e}")))?;

    sanitize_response(&mut value);

    validate_response(&value).map_err(|violation| invalid(raw, violation.to_string()))
}

fn invalid(raw: &str, reason: String) -> ResponseError {
    log::warn!("invalid model response ({reason}): {raw}");
    ResponseError::InvalidResponseFormat {
        reason,
        raw: raw.to_string(),
    }
}

/// Return the body of a response wrapped in a single ```` ``` ```` fence
/// (with or without a language tag). Unfenced input is returned trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let mut input = trimmed;
    match fenced_body.parse_next(&mut input) {
        Ok(body) if input.trim().is_empty() => body.trim(),
        _ => trimmed,
    }
}

fn fenced_body<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited(
        (
            "```",
            take_while(0.., |c: char| c.is_ascii_alphanumeric()),
            space0,
            opt(line_ending),
        ),
        take_until(0.., "```"),
        "```",
    )
    .parse_next(input)
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Event, Shape, TextAlign};

    const VALID: &str = r#"{"long_description_of_strategy":"s","events":[{"type":"talk","text":"hi"}]}"#;

    #[test]
    fn plain_json_decodes() {
        let response = decode_response(VALID).unwrap();
        assert_eq!(response.events.len(), 1);
    }

    #[test]
    fn fenced_json_decodes() {
        let raw = format!("```json\n{VALID}\n```\n");
        assert_eq!(strip_code_fence(&raw), VALID);
        assert!(decode_response(&raw).is_ok());

        let bare = format!("```{VALID}```");
        assert_eq!(strip_code_fence(&bare), VALID);
    }

    #[test]
    fn trailing_prose_after_fence_is_not_stripped() {
        let raw = format!("```json\n{VALID}\n``` hope this helps");
        assert_eq!(strip_code_fence(&raw), raw.trim());
        assert!(decode_response(&raw).is_err());
    }

    #[test]
    fn non_json_keeps_raw_payload() {
        let err = decode_response("Sure! Here is your drawing.").unwrap_err();
        let ResponseError::InvalidResponseFormat { reason, raw } = &err;
        assert!(reason.starts_with("response is not valid JSON"));
        assert_eq!(raw, "Sure! Here is your drawing.");
        assert_eq!(err.raw(), "Sure! Here is your drawing.");
    }

    #[test]
    fn schema_failure_is_invalid_format() {
        let raw = r#"{"long_description_of_strategy":"s","events":[{"type":"paint"}]}"#;
        let err = decode_response(raw).unwrap_err();
        assert!(err.to_string().contains("events[0].type"), "{err}");
        assert_eq!(err.raw(), raw);
    }

    #[test]
    fn sanitizer_runs_before_validation() {
        let raw = r#"{"long_description_of_strategy":"s","events":[
            {"type":"create","shape":{"type":"text","shapeId":"t","x":0,"y":0,"textAlign":"center","text":null}},
            {"type":"talk","text":null}
        ]}"#;
        let response = decode_response(raw).unwrap();
        match &response.events[0] {
            Event::Create { shape: Shape::Text(t), .. } => {
                assert_eq!(t.text_align, TextAlign::Middle);
                assert_eq!(t.text, "");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            response.events[1],
            Event::Talk {
                text: String::new(),
                intent: String::new()
            }
        );
    }
}

//! Normalization of upstream error bodies
//!
//! The upstream service reports errors as `{"detail": ...}` where `detail` is
//! either a plain message or a list of field-error objects carrying a `msg`.
//! The gateway collapses the list form into a single string before it reaches
//! the browser, and the client side extracts one human-readable message from
//! whichever shape arrives.

use serde_json::{Map, Value as JsonValue};

/// Fallback text for a field error that carries no usable message
pub const UNKNOWN_FIELD_ERROR: &str = "Validation error";

/// Join a list of field errors into one comma-separated message
fn join_field_errors(errors: &[JsonValue]) -> String {
    errors
        .iter()
        .map(|error| match error {
            JsonValue::String(message) => message.clone(),
            other => other
                .get("msg")
                .and_then(JsonValue::as_str)
                .unwrap_or(UNKNOWN_FIELD_ERROR)
                .to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Collapse a list-valued `detail` into a `{"detail": "<joined>"}` body.
///
/// Returns `None` when the body does not carry a list-valued `detail`, in
/// which case it should be relayed unchanged.
#[must_use]
pub fn collapse_detail(body: &JsonValue) -> Option<JsonValue> {
    let errors = body.get("detail")?.as_array()?;

    let mut collapsed = Map::new();
    collapsed.insert(
        "detail".to_string(),
        JsonValue::String(join_field_errors(errors)),
    );
    Some(JsonValue::Object(collapsed))
}

/// Extract a human-readable message from an error body.
///
/// Looks at `detail` first (string or list of field errors), then at
/// `message`.
#[must_use]
pub fn error_message(body: &JsonValue) -> Option<String> {
    match body.get("detail") {
        Some(JsonValue::String(message)) if !message.is_empty() => {
            return Some(message.clone());
        }
        Some(JsonValue::Array(errors)) if !errors.is_empty() => {
            return Some(join_field_errors(errors));
        }
        _ => {}
    }

    body.get("message")
        .and_then(JsonValue::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /chat`.
#[derive(Debug, Serialize, Clone)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Successful `POST /chat` response.
#[derive(Debug, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Pull a one-line summary out of a backend error body.
///
/// Accepts `{"error": "..."}`, `{"error": {"message": "..."}}` and
/// `{"message": "..."}`. Whitespace runs are collapsed.
pub fn extract_error_summary(value: &Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
}

/// Summarize an arbitrary response body for logs.
pub fn summarize_error_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => extract_error_summary(&value),
        Err(_) => Some(trimmed.lines().next().unwrap_or(trimmed).to_string()),
    }
}

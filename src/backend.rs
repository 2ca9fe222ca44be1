//! Backend seam for the chat engine.
//!
//! The engine talks to the remote conversational backend through the
//! [`ChatBackend`] trait, so tests can drive it with an in-process
//! implementation. The production implementation lives in [`crate::webhook`].

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("webhook returned {status}: {body}")]
    Status { status: u16, body: String },
}

pub type ChatResult<T> = Result<T, ChatError>;

/// One outbound exchange. Field names are fixed by the webhook contract.
#[derive(Clone, Debug, Serialize)]
pub struct OutboundMessage {
    pub message: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Deliver one message and return the backend's raw JSON reply body.
    /// Bodies that are not valid JSON are passed through as JSON strings so
    /// they flow through [`extract_reply_text`] unchanged.
    async fn send(&self, outbound: &OutboundMessage) -> ChatResult<Value>;
}

/// Reply keys tried in order. The webhook's shape is not under our control,
/// so several known layouts are accepted.
const REPLY_KEYS: [&str; 4] = ["output", "response", "message", "text"];

/// Pull the displayable reply text out of a webhook response body.
///
/// A key matches when it holds a non-empty string. When no key matches, a
/// bare string body is used directly; anything else is serialized wholesale
/// so the caller always gets something displayable.
pub fn extract_reply_text(body: &Value) -> String {
    if let Some(object) = body.as_object() {
        for key in REPLY_KEYS {
            if let Some(text) = object.get(key).and_then(Value::as_str)
                && !text.is_empty()
            {
                return text.to_string();
            }
        }
    }
    if let Some(text) = body.as_str() {
        return text.to_string();
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_matching_key_wins() {
        let body = json!({"response": "A", "text": "B"});
        assert_eq!(extract_reply_text(&body), "A");
    }

    #[test]
    fn keys_are_tried_in_precedence_order() {
        let body = json!({"text": "T", "message": "M", "response": "R", "output": "O"});
        assert_eq!(extract_reply_text(&body), "O");
    }

    #[test]
    fn later_key_used_when_earlier_ones_are_absent() {
        assert_eq!(extract_reply_text(&json!({"text": "B"})), "B");
    }

    #[test]
    fn non_string_values_fall_through() {
        let body = json!({"output": 5, "text": "B"});
        assert_eq!(extract_reply_text(&body), "B");
    }

    #[test]
    fn empty_strings_fall_through() {
        let body = json!({"output": "", "response": "A"});
        assert_eq!(extract_reply_text(&body), "A");
    }

    #[test]
    fn bare_string_body_is_used_directly() {
        assert_eq!(extract_reply_text(&json!("C")), "C");
    }

    #[test]
    fn unknown_shape_falls_back_to_serialized_body() {
        assert_eq!(extract_reply_text(&json!({"foo": 1})), r#"{"foo":1}"#);
    }
}

//! Bot API request and response types.
//!
//! See: <https://core.telegram.org/bots/api#sendmessage>

use serde::{Deserialize, Serialize};

/// Text formatting mode for `sendMessage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    /// Legacy Markdown (`*bold*`, `_italic_`, `` `code` ``).
    Markdown,
}

/// Body of a `sendMessage` call.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessage {
    /// Target chat id or `@channelusername`.
    pub chat_id: String,
    pub text: String,
    pub parse_mode: ParseMode,
}

/// Envelope returned by every Bot API method.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<u16>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_wire_format() {
        let body = SendMessage {
            chat_id: "-100200".to_string(),
            text: "hello".to_string(),
            parse_mode: ParseMode::Markdown,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"chat_id": "-100200", "text": "hello", "parse_mode": "Markdown"})
        );
    }

    #[test]
    fn test_error_envelope() {
        let response: ApiResponse = serde_json::from_str(
            r#"{"ok": false, "error_code": 400, "description": "Bad Request: can't parse entities"}"#,
        )
        .unwrap();
        assert!(!response.ok);
        assert_eq!(response.error_code, Some(400));
    }
}

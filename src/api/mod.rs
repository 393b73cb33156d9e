use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod http;

pub use http::HttpChatTransport;

/// Path of the chat endpoint, relative to the configured server URL.
pub const CHAT_ENDPOINT: &str = "api/chat";

/// One user turn as sent to the server. At least one field is always set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

impl ChatPayload {
    /// Builds a payload from the non-empty parts. Returns `None` when neither
    /// a message nor an image is present.
    pub fn new(message: Option<String>, image: Option<String>) -> Option<Self> {
        let message = message.filter(|text| !text.is_empty());
        let image = image.filter(|data| !data.is_empty());
        if message.is_none() && image.is_none() {
            return None;
        }
        Some(Self { message, image })
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
}

impl ChatReply {
    /// The reply text, if the server sent a non-blank one.
    pub fn text(&self) -> Option<&str> {
        self.response
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Failures of a single chat exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced an HTTP response (refused, reset, timed out).
    Connect(String),

    /// The server answered with a non-success status.
    Status {
        status: u16,
        /// `response` field of the error body, when the server sent one.
        response: Option<String>,
    },

    /// A success status whose body was not the expected JSON.
    Decode(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connect(reason) => write!(f, "connection failed: {reason}"),
            TransportError::Status { status, .. } => {
                write!(f, "server returned HTTP {status}")
            }
            TransportError::Decode(reason) => write!(f, "malformed response body: {reason}"),
        }
    }
}

impl StdError for TransportError {}

/// The single outbound collaborator of the chat widget.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, payload: &ChatPayload) -> Result<ChatReply, TransportError>;

    /// Human readable destination, shown in the transcript title.
    fn endpoint(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payloads_are_refused() {
        assert!(ChatPayload::new(None, None).is_none());
        assert!(ChatPayload::new(Some(String::new()), Some(String::new())).is_none());
    }

    #[test]
    fn text_payload_omits_image_key() {
        let payload = ChatPayload::new(Some("Hello".into()), None).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Hello" }));
    }

    #[test]
    fn combined_payload_carries_both_keys() {
        let payload = ChatPayload::new(
            Some("what is this?".into()),
            Some("data:image/png;base64,AAAA".into()),
        )
        .unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["message"], "what is this?");
        assert_eq!(json["image"], "data:image/png;base64,AAAA");
    }

    #[test]
    fn reply_text_ignores_blank_and_missing_responses() {
        let missing: ChatReply = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.text(), None);

        let blank: ChatReply = serde_json::from_str(r#"{"response": "  "}"#).unwrap();
        assert_eq!(blank.text(), None);

        let extra: ChatReply =
            serde_json::from_str(r#"{"response": "Hi there", "label": "x"}"#).unwrap();
        assert_eq!(extra.text(), Some("Hi there"));
    }
}

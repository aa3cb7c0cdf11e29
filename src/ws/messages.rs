//! WebSocket frame types: inbound classification and outbound formats.
//!
//! Inbound text frames are either a bare bearer token (identity binding)
//! or a JSON chat envelope carrying a `type` field. Classification happens
//! once, into [`InboundFrame`], and the router dispatches on the variant.
//! Outbound frames are plain text, not JSON, with fixed formats.

use std::fmt;

use serde::Deserialize;

use crate::domain::ClientKey;

/// Inbound chat envelope as sent by clients.
///
/// ```json
/// {"type": "private", "targetUserId": "42", "content": "hi"}
/// {"type": "broadcast", "content": "hello everyone"}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    /// Message kind: `"private"` or `"broadcast"`. Anything else is
    /// answered with an unknown-type error frame.
    #[serde(rename = "type")]
    pub kind: String,
    /// Routing key of the recipient; required for private messages.
    #[serde(rename = "targetUserId")]
    pub target_user_id: Option<String>,
    /// Message body, relayed verbatim.
    #[serde(default)]
    pub content: String,
}

/// A classified inbound text frame.
#[derive(Debug, Clone)]
pub enum InboundFrame {
    /// A bare bearer token submitted for identity binding.
    Bind(String),
    /// A structured chat envelope.
    Chat(ChatMessage),
    /// JSON that carries a `type` field but does not fit the envelope.
    Malformed,
}

impl InboundFrame {
    /// Classifies a raw text frame.
    ///
    /// A frame is a chat envelope iff it parses as a JSON object with a
    /// `type` field; everything else — including non-JSON text and JSON
    /// without `type` — is treated as a bare token.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) if value.get("type").is_some() => {
                match serde_json::from_value::<ChatMessage>(value) {
                    Ok(msg) => Self::Chat(msg),
                    Err(_) => Self::Malformed,
                }
            }
            _ => Self::Bind(text.trim().to_string()),
        }
    }
}

/// Outbound text frames with their fixed wire formats.
#[derive(Debug, Clone)]
pub enum OutboundFrame {
    /// Ephemeral key announcement sent right after the handshake.
    ClientId(ClientKey),
    /// Confirmation of a successful identity binding.
    CustomClientId(i64),
    /// A private message relayed to its target.
    Private {
        /// Sender's ephemeral key.
        from: ClientKey,
        /// Message body.
        content: String,
    },
    /// A broadcast message relayed to every connection.
    Broadcast {
        /// Sender's ephemeral key.
        from: ClientKey,
        /// Message body.
        content: String,
    },
    /// The addressed private-message target is not registered.
    TargetNotFound(String),
    /// The chat envelope carried an unrecognized `type`.
    UnknownMessageType,
    /// The submitted binding token failed verification.
    InvalidToken,
    /// The frame carried a `type` field but was not a valid envelope.
    Malformed,
}

impl fmt::Display for OutboundFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientId(key) => write!(f, "Your client ID: {key}"),
            Self::CustomClientId(id) => write!(f, "Your custom client ID: {id}"),
            Self::Private { from, content } => {
                write!(f, "Private message from {from}: {content}")
            }
            Self::Broadcast { from, content } => {
                write!(f, "Broadcast message from {from}: {content}")
            }
            Self::TargetNotFound(key) => write!(f, "Error: Target user {key} not found"),
            Self::UnknownMessageType => write!(f, "Error: Unknown message type"),
            Self::InvalidToken => write!(f, "Error: invalid token"),
            Self::Malformed => write!(f, "Error: malformed message"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn bare_token_classifies_as_bind() {
        let frame = InboundFrame::classify("eyJhbGciOiJIUzI1NiJ9.payload.sig");
        assert!(matches!(frame, InboundFrame::Bind(t) if t.starts_with("eyJ")));
    }

    #[test]
    fn json_without_type_classifies_as_bind() {
        let frame = InboundFrame::classify(r#"{"content": "no envelope here"}"#);
        assert!(matches!(frame, InboundFrame::Bind(_)));
    }

    #[test]
    fn private_envelope_classifies_as_chat() {
        let frame =
            InboundFrame::classify(r#"{"type":"private","targetUserId":"42","content":"hi"}"#);
        let InboundFrame::Chat(msg) = frame else {
            panic!("expected chat frame");
        };
        assert_eq!(msg.kind, "private");
        assert_eq!(msg.target_user_id.as_deref(), Some("42"));
        assert_eq!(msg.content, "hi");
    }

    #[test]
    fn broadcast_envelope_needs_no_target() {
        let frame = InboundFrame::classify(r#"{"type":"broadcast","content":"all"}"#);
        let InboundFrame::Chat(msg) = frame else {
            panic!("expected chat frame");
        };
        assert_eq!(msg.kind, "broadcast");
        assert!(msg.target_user_id.is_none());
    }

    #[test]
    fn typed_json_with_wrong_shape_is_malformed() {
        let frame = InboundFrame::classify(r#"{"type": 7, "content": "hi"}"#);
        assert!(matches!(frame, InboundFrame::Malformed));
    }

    #[test]
    fn outbound_formats_are_exact() {
        let key = ClientKey::new("abc");
        assert_eq!(
            OutboundFrame::ClientId(key.clone()).to_string(),
            "Your client ID: abc"
        );
        assert_eq!(
            OutboundFrame::CustomClientId(42).to_string(),
            "Your custom client ID: 42"
        );
        assert_eq!(
            OutboundFrame::Private {
                from: key.clone(),
                content: "hi".to_string()
            }
            .to_string(),
            "Private message from abc: hi"
        );
        assert_eq!(
            OutboundFrame::Broadcast {
                from: key,
                content: "yo".to_string()
            }
            .to_string(),
            "Broadcast message from abc: yo"
        );
        assert_eq!(
            OutboundFrame::TargetNotFound("42".to_string()).to_string(),
            "Error: Target user 42 not found"
        );
        assert_eq!(
            OutboundFrame::UnknownMessageType.to_string(),
            "Error: Unknown message type"
        );
        assert_eq!(
            OutboundFrame::InvalidToken.to_string(),
            "Error: invalid token"
        );
    }
}

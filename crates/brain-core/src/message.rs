//! Message types exchanged with a brain.

use serde::{Deserialize, Serialize};

/// A user message addressed to a brain.
///
/// `session_id` selects the conversation history the message belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Conversation session (thread) identifier.
    pub session_id: String,
    /// Message text.
    pub text: String,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
}

impl InboundMessage {
    /// Create a message for the given session.
    pub fn new(session_id: impl Into<String>, text: impl Into<String>, timestamp: u64) -> Self {
        Self {
            session_id: session_id.into(),
            text: text.into(),
            timestamp,
        }
    }
}

/// A brain's reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Session the reply belongs to.
    pub session_id: String,
    /// Reply text.
    pub text: String,
}

impl OutboundMessage {
    /// Create a reply to an inbound message, keeping its session.
    pub fn reply_to(message: &InboundMessage, text: impl Into<String>) -> Self {
        Self {
            session_id: message.session_id.clone(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_keeps_session() {
        let inbound = InboundMessage::new("thread-1", "hello", 1_700_000_000);
        let reply = OutboundMessage::reply_to(&inbound, "hi");

        assert_eq!(reply.session_id, "thread-1");
        assert_eq!(reply.text, "hi");
    }
}

//! Chat message domain type.

use serde::{Deserialize, Serialize};

use mercado_core::MessageId;

/// A chat message as stored and as broadcast to clients.
///
/// The `user` field is a free-text label chosen by the sender, not a
/// reference to a registered user. There is no timestamp; history ordering
/// is the store's natural insertion order (ascending ID).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Store-assigned identifier.
    pub id: MessageId,
    /// Sender label as given by the client.
    pub user: String,
    /// Message text.
    #[serde(rename = "message")]
    pub body: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let msg = ChatMessage {
            id: MessageId::new(1),
            user: "ana".to_string(),
            body: "hola".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"id":1,"user":"ana","message":"hola"}"#);

        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}

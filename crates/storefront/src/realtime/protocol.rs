//! Wire protocol for the realtime channel.
//!
//! JSON text frames tagged by `event`, mirroring what the browser widget
//! speaks: `message` and `productList` inbound; `Alerta`, `messages`, and
//! `updatedProducts` outbound.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::message::ChatMessage;

/// Events a connected client can send.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// A chat message to persist and rebroadcast.
    #[serde(rename = "message")]
    Message { user: String, message: String },

    /// An updated product list to relay verbatim to every client.
    /// The payload shape is not validated.
    #[serde(rename = "productList")]
    ProductList(Value),
}

/// Events the server sends to connected clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Someone new connected. No payload.
    #[serde(rename = "Alerta")]
    Alert,

    /// The full ordered chat history, re-fetched from the store.
    #[serde(rename = "messages")]
    Messages(Vec<ChatMessage>),

    /// A product list payload relayed verbatim.
    #[serde(rename = "updatedProducts")]
    UpdatedProducts(Value),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mercado_core::MessageId;

    #[test]
    fn test_client_message_wire_shape() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"event":"message","data":{"user":"ana","message":"hola"}}"#,
        )
        .unwrap();
        assert!(matches!(
            event,
            ClientEvent::Message { ref user, ref message } if user == "ana" && message == "hola"
        ));
    }

    #[test]
    fn test_client_product_list_accepts_any_payload() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"productList","data":[{"anything":true},42]}"#)
                .unwrap();
        let ClientEvent::ProductList(payload) = event else {
            panic!("wrong variant");
        };
        assert!(payload.is_array());
    }

    #[test]
    fn test_alert_has_no_payload() {
        let json = serde_json::to_string(&ServerEvent::Alert).unwrap();
        assert_eq!(json, r#"{"event":"Alerta"}"#);
    }

    #[test]
    fn test_messages_event_wire_shape() {
        let event = ServerEvent::Messages(vec![ChatMessage {
            id: MessageId::new(1),
            user: "ana".to_string(),
            body: "hola".to_string(),
        }]);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"event":"messages","data":[{"id":1,"user":"ana","message":"hola"}]}"#
        );
    }

    #[test]
    fn test_updated_products_relays_verbatim() {
        let payload = serde_json::json!({"products": ["a", "b"]});
        let event = ServerEvent::UpdatedProducts(payload.clone());
        let json = serde_json::to_string(&event).unwrap();
        let back: ServerEvent = serde_json::from_str(&json).unwrap();
        let ServerEvent::UpdatedProducts(relayed) = back else {
            panic!("wrong variant");
        };
        assert_eq!(relayed, payload);
    }
}

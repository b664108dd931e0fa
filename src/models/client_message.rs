use serde::{Deserialize, Serialize};

use super::subscription::Subscription;

/// Client-to-server messages on the real-time channel.
///
/// Serialized as flat JSON records discriminated by `type`:
///
/// ```json
/// {"type": "authenticate", "token": "eyJhbGc..."}
/// {"type": "subscribe", "entity": "transaction", "id": "T1"}
/// {"type": "unsubscribe", "entity": "transaction", "id": "T1"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Authentication handshake, sent immediately after the transport opens.
    ///
    /// Fire-and-forget: no acknowledgement is awaited. A server that rejects
    /// the token closes the transport, which funnels into the reconnect path.
    Authenticate {
        /// Opaque bearer token.
        token: String,
    },

    /// Watch an entity for real-time updates.
    Subscribe {
        /// Entity kind, e.g. `"transaction"`.
        entity: String,
        /// Entity identifier.
        id: String,
    },

    /// Stop watching an entity.
    Unsubscribe {
        /// Entity kind.
        entity: String,
        /// Entity identifier.
        id: String,
    },
}

impl ClientMessage {
    /// Subscribe message for an entry of the active-subscription set.
    pub fn subscribe(subscription: &Subscription) -> Self {
        Self::Subscribe {
            entity: subscription.entity.clone(),
            id: subscription.id.clone(),
        }
    }

    /// Unsubscribe message for an entry of the active-subscription set.
    pub fn unsubscribe(subscription: &Subscription) -> Self {
        Self::Unsubscribe {
            entity: subscription.entity.clone(),
            id: subscription.id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_authenticate_wire_format() {
        let msg = ClientMessage::Authenticate {
            token: "tok-1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "authenticate", "token": "tok-1"})
        );
    }

    #[test]
    fn test_subscribe_wire_format() {
        let sub = Subscription::new("transaction", "T1");
        assert_eq!(
            serde_json::to_value(ClientMessage::subscribe(&sub)).unwrap(),
            json!({"type": "subscribe", "entity": "transaction", "id": "T1"})
        );
        assert_eq!(
            serde_json::to_value(ClientMessage::unsubscribe(&sub)).unwrap(),
            json!({"type": "unsubscribe", "entity": "transaction", "id": "T1"})
        );
    }
}

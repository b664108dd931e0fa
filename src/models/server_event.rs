use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultLinkError};

/// Decoded server-to-client event from the real-time channel.
///
/// The wire format is a flat JSON record discriminated by `type`. The variant
/// set is closed here but open on the wire: frames with an unrecognized
/// `type` decode to `None` so newer servers can introduce event kinds without
/// breaking deployed clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A watched transaction changed status.
    TransactionUpdate {
        /// Transaction identifier.
        #[serde(rename = "transactionId")]
        transaction_id: String,
        /// New status, e.g. `"pending"`, `"confirmed"`, `"failed"`.
        status: String,
    },

    /// A broadcast notification for the user.
    Notification {
        /// Human-readable notification text.
        message: String,
    },
}

impl ServerEvent {
    /// Decode a raw text frame.
    ///
    /// Returns `Ok(None)` for structurally valid frames whose `type` is not a
    /// known event kind, and `Err(DecodeError)` for frames that are not valid
    /// JSON, lack the discriminant, or carry a known `type` with a malformed
    /// body. Neither outcome is fatal to the connection.
    pub fn decode(raw: &str) -> Result<Option<ServerEvent>> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| VaultLinkError::DecodeError(format!("invalid JSON: {}", e)))?;

        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                VaultLinkError::DecodeError("missing `type` discriminant".to_string())
            })?
            .to_string();

        match kind.as_str() {
            "transaction_update" | "notification" => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| {
                    VaultLinkError::DecodeError(format!("malformed `{}` event: {}", kind, e))
                }),
            other => {
                log::debug!("Ignoring unrecognized server event type '{}'", other);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_transaction_update() {
        let event = ServerEvent::decode(
            r#"{"type":"transaction_update","transactionId":"T1","status":"confirmed"}"#,
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            event,
            ServerEvent::TransactionUpdate {
                transaction_id: "T1".to_string(),
                status: "confirmed".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_notification() {
        let event = ServerEvent::decode(r#"{"type":"notification","message":"hello"}"#)
            .unwrap()
            .unwrap();

        assert_eq!(
            event,
            ServerEvent::Notification {
                message: "hello".to_string(),
            }
        );
    }

    #[test]
    fn test_unrecognized_type_is_ignored() {
        let result = ServerEvent::decode(r#"{"type":"balance_snapshot","vaultId":"V1"}"#);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let result = ServerEvent::decode("{not json");
        assert!(matches!(result, Err(VaultLinkError::DecodeError(_))));
    }

    #[test]
    fn test_missing_discriminant_is_decode_error() {
        let result = ServerEvent::decode(r#"{"transactionId":"T1"}"#);
        assert!(matches!(result, Err(VaultLinkError::DecodeError(_))));
    }

    #[test]
    fn test_known_type_with_malformed_body_is_decode_error() {
        let result = ServerEvent::decode(r#"{"type":"transaction_update","status":"x"}"#);
        assert!(matches!(result, Err(VaultLinkError::DecodeError(_))));
    }
}

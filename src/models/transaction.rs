use serde::{Deserialize, Serialize};

/// Settlement status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Created or broadcast, awaiting confirmations.
    Pending,
    /// Confirmed on chain.
    Confirmed,
    /// Rejected or dropped.
    Failed,
}

/// A blockchain transaction handled by the custody platform.
///
/// Real-time status changes for a watched transaction arrive as
/// [`ServerEvent::TransactionUpdate`](super::ServerEvent::TransactionUpdate)
/// events; this record is the REST-surface view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction identifier.
    pub id: String,
    /// Vault the transaction belongs to.
    pub vault_id: String,
    /// Blockchain network.
    pub blockchain_type: String,
    /// Source address.
    pub from_address: String,
    /// Destination address.
    pub to_address: String,
    /// Amount in the chain's smallest unit, as a decimal string.
    pub amount: String,
    /// Network fee, as a decimal string.
    pub fee: String,
    /// Settlement status.
    pub status: TransactionStatus,
    /// On-chain transaction hash, empty until broadcast.
    pub tx_hash: String,
    /// Confirmation count.
    pub confirmations: u32,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last update timestamp (RFC 3339).
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let tx = Transaction {
            id: "T1".to_string(),
            vault_id: "V1".to_string(),
            blockchain_type: "ethereum".to_string(),
            from_address: "0xabc".to_string(),
            to_address: "0xdef".to_string(),
            amount: "1000000000000000000".to_string(),
            fee: "21000".to_string(),
            status: TransactionStatus::Pending,
            tx_hash: String::new(),
            confirmations: 0,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_string(&tx).unwrap();
        assert_eq!(serde_json::from_str::<Transaction>(&json).unwrap(), tx);
    }
}

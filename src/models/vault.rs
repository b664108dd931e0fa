use serde::{Deserialize, Serialize};

/// Lifecycle status of a vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VaultStatus {
    /// Operational; transactions may be created.
    Active,
    /// Administratively disabled.
    Inactive,
    /// Frozen pending review; balance is held but immutable.
    Locked,
}

/// A custody vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vault {
    /// Vault identifier.
    pub id: String,
    /// Owning organization.
    pub organization_id: String,
    /// Display name.
    pub name: String,
    /// Blockchain network, e.g. `"ethereum"`.
    pub blockchain_type: String,
    /// On-chain deposit address.
    pub address: String,
    /// Balance in the chain's smallest unit, as a decimal string to avoid
    /// precision loss.
    pub balance: String,
    /// Lifecycle status.
    pub status: VaultStatus,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last update timestamp (RFC 3339).
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&VaultStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::from_str::<VaultStatus>("\"locked\"").unwrap(),
            VaultStatus::Locked
        );
    }
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Aggregated transaction metrics for a reporting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionAnalytics {
    /// Number of transactions in the window.
    pub total_count: u64,
    /// Total volume moved, as a decimal string.
    pub total_volume: String,
    /// Transaction counts keyed by settlement status.
    #[serde(default)]
    pub by_status: HashMap<String, u64>,
}

/// Aggregated vault metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultAnalytics {
    /// Total number of vaults.
    pub total_vaults: u64,
    /// Vaults currently in the active state.
    pub active_vaults: u64,
    /// Sum of vault balances, as a decimal string.
    pub total_balance: String,
    /// Vault counts keyed by blockchain network.
    #[serde(default)]
    pub by_blockchain: HashMap<String, u64>,
}

use serde::{Deserialize, Serialize};

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// The long-lived refresh token.
    pub refresh_token: String,
}

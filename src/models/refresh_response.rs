use serde::{Deserialize, Serialize};

/// Token refresh response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// The new short-lived access token.
    pub access_token: String,
}

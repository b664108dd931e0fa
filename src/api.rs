//! REST surface of the custody platform.
//!
//! Thin HTTP layer behind [`VaultLinkClient`](crate::VaultLinkClient): bearer
//! authentication on every request and a 401 → refresh-token-and-retry-once
//! policy when the credential is a refreshable session.

use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::auth::AuthProvider;
use crate::error::{Result, VaultLinkError};
use crate::models::{
    RefreshRequest, RefreshResponse, Transaction, TransactionAnalytics, Vault, VaultAnalytics,
};

/// Executes REST calls against the platform API.
#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    auth: AuthProvider,
}

impl ApiClient {
    pub(crate) fn new(base_url: String, http: reqwest::Client, auth: AuthProvider) -> Self {
        Self {
            base_url,
            http,
            auth,
        }
    }

    pub(crate) async fn list_vaults(&self) -> Result<Vec<Vault>> {
        self.get_json("/api/v1/vault/list", &[]).await
    }

    pub(crate) async fn get_vault(&self, id: &str) -> Result<Vault> {
        self.get_json(&format!("/api/v1/vault/{}", id), &[]).await
    }

    pub(crate) async fn list_transactions(&self, vault_id: Option<&str>) -> Result<Vec<Transaction>> {
        let mut query = Vec::new();
        if let Some(vault_id) = vault_id {
            query.push(("vault_id", vault_id));
        }
        self.get_json("/api/v1/transactions/list", &query).await
    }

    pub(crate) async fn get_transaction(&self, id: &str) -> Result<Transaction> {
        self.get_json(&format!("/api/v1/transactions/{}", id), &[])
            .await
    }

    pub(crate) async fn transaction_analytics(&self) -> Result<TransactionAnalytics> {
        self.get_json("/api/v1/analytics/transactions", &[]).await
    }

    pub(crate) async fn vault_analytics(&self) -> Result<VaultAnalytics> {
        self.get_json("/api/v1/analytics/vaults", &[]).await
    }

    /// GET a JSON resource with bearer auth.
    ///
    /// A 401 with a refresh-capable credential triggers one token refresh and
    /// one retry; a second 401 surfaces as `AuthenticationError`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut refreshed = false;

        loop {
            // Build the request fresh on each attempt.
            let mut request = self.http.get(&url);
            if !query.is_empty() {
                request = request.query(query);
            }
            request = self.auth.apply_to_request(request);

            debug!("[API] GET {}", url);
            let response = request.send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response.json::<T>().await?);
            }

            if status == reqwest::StatusCode::UNAUTHORIZED && !refreshed && self.auth.can_refresh()
            {
                warn!("[API] 401 from {}; refreshing access token and retrying", url);
                self.refresh_access_token().await?;
                refreshed = true;
                continue;
            }

            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(VaultLinkError::AuthenticationError(format!(
                    "request rejected (401): {}",
                    message
                )));
            }
            return Err(VaultLinkError::ServerError {
                status_code: status.as_u16(),
                message,
            });
        }
    }

    /// Exchange the refresh token for a new access token and install it on
    /// the shared session.
    async fn refresh_access_token(&self) -> Result<()> {
        let AuthProvider::Session(tokens) = &self.auth else {
            return Err(VaultLinkError::AuthenticationError(
                "no refreshable session credential".to_string(),
            ));
        };
        let refresh_token = tokens.refresh_token().ok_or_else(|| {
            VaultLinkError::AuthenticationError("no refresh token available".to_string())
        })?;

        let url = format!("{}/api/v1/auth/refresh", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(VaultLinkError::AuthenticationError(format!(
                "token refresh failed ({}): {}",
                status, message
            )));
        }

        let refreshed: RefreshResponse = response.json().await?;
        tokens.set_access_token(refreshed.access_token);
        debug!("[API] Access token refreshed");
        Ok(())
    }
}

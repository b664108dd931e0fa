//! Bearer credential source for the vault custody platform.
//!
//! Every HTTP request carries an `Authorization: Bearer` header and the
//! real-time channel authenticates with an `authenticate` message sent right
//! after the transport opens. Both paths read the credential from the same
//! [`AuthProvider`], so a token installed by the HTTP refresh flow is picked
//! up by the next WebSocket reconnect without any coordination.

use std::sync::{Arc, RwLock};

/// Shared, refreshable session tokens.
///
/// Cloning is cheap and all clones observe updates. The HTTP layer calls
/// [`set_access_token`](SessionTokens::set_access_token) after a successful
/// refresh; the connection manager reads the access token at each connect.
#[derive(Debug, Clone, Default)]
pub struct SessionTokens {
    inner: Arc<RwLock<TokenPair>>,
}

#[derive(Debug, Default)]
struct TokenPair {
    access: Option<String>,
    refresh: Option<String>,
}

impl SessionTokens {
    /// Create a session with an access token and, optionally, a refresh token.
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(TokenPair {
                access: Some(access_token.into()),
                refresh: refresh_token,
            })),
        }
    }

    /// The current access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.inner.read().unwrap().access.clone()
    }

    /// The refresh token, if any.
    pub fn refresh_token(&self) -> Option<String> {
        self.inner.read().unwrap().refresh.clone()
    }

    /// Install a new access token (e.g. after a refresh).
    pub fn set_access_token(&self, token: impl Into<String>) {
        self.inner.write().unwrap().access = Some(token.into());
    }
}

/// Credential source for HTTP requests and the WebSocket handshake.
///
/// # Examples
///
/// ```rust
/// use vault_link::{AuthProvider, SessionTokens};
///
/// // Fixed bearer token
/// let auth = AuthProvider::bearer_token("eyJhbGc...");
///
/// // Refreshable session (401 responses trigger one refresh-and-retry)
/// let auth = AuthProvider::session(SessionTokens::new(
///     "access-token",
///     Some("refresh-token".to_string()),
/// ));
/// ```
#[derive(Debug, Clone)]
pub enum AuthProvider {
    /// Fixed bearer token.
    BearerToken(String),

    /// Refreshable session: bearer access token plus a refresh token.
    Session(SessionTokens),

    /// No authentication.
    None,
}

impl AuthProvider {
    /// Create a fixed bearer token credential.
    pub fn bearer_token(token: impl Into<String>) -> Self {
        Self::BearerToken(token.into())
    }

    /// Create a refreshable session credential.
    pub fn session(tokens: SessionTokens) -> Self {
        Self::Session(tokens)
    }

    /// No authentication.
    pub fn none() -> Self {
        Self::None
    }

    /// The token to present right now, if any.
    ///
    /// Read, never cached: the connection manager calls this at every connect
    /// so a refreshed session token takes effect on the next reconnect.
    pub fn current_token(&self) -> Option<String> {
        match self {
            Self::BearerToken(token) => Some(token.clone()),
            Self::Session(tokens) => tokens.access_token(),
            Self::None => None,
        }
    }

    /// Whether a 401 response can be answered with a token refresh.
    pub fn can_refresh(&self) -> bool {
        matches!(self, Self::Session(tokens) if tokens.refresh_token().is_some())
    }

    /// Attach the `Authorization` header to an HTTP request builder.
    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.current_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Check if authentication is configured.
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::None)
    }
}

//! Data models for the vault-link client library.
//!
//! Wire messages for the real-time channel, REST resource records, and
//! connection configuration.

pub mod analytics;
pub mod client_message;
pub mod connection_options;
pub mod connection_state;
pub mod refresh_request;
pub mod refresh_response;
pub mod server_event;
pub mod subscription;
pub mod transaction;
pub mod vault;

pub use analytics::{TransactionAnalytics, VaultAnalytics};
pub use client_message::ClientMessage;
pub use connection_options::ConnectionOptions;
pub use connection_state::ConnectionState;
pub use refresh_request::RefreshRequest;
pub use refresh_response::RefreshResponse;
pub use server_event::ServerEvent;
pub use subscription::Subscription;
pub use transaction::{Transaction, TransactionStatus};
pub use vault::{Vault, VaultStatus};

//! Client SDK for the vault custody platform.
//!
//! Two surfaces:
//!
//! - **REST** ([`VaultLinkClient`]): vaults, transactions and analytics, with
//!   bearer authentication and a 401 → refresh-and-retry-once policy.
//! - **Real-time** ([`ConnectionManager`]): one managed WebSocket channel
//!   that authenticates on connect, tracks per-entity subscriptions, decodes
//!   inbound frames into typed [`ServerEvent`]s handed to a [`DispatchSink`],
//!   and reconnects with exponential backoff, replaying the subscription set
//!   each time the connection reaches Open.
//!
//! # Example
//!
//! ```rust,no_run
//! use vault_link::{DispatchSink, VaultLinkClient};
//!
//! # async fn example() -> vault_link::Result<()> {
//! let client = VaultLinkClient::builder()
//!     .base_url("https://api.example.com")
//!     .bearer_token("eyJhbGc...")
//!     .build()?;
//!
//! let vaults = client.list_vaults().await?;
//! println!("{} vault(s)", vaults.len());
//!
//! let (sink, mut events) = DispatchSink::channel(256);
//! let manager = client.realtime(sink)?;
//! manager.start().await?;
//! manager.subscribe("transaction", "T1").await?;
//!
//! while let Some(event) = events.recv().await {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

mod api;
pub mod auth;
mod client;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod event_handlers;
pub mod models;
pub mod store;
pub mod timeouts;

pub use auth::{AuthProvider, SessionTokens};
pub use client::{VaultLinkClient, VaultLinkClientBuilder};
pub use connection::ConnectionManager;
pub use dispatch::DispatchSink;
pub use error::{Result, VaultLinkError};
pub use event_handlers::{ConnectionError, DisconnectReason, EventHandlers};
pub use models::{ClientMessage, ConnectionOptions, ConnectionState, ServerEvent, Subscription};
pub use store::{StoreSnapshot, VaultStore};
pub use timeouts::VaultLinkTimeouts;

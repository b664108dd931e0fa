//! Observable client-side state fed by the dispatch sink.
//!
//! The store is the default consumer for decoded server events: a
//! per-transaction status map plus a bounded notification feed, observed
//! through `tokio::sync::watch` snapshots. It is mutated only through its
//! [`apply`](VaultStore::apply) reducer. The connection manager never writes
//! here directly; events arrive through the sink returned by
//! [`VaultStore::sink`].
//!
//! # Example
//!
//! ```rust,no_run
//! use vault_link::store::VaultStore;
//!
//! # async fn example() -> vault_link::Result<()> {
//! # let client = vault_link::VaultLinkClient::builder()
//! #     .base_url("https://api.example.com")
//! #     .build()?;
//! let store = VaultStore::new();
//! let manager = client.realtime(store.sink())?;
//! manager.start().await?;
//! manager.subscribe("transaction", "T1").await?;
//!
//! let mut state = store.watch();
//! while state.changed().await.is_ok() {
//!     let snapshot = state.borrow().clone();
//!     println!("T1 status: {:?}", snapshot.transaction_status.get("T1"));
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;

use crate::dispatch::DispatchSink;
use crate::models::ServerEvent;

/// Notifications retained per snapshot; older entries are dropped.
const MAX_NOTIFICATIONS: usize = 100;

/// Snapshot of dashboard-relevant state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    /// Latest known status per transaction id.
    pub transaction_status: HashMap<String, String>,
    /// Most recent notifications, oldest first.
    pub notifications: Vec<String>,
}

/// Mutable, observable state container.
#[derive(Debug)]
pub struct VaultStore {
    state: watch::Sender<StoreSnapshot>,
}

impl VaultStore {
    /// Create an empty store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: watch::channel(StoreSnapshot::default()).0,
        })
    }

    /// Reduce one event into the state.
    pub fn apply(&self, event: &ServerEvent) {
        self.state.send_modify(|snapshot| match event {
            ServerEvent::TransactionUpdate {
                transaction_id,
                status,
            } => {
                snapshot
                    .transaction_status
                    .insert(transaction_id.clone(), status.clone());
            }
            ServerEvent::Notification { message } => {
                snapshot.notifications.push(message.clone());
                if snapshot.notifications.len() > MAX_NOTIFICATIONS {
                    let excess = snapshot.notifications.len() - MAX_NOTIFICATIONS;
                    snapshot.notifications.drain(..excess);
                }
            }
        });
    }

    /// Current state.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.borrow().clone()
    }

    /// Watch state changes.
    pub fn watch(&self) -> watch::Receiver<StoreSnapshot> {
        self.state.subscribe()
    }

    /// A dispatch sink that reduces every event into this store.
    pub fn sink(self: &Arc<Self>) -> DispatchSink {
        let store = Arc::clone(self);
        DispatchSink::new(move |event| store.apply(&event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_updates_keep_latest_status() {
        let store = VaultStore::new();
        store.apply(&ServerEvent::TransactionUpdate {
            transaction_id: "T1".to_string(),
            status: "pending".to_string(),
        });
        store.apply(&ServerEvent::TransactionUpdate {
            transaction_id: "T1".to_string(),
            status: "confirmed".to_string(),
        });

        let snapshot = store.snapshot();
        assert_eq!(
            snapshot.transaction_status.get("T1"),
            Some(&"confirmed".to_string())
        );
    }

    #[test]
    fn test_notification_feed_is_bounded() {
        let store = VaultStore::new();
        for i in 0..(MAX_NOTIFICATIONS + 10) {
            store.apply(&ServerEvent::Notification {
                message: format!("n{}", i),
            });
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.notifications.len(), MAX_NOTIFICATIONS);
        assert_eq!(snapshot.notifications.first().unwrap(), "n10");
        assert_eq!(
            snapshot.notifications.last().unwrap(),
            &format!("n{}", MAX_NOTIFICATIONS + 9)
        );
    }

    #[tokio::test]
    async fn test_sink_feeds_store() {
        let store = VaultStore::new();
        let sink = store.sink();
        let mut rx = store.watch();

        sink.dispatch(ServerEvent::TransactionUpdate {
            transaction_id: "T2".to_string(),
            status: "failed".to_string(),
        });

        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow().transaction_status.get("T2"),
            Some(&"failed".to_string())
        );
    }
}

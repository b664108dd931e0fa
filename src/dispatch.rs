//! Dispatch boundary between the connection manager and event consumers.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::models::ServerEvent;

/// Consumer of decoded server events.
///
/// The connection manager hands each decoded event to the sink synchronously,
/// in frame-arrival order, from its background task; the sink must not
/// block. Across a reconnect no ordering relation holds between events
/// delivered before and after the gap.
#[derive(Clone)]
pub struct DispatchSink {
    handler: Arc<dyn Fn(ServerEvent) + Send + Sync>,
}

impl DispatchSink {
    /// Wrap a callback.
    pub fn new(f: impl Fn(ServerEvent) + Send + Sync + 'static) -> Self {
        Self {
            handler: Arc::new(f),
        }
    }

    /// Queue-style consumer: events are pushed onto a bounded channel.
    ///
    /// If the receiver falls behind and the channel fills, further events are
    /// dropped with a warning rather than blocking the connection task.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        let sink = Self::new(move |event| {
            if let Err(e) = tx.try_send(event) {
                log::warn!("Dispatch channel full or closed; dropping event: {}", e);
            }
        });
        (sink, rx)
    }

    /// A sink that discards every event.
    pub fn discard() -> Self {
        Self::new(|_| {})
    }

    pub(crate) fn dispatch(&self, event: ServerEvent) {
        (self.handler)(event);
    }
}

impl fmt::Debug for DispatchSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchSink").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_delivers_in_order() {
        let (sink, mut rx) = DispatchSink::channel(8);
        sink.dispatch(ServerEvent::Notification {
            message: "one".to_string(),
        });
        sink.dispatch(ServerEvent::Notification {
            message: "two".to_string(),
        });

        assert_eq!(
            rx.recv().await,
            Some(ServerEvent::Notification {
                message: "one".to_string()
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(ServerEvent::Notification {
                message: "two".to_string()
            })
        );
    }

    #[test]
    fn test_discard_sink() {
        DispatchSink::discard().dispatch(ServerEvent::Notification {
            message: "dropped".to_string(),
        });
    }
}

//! Managed real-time connection to the platform's push-update service.
//!
//! Owns one logical WebSocket connection and handles:
//!
//! - Authentication handshake on every connect (fire-and-forget credential)
//! - A per-entity subscription set that survives reconnects and is replayed
//!   to the server each time the connection reaches Open
//! - Decoding inbound frames into [`ServerEvent`]s and handing them to the
//!   [`DispatchSink`] in frame-arrival order
//! - Automatic reconnection with exponential backoff and a bounded retry
//!   budget; an exhausted budget parks the connection in the Failed state
//!   until an explicit restart
//! - Keepalive pings with a pong timeout to detect dead connections
//!
//! All mutable connection state (lifecycle state, retry counter, subscription
//! set, transport handle) lives in a single background task; the public
//! [`ConnectionManager`] handle talks to it over a command channel, so
//! mutations are serialized by construction.

use std::collections::HashSet;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant as TokioInstant;
use tokio_tungstenite::tungstenite::{client::IntoClientRequest, protocol::Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::auth::AuthProvider;
use crate::dispatch::DispatchSink;
use crate::error::{Result, VaultLinkError};
use crate::event_handlers::{ConnectionError, DisconnectReason, EventHandlers};
use crate::models::{ClientMessage, ConnectionOptions, ConnectionState, ServerEvent, Subscription};
use crate::timeouts::VaultLinkTimeouts;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Capacity of the command channel between the handle and the task.
const CMD_CHANNEL_CAPACITY: usize = 256;

/// Maximum sleep duration that won't overflow `Instant + Duration`.
/// ~100 years is far enough into the future to be effectively "never".
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 3600);

/// Delay before the n-th reconnect attempt: `base × 2^(n−1)`, capped.
fn backoff_delay(options: &ConnectionOptions, attempt: u32) -> Duration {
    let shift = attempt.saturating_sub(1);
    let ms = options
        .reconnect_base_delay_ms
        .saturating_mul(2u64.saturating_pow(shift))
        .min(options.max_reconnect_delay_ms);
    Duration::from_millis(ms)
}

// ── Commands ────────────────────────────────────────────────────────────────

/// Commands sent from the public handle to the background connection task.
enum ConnCmd {
    /// Begin connecting from Idle or Failed; no-op in the other live states.
    Start {
        result_tx: oneshot::Sender<Result<()>>,
    },
    /// Write a message to the transport; requires Open.
    Send {
        message: ClientMessage,
        result_tx: oneshot::Sender<Result<()>>,
    },
    /// Add an entry to the active-subscription set.
    Subscribe {
        subscription: Subscription,
        result_tx: oneshot::Sender<Result<()>>,
    },
    /// Remove an entry from the active-subscription set.
    Unsubscribe {
        subscription: Subscription,
        result_tx: oneshot::Sender<Result<()>>,
    },
    /// Tear everything down; the task exits after replying.
    Shutdown { result_tx: oneshot::Sender<()> },
}

// ── ConnectionManager (public handle) ───────────────────────────────────────

/// Handle to a managed real-time connection.
///
/// Created with [`ConnectionManager::new`] (or via
/// [`VaultLinkClient::realtime`](crate::VaultLinkClient::realtime)). The
/// handle is a thin command-channel front end; the connection itself lives in
/// a background task until [`shutdown`](ConnectionManager::shutdown).
///
/// # Example
///
/// ```rust,no_run
/// use vault_link::models::ConnectionOptions;
/// use vault_link::{
///     AuthProvider, ConnectionManager, DispatchSink, EventHandlers, VaultLinkTimeouts,
/// };
///
/// # async fn example() -> vault_link::Result<()> {
/// let sink = DispatchSink::new(|event| println!("event: {:?}", event));
/// let manager = ConnectionManager::new(
///     "wss://api.example.com/api/v1/ws",
///     AuthProvider::bearer_token("eyJhbGc..."),
///     VaultLinkTimeouts::default(),
///     ConnectionOptions::default(),
///     sink,
///     EventHandlers::new(),
/// );
///
/// manager.start().await?;
/// manager.subscribe("transaction", "T1").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConnectionManager {
    /// Channel to the background connection task.
    cmd_tx: mpsc::Sender<ConnCmd>,
    /// Observed lifecycle state.
    state_rx: watch::Receiver<ConnectionState>,
    /// Background task handle.
    _task: JoinHandle<()>,
}

impl ConnectionManager {
    /// Create a manager in the Idle state and spawn its background task.
    ///
    /// Nothing connects until [`start`](ConnectionManager::start) is called;
    /// subscriptions registered before that wait in the set and are sent once
    /// the connection first reaches Open.
    pub fn new(
        url: impl Into<String>,
        auth: AuthProvider,
        timeouts: VaultLinkTimeouts,
        options: ConnectionOptions,
        sink: DispatchSink,
        handlers: EventHandlers,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(CMD_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Idle);

        let task = tokio::spawn(connection_task(
            cmd_rx,
            url.into(),
            auth,
            timeouts,
            options,
            sink,
            handlers,
            state_tx,
        ));

        Self {
            cmd_tx,
            state_rx,
            _task: task,
        }
    }

    /// Begin connecting.
    ///
    /// Transitions Idle → Connecting. From Failed this is the explicit
    /// restart path and begins a fresh connection epoch with a cleared retry
    /// budget. While Connecting, Authenticating, Open or Reconnecting it is a
    /// no-op. Fails with [`ManagerClosed`](VaultLinkError::ManagerClosed)
    /// after shutdown.
    pub async fn start(&self) -> Result<()> {
        self.request(|result_tx| ConnCmd::Start { result_tx }).await
    }

    /// Write a message to the transport.
    ///
    /// Requires the Open state: in any other state this fails with
    /// [`NotConnected`](VaultLinkError::NotConnected) and performs no
    /// transport write. Messages are never queued; callers racing a
    /// reconnect are expected to rely on subscription replay rather than
    /// retrying sends.
    pub async fn send(&self, message: ClientMessage) -> Result<()> {
        self.request(|result_tx| ConnCmd::Send { message, result_tx })
            .await
    }

    /// Watch an entity for real-time updates.
    ///
    /// Idempotent: adding an entry that is already present is a no-op. If the
    /// connection is Open a subscribe message goes out immediately for a
    /// fresh entry; otherwise the entry waits in the set and is sent when the
    /// connection next reaches Open.
    pub async fn subscribe(&self, entity: impl Into<String>, id: impl Into<String>) -> Result<()> {
        let subscription = Subscription::new(entity, id);
        self.request(|result_tx| ConnCmd::Subscribe {
            subscription,
            result_tx,
        })
        .await
    }

    /// Stop watching an entity.
    ///
    /// Removes the entry from the set and, if it existed and the connection
    /// is Open, sends an unsubscribe message. No-op for unknown entries.
    pub async fn unsubscribe(&self, entity: impl Into<String>, id: impl Into<String>) -> Result<()> {
        let subscription = Subscription::new(entity, id);
        self.request(|result_tx| ConnCmd::Unsubscribe {
            subscription,
            result_tx,
        })
        .await
    }

    /// Tear down the connection and end the background task.
    ///
    /// Cancels any pending reconnect timer, closes the transport if open and
    /// transitions unconditionally to Closed. Every operation afterwards
    /// (including a second `shutdown`) fails with
    /// [`ManagerClosed`](VaultLinkError::ManagerClosed).
    pub async fn shutdown(&self) -> Result<()> {
        let (result_tx, result_rx) = oneshot::channel();
        self.cmd_tx
            .send(ConnCmd::Shutdown { result_tx })
            .await
            .map_err(|_| VaultLinkError::ManagerClosed)?;
        result_rx.await.map_err(|_| VaultLinkError::ManagerClosed)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Watch lifecycle state transitions.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Whether the connection is currently Open.
    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    async fn request(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<()>>) -> ConnCmd,
    ) -> Result<()> {
        let (result_tx, result_rx) = oneshot::channel();
        self.cmd_tx
            .send(build(result_tx))
            .await
            .map_err(|_| VaultLinkError::ManagerClosed)?;
        result_rx.await.map_err(|_| VaultLinkError::ManagerClosed)?
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        // Best-effort shutdown signal.
        let (result_tx, _) = oneshot::channel();
        let _ = self.cmd_tx.try_send(ConnCmd::Shutdown { result_tx });
    }
}

// ── Background connection task ──────────────────────────────────────────────

/// Why the parked command loop returned.
enum WaitOutcome {
    StartRequested,
    Shutdown(Option<oneshot::Sender<()>>),
}

/// Why the backoff sleep returned.
enum BackoffOutcome {
    Completed,
    Shutdown(Option<oneshot::Sender<()>>),
}

/// Why the open-connection event loop returned.
enum OpenExit {
    Disconnected(DisconnectReason),
    Shutdown(oneshot::Sender<()>),
    HandlesDropped,
}

/// How a connection epoch ended.
enum EpochEnd {
    TransportLost,
    ShutdownRequested(Option<oneshot::Sender<()>>),
}

/// Publish a state transition and notify the state-change handler.
fn set_state(
    state_tx: &watch::Sender<ConnectionState>,
    handlers: &EventHandlers,
    next: ConnectionState,
) {
    let changed = state_tx.send_if_modified(|state| {
        if *state != next {
            *state = next;
            true
        } else {
            false
        }
    });
    if changed {
        debug!("Connection state -> {}", next);
        handlers.emit_state_change(next);
    }
}

/// The background task owning the connection.
///
/// Lifecycle: park in Idle until `start()`, then run connection epochs
/// (open, authenticate, replay subscriptions, pump frames), falling back to
/// exponential-backoff retries on transport loss, and parking in Failed once
/// the budget is spent.
#[allow(clippy::too_many_arguments)]
async fn connection_task(
    mut cmd_rx: mpsc::Receiver<ConnCmd>,
    url: String,
    auth: AuthProvider,
    timeouts: VaultLinkTimeouts,
    options: ConnectionOptions,
    sink: DispatchSink,
    handlers: EventHandlers,
    state_tx: watch::Sender<ConnectionState>,
) {
    let mut subs: HashSet<Subscription> = HashSet::new();
    let mut retry_attempts: u32 = 0;

    // Idle until the first start().
    match wait_for_start(&mut cmd_rx, &mut subs).await {
        WaitOutcome::StartRequested => {
            set_state(&state_tx, &handlers, ConnectionState::Connecting);
        }
        WaitOutcome::Shutdown(reply) => {
            set_state(&state_tx, &handlers, ConnectionState::Closed);
            if let Some(tx) = reply {
                let _ = tx.send(());
            }
            return;
        }
    }

    loop {
        // State is Connecting here.
        let epoch = run_epoch(
            &url,
            &auth,
            &timeouts,
            &mut cmd_rx,
            &mut subs,
            &mut retry_attempts,
            &sink,
            &handlers,
            &state_tx,
        )
        .await;

        match epoch {
            EpochEnd::ShutdownRequested(reply) => {
                set_state(&state_tx, &handlers, ConnectionState::Closed);
                if let Some(tx) = reply {
                    let _ = tx.send(());
                }
                return;
            }
            EpochEnd::TransportLost => {}
        }

        retry_attempts += 1;
        let give_up = !options.auto_reconnect || retry_attempts > options.max_reconnect_attempts;

        if give_up {
            if !options.auto_reconnect {
                warn!("Transport lost and auto-reconnect is disabled");
                handlers.emit_error(ConnectionError::new("auto-reconnect is disabled", false));
            } else {
                warn!(
                    "Reconnect budget exhausted after {} failed attempt(s)",
                    options.max_reconnect_attempts
                );
                handlers.emit_error(ConnectionError::new(
                    VaultLinkError::RetryExhausted(options.max_reconnect_attempts).to_string(),
                    false,
                ));
            }
            set_state(&state_tx, &handlers, ConnectionState::Failed);

            // Parked until an explicit restart.
            match wait_for_start(&mut cmd_rx, &mut subs).await {
                WaitOutcome::StartRequested => {
                    retry_attempts = 0;
                    set_state(&state_tx, &handlers, ConnectionState::Connecting);
                }
                WaitOutcome::Shutdown(reply) => {
                    set_state(&state_tx, &handlers, ConnectionState::Closed);
                    if let Some(tx) = reply {
                        let _ = tx.send(());
                    }
                    return;
                }
            }
        } else {
            set_state(&state_tx, &handlers, ConnectionState::Reconnecting);
            let delay = backoff_delay(&options, retry_attempts);
            info!(
                "Reconnect attempt {}/{} in {:?}",
                retry_attempts, options.max_reconnect_attempts, delay
            );
            match backoff_wait(&mut cmd_rx, &mut subs, delay).await {
                BackoffOutcome::Completed => {
                    set_state(&state_tx, &handlers, ConnectionState::Connecting);
                }
                BackoffOutcome::Shutdown(reply) => {
                    set_state(&state_tx, &handlers, ConnectionState::Closed);
                    if let Some(tx) = reply {
                        let _ = tx.send(());
                    }
                    return;
                }
            }
        }
    }
}

/// One connection epoch: open the transport, authenticate, replay the
/// subscription set, then pump frames and commands until the transport is
/// lost or the caller shuts down.
#[allow(clippy::too_many_arguments)]
async fn run_epoch(
    url: &str,
    auth: &AuthProvider,
    timeouts: &VaultLinkTimeouts,
    cmd_rx: &mut mpsc::Receiver<ConnCmd>,
    subs: &mut HashSet<Subscription>,
    retry_attempts: &mut u32,
    sink: &DispatchSink,
    handlers: &EventHandlers,
    state_tx: &watch::Sender<ConnectionState>,
) -> EpochEnd {
    let mut stream = match establish_transport(url, timeouts).await {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Failed to open transport: {}", e);
            handlers.emit_error(ConnectionError::new(e.to_string(), true));
            return EpochEnd::TransportLost;
        }
    };

    set_state(state_tx, handlers, ConnectionState::Authenticating);
    let handshake = match auth.current_token() {
        Some(token) => send_client_message(&mut stream, &ClientMessage::Authenticate { token }).await,
        None => {
            debug!("No credential available; skipping authenticate handshake");
            Ok(())
        }
    };
    if let Err(e) = handshake {
        warn!("Authenticate handshake send failed: {}", e);
        handlers.emit_error(ConnectionError::new(e.to_string(), true));
        return EpochEnd::TransportLost;
    }

    // The retry counter resets only here, on a successful open.
    set_state(state_tx, handlers, ConnectionState::Open);
    *retry_attempts = 0;
    handlers.emit_connect();

    if let Err(e) = replay_subscriptions(&mut stream, subs).await {
        warn!("Subscription replay failed: {}", e);
        handlers.emit_disconnect(DisconnectReason::new(format!(
            "subscription replay failed: {}",
            e
        )));
        return EpochEnd::TransportLost;
    }

    match open_loop(cmd_rx, &mut stream, subs, sink, timeouts).await {
        OpenExit::Disconnected(reason) => {
            info!("Transport lost: {}", reason);
            handlers.emit_disconnect(reason);
            EpochEnd::TransportLost
        }
        OpenExit::Shutdown(reply) => {
            let _ = stream.close(None).await;
            handlers.emit_disconnect(DisconnectReason::new("client shutdown"));
            EpochEnd::ShutdownRequested(Some(reply))
        }
        OpenExit::HandlesDropped => {
            let _ = stream.close(None).await;
            EpochEnd::ShutdownRequested(None)
        }
    }
}

/// Open the WebSocket transport, subject to the connection timeout.
async fn establish_transport(url: &str, timeouts: &VaultLinkTimeouts) -> Result<WsStream> {
    debug!("Opening transport to {}", url);
    let request = url.into_client_request().map_err(|e| {
        VaultLinkError::TransportError(format!("invalid WebSocket request: {}", e))
    })?;

    let connect_result = if VaultLinkTimeouts::is_no_timeout(timeouts.connection_timeout) {
        connect_async(request).await
    } else {
        match tokio::time::timeout(timeouts.connection_timeout, connect_async(request)).await {
            Ok(result) => result,
            Err(_) => {
                return Err(VaultLinkError::TimeoutError(format!(
                    "connect timeout ({:?})",
                    timeouts.connection_timeout
                )));
            }
        }
    };

    let (stream, _response) = connect_result
        .map_err(|e| VaultLinkError::TransportError(format!("connection failed: {}", e)))?;
    Ok(stream)
}

/// Serialize and write one client message.
async fn send_client_message(stream: &mut WsStream, message: &ClientMessage) -> Result<()> {
    let payload = serde_json::to_string(message).map_err(|e| {
        VaultLinkError::TransportError(format!("failed to serialize message: {}", e))
    })?;
    stream
        .send(Message::Text(payload.into()))
        .await
        .map_err(|e| VaultLinkError::TransportError(format!("failed to send message: {}", e)))
}

/// Send one subscribe message per entry of the active-subscription set.
async fn replay_subscriptions(stream: &mut WsStream, subs: &HashSet<Subscription>) -> Result<()> {
    if subs.is_empty() {
        return Ok(());
    }
    info!("Replaying {} active subscription(s)", subs.len());
    for subscription in subs {
        send_client_message(stream, &ClientMessage::subscribe(subscription)).await?;
    }
    Ok(())
}

/// Event loop while Open: multiplex inbound frames, caller commands and
/// keepalive timers.
async fn open_loop(
    cmd_rx: &mut mpsc::Receiver<ConnCmd>,
    stream: &mut WsStream,
    subs: &mut HashSet<Subscription>,
    sink: &DispatchSink,
    timeouts: &VaultLinkTimeouts,
) -> OpenExit {
    let has_keepalive = !timeouts.keepalive_interval.is_zero();
    let keepalive_dur = if has_keepalive {
        timeouts.keepalive_interval
    } else {
        FAR_FUTURE
    };
    let has_pong_timeout = has_keepalive && !timeouts.pong_timeout.is_zero();
    let mut awaiting_pong = false;
    let mut idle_deadline = TokioInstant::now() + keepalive_dur;
    let mut pong_deadline = TokioInstant::now() + FAR_FUTURE;

    loop {
        let idle_sleep = tokio::time::sleep_until(idle_deadline);
        tokio::pin!(idle_sleep);
        let pong_sleep = tokio::time::sleep_until(pong_deadline);
        tokio::pin!(pong_sleep);

        tokio::select! {
            biased;

            // Pong timeout: nothing arrived since our keepalive ping.
            _ = &mut pong_sleep, if has_pong_timeout && awaiting_pong => {
                warn!(
                    "Pong timeout ({:?}); treating connection as dead",
                    timeouts.pong_timeout
                );
                return OpenExit::Disconnected(DisconnectReason::new(format!(
                    "pong timeout ({:?})",
                    timeouts.pong_timeout
                )));
            }

            // Commands from the public handle.
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(ConnCmd::Start { result_tx }) => {
                        // Already connected.
                        let _ = result_tx.send(Ok(()));
                    }
                    Some(ConnCmd::Send { message, result_tx }) => {
                        match send_client_message(stream, &message).await {
                            Ok(()) => {
                                let _ = result_tx.send(Ok(()));
                            }
                            Err(e) => {
                                // The write failed, so the transport is effectively
                                // gone; the caller sees the same NotConnected it
                                // would have seen a moment later.
                                let _ = result_tx.send(Err(VaultLinkError::NotConnected));
                                return OpenExit::Disconnected(DisconnectReason::new(
                                    format!("send failed: {}", e),
                                ));
                            }
                        }
                    }
                    Some(ConnCmd::Subscribe { subscription, result_tx }) => {
                        if subs.insert(subscription.clone()) {
                            let message = ClientMessage::subscribe(&subscription);
                            if let Err(e) = send_client_message(stream, &message).await {
                                // The entry stays in the set; replay after the
                                // reconnect covers it.
                                let _ = result_tx.send(Ok(()));
                                return OpenExit::Disconnected(DisconnectReason::new(
                                    format!("subscribe send failed: {}", e),
                                ));
                            }
                        }
                        let _ = result_tx.send(Ok(()));
                    }
                    Some(ConnCmd::Unsubscribe { subscription, result_tx }) => {
                        if subs.remove(&subscription) {
                            let message = ClientMessage::unsubscribe(&subscription);
                            if let Err(e) = send_client_message(stream, &message).await {
                                let _ = result_tx.send(Ok(()));
                                return OpenExit::Disconnected(DisconnectReason::new(
                                    format!("unsubscribe send failed: {}", e),
                                ));
                            }
                        }
                        let _ = result_tx.send(Ok(()));
                    }
                    Some(ConnCmd::Shutdown { result_tx }) => {
                        return OpenExit::Shutdown(result_tx);
                    }
                    None => return OpenExit::HandlesDropped,
                }
            }

            // Keepalive ping on idle.
            _ = &mut idle_sleep, if has_keepalive && !awaiting_pong => {
                debug!("Keepalive: sending ping");
                if let Err(e) = stream.send(Message::Ping(Bytes::new())).await {
                    return OpenExit::Disconnected(DisconnectReason::new(format!(
                        "keepalive ping failed: {}",
                        e
                    )));
                }
                if has_pong_timeout {
                    awaiting_pong = true;
                    pong_deadline = TokioInstant::now() + timeouts.pong_timeout;
                }
                idle_deadline = TokioInstant::now() + keepalive_dur;
            }

            // Inbound frames.
            frame = stream.next() => {
                // Any frame proves the connection is alive.
                idle_deadline = TokioInstant::now() + keepalive_dur;
                if awaiting_pong {
                    awaiting_pong = false;
                    pong_deadline = TokioInstant::now() + FAR_FUTURE;
                }

                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match ServerEvent::decode(text.as_str()) {
                            Ok(Some(event)) => sink.dispatch(event),
                            Ok(None) => {}
                            Err(e) => warn!("Dropping undecodable frame: {}", e),
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        debug!("Ignoring unexpected binary frame");
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        let _ = stream.send(Message::Pong(payload)).await;
                    }
                    Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(frame))) => {
                        let reason = match frame {
                            Some(f) => DisconnectReason::with_code(
                                f.reason.to_string(),
                                f.code.into(),
                            ),
                            None => DisconnectReason::new("server closed connection"),
                        };
                        return OpenExit::Disconnected(reason);
                    }
                    Some(Ok(Message::Frame(_))) => {}
                    Some(Err(e)) => {
                        return OpenExit::Disconnected(DisconnectReason::new(format!(
                            "transport error: {}",
                            e
                        )));
                    }
                    None => {
                        return OpenExit::Disconnected(DisconnectReason::new(
                            "transport stream ended",
                        ));
                    }
                }
            }
        }
    }
}

/// Service commands while parked (Idle or Failed) until a start or shutdown.
///
/// Sends fail with `NotConnected`; subscription changes mutate the set so
/// they take effect when the connection next reaches Open.
async fn wait_for_start(
    cmd_rx: &mut mpsc::Receiver<ConnCmd>,
    subs: &mut HashSet<Subscription>,
) -> WaitOutcome {
    loop {
        match cmd_rx.recv().await {
            Some(ConnCmd::Start { result_tx }) => {
                let _ = result_tx.send(Ok(()));
                return WaitOutcome::StartRequested;
            }
            Some(ConnCmd::Send { result_tx, .. }) => {
                let _ = result_tx.send(Err(VaultLinkError::NotConnected));
            }
            Some(ConnCmd::Subscribe {
                subscription,
                result_tx,
            }) => {
                subs.insert(subscription);
                let _ = result_tx.send(Ok(()));
            }
            Some(ConnCmd::Unsubscribe {
                subscription,
                result_tx,
            }) => {
                subs.remove(&subscription);
                let _ = result_tx.send(Ok(()));
            }
            Some(ConnCmd::Shutdown { result_tx }) => {
                return WaitOutcome::Shutdown(Some(result_tx));
            }
            None => return WaitOutcome::Shutdown(None),
        }
    }
}

/// Sleep out the backoff delay while still servicing commands; a shutdown
/// cancels the pending attempt.
async fn backoff_wait(
    cmd_rx: &mut mpsc::Receiver<ConnCmd>,
    subs: &mut HashSet<Subscription>,
    delay: Duration,
) -> BackoffOutcome {
    let sleep_fut = tokio::time::sleep(delay);
    tokio::pin!(sleep_fut);

    loop {
        tokio::select! {
            biased;

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(ConnCmd::Start { result_tx }) => {
                        // Already on the way back up.
                        let _ = result_tx.send(Ok(()));
                    }
                    Some(ConnCmd::Send { result_tx, .. }) => {
                        let _ = result_tx.send(Err(VaultLinkError::NotConnected));
                    }
                    Some(ConnCmd::Subscribe { subscription, result_tx }) => {
                        subs.insert(subscription);
                        let _ = result_tx.send(Ok(()));
                    }
                    Some(ConnCmd::Unsubscribe { subscription, result_tx }) => {
                        subs.remove(&subscription);
                        let _ = result_tx.send(Ok(()));
                    }
                    Some(ConnCmd::Shutdown { result_tx }) => {
                        return BackoffOutcome::Shutdown(Some(result_tx));
                    }
                    None => return BackoffOutcome::Shutdown(None),
                }
            }

            _ = &mut sleep_fut => return BackoffOutcome::Completed,
        }
    }
}

#![allow(dead_code)]
//! In-process WebSocket server used by the integration tests.
//!
//! Plays the platform's push-update service: records every inbound JSON
//! message, lets tests inject frames, and can drop connections or stop
//! accepting to simulate outages.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::Message;

/// Instruction for one accepted connection.
pub enum ConnCommand {
    SendText(String),
    Close,
}

pub struct MockServer {
    addr: SocketAddr,
    accepted: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<serde_json::Value>>>,
    conns: Arc<Mutex<Vec<mpsc::UnboundedSender<ConnCommand>>>>,
    accept_task: JoinHandle<()>,
}

impl MockServer {
    /// Bind to an ephemeral port and start accepting.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        Self::run(listener)
    }

    /// Bind to a specific address, used to bring the endpoint back on a port
    /// the client under test is already configured for.
    pub async fn start_on(addr: SocketAddr) -> Self {
        let listener = TcpListener::bind(addr).await.expect("rebind mock server");
        Self::run(listener)
    }

    fn run(listener: TcpListener) -> Self {
        let addr = listener.local_addr().expect("local addr");
        let accepted = Arc::new(AtomicUsize::new(0));
        let received: Arc<Mutex<Vec<serde_json::Value>>> = Arc::new(Mutex::new(Vec::new()));
        let conns: Arc<Mutex<Vec<mpsc::UnboundedSender<ConnCommand>>>> =
            Arc::new(Mutex::new(Vec::new()));

        let accept_task = tokio::spawn({
            let accepted = accepted.clone();
            let received = received.clone();
            let conns = conns.clone();
            async move {
                loop {
                    let Ok((stream, _)) = listener.accept().await else {
                        return;
                    };
                    accepted.fetch_add(1, Ordering::SeqCst);
                    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
                    conns.lock().unwrap().push(cmd_tx);
                    tokio::spawn(serve_connection(stream, cmd_rx, received.clone()));
                }
            }
        });

        Self {
            addr,
            accepted,
            received,
            conns,
            accept_task,
        }
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Connections accepted so far.
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    /// All recorded inbound messages, across connections, in arrival order.
    pub fn received(&self) -> Vec<serde_json::Value> {
        self.received.lock().unwrap().clone()
    }

    /// Count recorded messages matching a predicate.
    pub fn count_received(&self, pred: impl Fn(&serde_json::Value) -> bool) -> usize {
        self.received().iter().filter(|m| pred(m)).count()
    }

    /// Push a text frame to every live connection.
    pub fn send_text(&self, text: &str) {
        for conn in self.conns.lock().unwrap().iter() {
            let _ = conn.send(ConnCommand::SendText(text.to_string()));
        }
    }

    /// Close every live connection (simulates a remote drop).
    pub fn close_connections(&self) {
        let mut conns = self.conns.lock().unwrap();
        for conn in conns.drain(..) {
            let _ = conn.send(ConnCommand::Close);
        }
    }

    /// Stop accepting new connections; the listener is dropped.
    pub fn stop_accepting(&self) {
        self.accept_task.abort();
    }

    /// Poll until at least `n` connections were accepted or the timeout
    /// elapses.
    pub async fn wait_for_connections(&self, n: usize, timeout: Duration) -> bool {
        wait_until(timeout, || self.accepted() >= n).await
    }

    /// Poll until a recorded message matches or the timeout elapses.
    pub async fn wait_for_message(
        &self,
        pred: impl Fn(&serde_json::Value) -> bool,
        timeout: Duration,
    ) -> bool {
        wait_until(timeout, || self.received().iter().any(&pred)).await
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

/// Poll a condition every 10ms until it holds or the timeout elapses.
pub async fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if cond() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn serve_connection(
    stream: TcpStream,
    mut cmd_rx: mpsc::UnboundedReceiver<ConnCommand>,
    received: Arc<Mutex<Vec<serde_json::Value>>>,
) {
    let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
        return;
    };

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(ConnCommand::SendText(text)) => {
                    if ws.send(Message::Text(text.into())).await.is_err() {
                        return;
                    }
                }
                Some(ConnCommand::Close) | None => {
                    let _ = ws.close(None).await;
                    return;
                }
            },
            frame = ws.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Ok(value) = serde_json::from_str(text.as_str()) {
                        received.lock().unwrap().push(value);
                    }
                }
                Some(Ok(Message::Ping(payload))) => {
                    let _ = ws.send(Message::Pong(payload)).await;
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                Some(Ok(_)) => {}
            },
        }
    }
}

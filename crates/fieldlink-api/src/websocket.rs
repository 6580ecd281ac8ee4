//! Duplex WebSocket transport with unconditional auto-reconnect.
//!
//! Owns one logical connection to the field controller. Inbound text frames
//! are run through the [`codec`](crate::codec) and decoded envelopes are
//! forwarded, in arrival order, on an `mpsc` channel. Outbound commands are
//! accepted at any time: while offline they wait in a FIFO queue that is
//! flushed, in order, as soon as the next connection opens.
//!
//! There is no retry ceiling. The controller is a single always-present LAN
//! peer, so every failure degrades to `Disconnected` and another attempt
//! after a fixed delay. The only terminal state is [`Transport::shutdown`].
//!
//! # Example
//!
//! ```rust,ignore
//! use fieldlink_api::{OutboundMessage, Transport, TransportConfig};
//! use tokio::sync::mpsc;
//! use tokio_util::sync::CancellationToken;
//!
//! let (inbound_tx, mut inbound_rx) = mpsc::unbounded_channel();
//! let config = TransportConfig::new("ws://10.59.87.50:5805".parse()?);
//! let (transport, _task) = Transport::spawn(config, inbound_tx, CancellationToken::new());
//!
//! transport.connect();
//! transport.send(OutboundMessage::MatchStart)?;
//!
//! while let Some(envelope) = inbound_rx.recv().await {
//!     println!("{}", envelope.kind());
//! }
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::{Notify, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::codec::{self, Envelope};
use crate::error::Error;
use crate::protocol::OutboundMessage;

// ── ConnectionState ──────────────────────────────────────────────────

/// Link state, owned and set by the transport only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

// ── Configuration ────────────────────────────────────────────────────

/// Fixed-delay reconnection policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectConfig {
    /// Pause between a disconnect and the next attempt. Default: 1s.
    pub delay: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1000),
        }
    }
}

/// Default deadline for the TCP + WebSocket handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything the transport needs to reach the controller.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub url: Url,
    pub reconnect: ReconnectConfig,
    /// A dial that has not completed the upgrade by then counts as failed.
    pub connect_timeout: Duration,
}

impl TransportConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            reconnect: ReconnectConfig::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

// ── Transport handle ─────────────────────────────────────────────────

/// Handle to the background connection task.
///
/// Every method returns immediately; the socket is only ever touched by the
/// task spawned in [`spawn`](Self::spawn).
pub struct Transport {
    outbound_tx: mpsc::UnboundedSender<OutboundMessage>,
    connect_requested: Arc<Notify>,
    state: watch::Receiver<ConnectionState>,
    outstanding: Arc<watch::Sender<usize>>,
    cancel: CancellationToken,
}

impl Transport {
    /// Spawn the connection task in the `Disconnected` state.
    ///
    /// Nothing is dialled until [`connect`](Self::connect) is called or the
    /// first command is sent. Decoded envelopes are delivered to `inbound_tx`.
    /// Cancelling `cancel` is equivalent to [`shutdown`](Self::shutdown).
    pub fn spawn(
        config: TransportConfig,
        inbound_tx: mpsc::UnboundedSender<Envelope>,
        cancel: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (outstanding, _) = watch::channel(0usize);
        let outstanding = Arc::new(outstanding);
        let connect_requested = Arc::new(Notify::new());

        let task = ConnectionTask {
            config,
            outbound_rx,
            inbound_tx,
            state_tx,
            outstanding: Arc::clone(&outstanding),
            connect_requested: Arc::clone(&connect_requested),
            cancel: cancel.clone(),
            pending: VecDeque::new(),
        };
        let handle = tokio::spawn(task.run());

        let transport = Self {
            outbound_tx,
            connect_requested,
            state: state_rx,
            outstanding,
            cancel,
        };
        (transport, handle)
    }

    /// Ask the task to dial now. No-op unless currently `Disconnected`.
    ///
    /// Also cuts a pending reconnect delay short.
    pub fn connect(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        if *self.state.borrow() == ConnectionState::Disconnected {
            self.connect_requested.notify_one();
        }
    }

    /// Queue a command for delivery.
    ///
    /// Transmitted immediately when connected; otherwise held in FIFO order
    /// and a connection attempt is triggered. Fails only after teardown.
    pub fn send(&self, message: OutboundMessage) -> Result<(), Error> {
        if self.cancel.is_cancelled() {
            return Err(Error::Shutdown);
        }

        self.outstanding.send_modify(|n| *n += 1);
        if self.outbound_tx.send(message).is_err() {
            self.outstanding.send_modify(|n| *n = n.saturating_sub(1));
            return Err(Error::Shutdown);
        }
        Ok(())
    }

    /// Subscribe to connection state transitions.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Number of accepted commands not yet written to a live socket.
    pub fn outstanding(&self) -> usize {
        *self.outstanding.borrow()
    }

    /// Resolve once every accepted command has been written (or the
    /// transport has been torn down and the queue discarded).
    pub async fn drained(&self) {
        let mut rx = self.outstanding.subscribe();
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    /// Cancel any pending reconnect and close the live socket.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

// ── Background connection task ───────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum Wake {
    Connect,
    Shutdown,
}

#[derive(Debug)]
enum Disconnect {
    /// Peer closed or the stream ended.
    Closed,
    /// Teardown was requested.
    Shutdown,
}

struct ConnectionTask {
    config: TransportConfig,
    outbound_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    inbound_tx: mpsc::UnboundedSender<Envelope>,
    state_tx: watch::Sender<ConnectionState>,
    outstanding: Arc<watch::Sender<usize>>,
    connect_requested: Arc<Notify>,
    cancel: CancellationToken,
    /// Commands pulled off the channel while offline, oldest first.
    pending: VecDeque<OutboundMessage>,
}

impl ConnectionTask {
    /// Main loop: idle → connect → read/write → on drop, wait → reconnect.
    async fn run(mut self) {
        if self.wait_for_wake(None).await == Wake::Connect {
            loop {
                self.set_state(ConnectionState::Connecting);

                match self.connect_and_run().await {
                    Ok(Disconnect::Shutdown) => break,
                    Ok(Disconnect::Closed) => {
                        tracing::info!("Controller connection closed");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Controller connection failed");
                    }
                }

                self.set_state(ConnectionState::Disconnected);

                let delay = self.config.reconnect.delay;
                tracing::info!(
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    queued = self.pending.len(),
                    "Waiting before reconnect"
                );

                if self.wait_for_wake(Some(delay)).await == Wake::Shutdown {
                    break;
                }
            }
        }

        self.set_state(ConnectionState::Disconnected);
        if !self.pending.is_empty() {
            tracing::debug!(dropped = self.pending.len(), "Discarding queued commands on shutdown");
        }
        self.pending.clear();
        self.outstanding.send_replace(0);
        tracing::debug!("Transport loop exiting");
    }

    /// Park until there is a reason to dial: an explicit connect request, an
    /// outbound command, or the reconnect delay elapsing (`None` waits forever).
    async fn wait_for_wake(&mut self, delay: Option<Duration>) -> Wake {
        let sleep = async move {
            match delay {
                Some(d) => tokio::time::sleep(d).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Wake::Shutdown,
            () = self.connect_requested.notified() => Wake::Connect,
            message = self.outbound_rx.recv() => match message {
                Some(message) => {
                    tracing::debug!(kind = message.kind(), "Command queued while offline");
                    self.pending.push_back(message);
                    Wake::Connect
                }
                None => Wake::Shutdown,
            },
            () = sleep => Wake::Connect,
        }
    }

    /// Establish a single connection, flush the offline queue, then pump
    /// frames both ways until the connection drops.
    async fn connect_and_run(&mut self) -> Result<Disconnect, Error> {
        let url = self.config.url.clone();
        let connect_timeout = self.config.connect_timeout;
        tracing::info!(url = %url, "Connecting to controller");

        let dial = tokio::time::timeout(connect_timeout, tokio_tungstenite::connect_async(url.as_str()));
        let (ws_stream, _response) = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Ok(Disconnect::Shutdown),
            result = dial => match result {
                Ok(connected) => connected.map_err(|e| Error::WebSocketConnect(e.to_string()))?,
                Err(_) => {
                    return Err(Error::WebSocketConnect(format!(
                        "handshake not completed within {}ms",
                        connect_timeout.as_millis()
                    )));
                }
            },
        };

        self.set_state(ConnectionState::Connected);
        tracing::info!("Controller connected");

        let (mut write, mut read) = ws_stream.split();

        // Everything queued while offline goes out before any new send.
        while let Some(message) = self.pending.pop_front() {
            if let Err(e) = transmit(&mut write, &message, &self.outstanding).await {
                self.pending.push_front(message);
                return Err(e);
            }
        }

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(Disconnect::Shutdown);
                }
                message = self.outbound_rx.recv() => {
                    let Some(message) = message else {
                        let _ = write.send(Message::Close(None)).await;
                        return Ok(Disconnect::Shutdown);
                    };
                    if let Err(e) = transmit(&mut write, &message, &self.outstanding).await {
                        self.pending.push_front(message);
                        return Err(e);
                    }
                }
                frame = read.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            let Some(envelope) = codec::decode(&text) else {
                                continue;
                            };
                            if self.inbound_tx.send(envelope).is_err() {
                                // Nobody is consuming state any more.
                                let _ = write.send(Message::Close(None)).await;
                                return Ok(Disconnect::Shutdown);
                            }
                        }
                        Some(Ok(Message::Ping(_))) => {
                            // tungstenite queues the pong itself
                            tracing::trace!("WebSocket ping");
                        }
                        Some(Ok(Message::Close(frame))) => {
                            if let Some(ref cf) = frame {
                                tracing::info!(
                                    code = %cf.code,
                                    reason = %cf.reason,
                                    "WebSocket close frame received"
                                );
                            } else {
                                tracing::info!("WebSocket close frame received (no payload)");
                            }
                            return Ok(Disconnect::Closed);
                        }
                        Some(Err(e)) => {
                            return Err(Error::WebSocketConnect(e.to_string()));
                        }
                        None => {
                            tracing::info!("WebSocket stream ended");
                            return Ok(Disconnect::Closed);
                        }
                        Some(Ok(_)) => {
                            // Binary, Pong, Frame -- ignore
                        }
                    }
                }
            }
        }
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = self.state_tx.send_replace(state);
        if previous != state {
            tracing::debug!(from = previous.as_str(), to = state.as_str(), "Connection state");
        }
    }
}

/// Write one command to the socket.
///
/// Only socket failures are returned; a command that cannot be encoded is
/// logged and dropped so it cannot wedge the queue.
async fn transmit<S>(
    sink: &mut S,
    message: &OutboundMessage,
    outstanding: &watch::Sender<usize>,
) -> Result<(), Error>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    match codec::encode(message) {
        Ok(text) => {
            sink.send(Message::text(text))
                .await
                .map_err(|e| Error::WebSocketConnect(e.to_string()))?;
            tracing::debug!(kind = message.kind(), "Command sent");
        }
        Err(e) => {
            tracing::warn!(error = %e, kind = message.kind(), "Dropping unencodable command");
        }
    }

    outstanding.send_modify(|n| *n = n.saturating_sub(1));
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────

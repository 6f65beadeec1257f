//! Connection manager: one transport link per room.
//!
//! Responsibilities:
//! - Own at most one live link; release the old one before a new dial.
//! - Pump the link: outbound queue -> sink, inbound frames -> decode ->
//!   message stream, pings answered with pongs.
//! - Best-effort send: frames are transmitted only while `Open`, dropped
//!   otherwise (no queueing across a disconnect, no error to the caller).
//! - Idempotent close; the link is released on every exit path, including
//!   drop of the owning handle.

use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use roomlink_core::error::Result;
use roomlink_core::protocol::{decode, Envelope};
use roomlink_core::room::RoomId;

use crate::reconnect::ReconnectPolicy;
use crate::transport::endpoint::Endpoint;
use crate::transport::wire::{Connector, FrameSink, FrameSource, WireFrame};

/// Inbound delivery queue depth; reads apply backpressure past this.
const INBOUND_QUEUE: usize = 64;

/// Connection lifecycle: `Closed -> Connecting -> Open -> Closing -> Closed`.
///
/// There is no reconnecting state of its own: a redialing pump goes back
/// through `Connecting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Closed = 0,
    Connecting = 1,
    Open = 2,
    Closing = 3,
}

impl ConnectionState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Open,
            3 => ConnectionState::Closing,
            _ => ConnectionState::Closed,
        }
    }
}

/// Shared state cell: the owning handle and the pump observe one value.
#[derive(Debug, Default)]
struct StateCell(AtomicU8);

impl StateCell {
    fn set(&self, s: ConnectionState) {
        self.0.store(s as u8, Ordering::Release);
    }

    fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire))
    }
}

/// Inbound message stream for one session.
///
/// Infinite and not restartable: it spans redials of the same room (when a
/// reconnect policy is installed) and ends only when the link is gone for
/// good. Frames arrive in transport order; nothing is replayed across a
/// disconnect.
pub struct MessageStream {
    rx: mpsc::Receiver<Envelope>,
}

impl MessageStream {
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.rx.recv().await
    }

    /// Stream that yields nothing; handed out when there is no room to
    /// connect to.
    fn terminated() -> Self {
        let (_tx, rx) = mpsc::channel(1);
        Self { rx }
    }
}

impl Stream for MessageStream {
    type Item = Envelope;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

struct Link {
    out_tx: mpsc::Sender<String>,
    shutdown_tx: watch::Sender<bool>,
    pump: JoinHandle<()>,
}

/// Owns the transport for one room at a time.
pub struct ConnectionManager {
    connector: Arc<dyn Connector>,
    policy: Arc<dyn ReconnectPolicy>,
    endpoint: Endpoint,
    auth_token: Option<String>,
    outbound_queue: usize,
    state: Arc<StateCell>,
    link: Option<Link>,
    room: Option<RoomId>,
}

impl ConnectionManager {
    pub fn new(
        connector: Arc<dyn Connector>,
        policy: Arc<dyn ReconnectPolicy>,
        endpoint: Endpoint,
        auth_token: Option<String>,
        outbound_queue: usize,
    ) -> Self {
        Self {
            connector,
            policy,
            endpoint,
            auth_token,
            outbound_queue,
            state: Arc::new(StateCell::default()),
            link: None,
            room: None,
        }
    }

    /// Dial `room` and start pumping its link.
    ///
    /// Any previously held link is released first. An empty room id is a
    /// caller-contract no-op: nothing is dialed and the returned stream is
    /// already terminated. A dial failure leaves the state `Closed` with no
    /// automatic retry of the initial connect.
    pub async fn open(&mut self, room: &RoomId) -> Result<MessageStream> {
        self.close().await;

        if room.is_empty() {
            tracing::warn!("open called with empty room id; nothing to dial");
            return Ok(MessageStream::terminated());
        }

        let url = self.endpoint.room_url(room);
        self.state.set(ConnectionState::Connecting);

        let (sink, source) = match self.connector.connect(&url, self.auth_token.as_deref()).await {
            Ok(halves) => halves,
            Err(e) => {
                self.state.set(ConnectionState::Closed);
                return Err(e);
            }
        };

        self.state.set(ConnectionState::Open);

        let (out_tx, out_rx) = mpsc::channel(self.outbound_queue);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (env_tx, env_rx) = mpsc::channel(INBOUND_QUEUE);

        let ctx = PumpCtx {
            connector: Arc::clone(&self.connector),
            policy: Arc::clone(&self.policy),
            url,
            auth_token: self.auth_token.clone(),
            state: Arc::clone(&self.state),
        };
        let pump = tokio::spawn(pump(ctx, sink, source, out_rx, env_tx, shutdown_rx));

        tracing::info!(room = %room, "chat transport open");
        self.room = Some(room.clone());
        self.link = Some(Link {
            out_tx,
            shutdown_tx,
            pump,
        });

        Ok(MessageStream { rx: env_rx })
    }

    /// Queue one already-encoded frame for transmission.
    ///
    /// Transmits only while `Open`; otherwise the frame is silently dropped.
    /// Best-effort contract: the UI disables the composer while down, the
    /// core does not enforce it.
    pub fn send(&self, frame: String) {
        if self.state.get() != ConnectionState::Open {
            tracing::debug!("send while not open; frame dropped");
            return;
        }
        if let Some(link) = &self.link {
            if link.out_tx.try_send(frame).is_err() {
                tracing::debug!("outbound queue unavailable; frame dropped");
            }
        }
    }

    /// Release the link. Idempotent: closing an already-closed manager is a
    /// no-op.
    pub async fn close(&mut self) {
        let Some(link) = self.link.take() else {
            return;
        };
        self.state.set(ConnectionState::Closing);
        let _ = link.shutdown_tx.send(true);
        let _ = link.pump.await;
        self.state.set(ConnectionState::Closed);
        self.room = None;
    }

    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    pub fn room(&self) -> Option<&RoomId> {
        self.room.as_ref()
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        // Release on every exit path: aborting the pump drops the socket
        // halves even when close() was never awaited.
        if let Some(link) = self.link.take() {
            let _ = link.shutdown_tx.send(true);
            link.pump.abort();
            self.state.set(ConnectionState::Closed);
        }
    }
}

struct PumpCtx {
    connector: Arc<dyn Connector>,
    policy: Arc<dyn ReconnectPolicy>,
    url: String,
    auth_token: Option<String>,
    state: Arc<StateCell>,
}

/// Services one link until shutdown or unrecoverable transport loss.
///
/// One select loop per link, in the order: shutdown signal, outbound queue,
/// inbound frames. Malformed inbound text is fatal to the frame only. After
/// an unexpected loss the reconnect policy decides between staying down
/// (the default) and redialing onto the same message stream.
async fn pump(
    ctx: PumpCtx,
    mut sink: Box<dyn FrameSink>,
    mut source: Box<dyn FrameSource>,
    mut out_rx: mpsc::Receiver<String>,
    env_tx: mpsc::Sender<Envelope>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut attempt: u32 = 0;

    'link: loop {
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    let _ = sink.close().await;
                    ctx.state.set(ConnectionState::Closed);
                    return;
                }

                maybe_out = out_rx.recv() => {
                    match maybe_out {
                        Some(text) => {
                            if sink.send(WireFrame::Text(text)).await.is_err() {
                                break;
                            }
                        }
                        // All senders gone: the owning handle is gone.
                        None => {
                            let _ = sink.close().await;
                            ctx.state.set(ConnectionState::Closed);
                            return;
                        }
                    }
                }

                incoming = source.next() => {
                    match incoming {
                        Some(Ok(WireFrame::Text(payload))) => {
                            match decode(&payload) {
                                Ok(env) => {
                                    tokio::select! {
                                        res = env_tx.send(env) => {
                                            if res.is_err() {
                                                // Consumer dropped the stream.
                                                let _ = sink.close().await;
                                                ctx.state.set(ConnectionState::Closed);
                                                return;
                                            }
                                        }
                                        _ = shutdown_rx.changed() => {
                                            let _ = sink.close().await;
                                            ctx.state.set(ConnectionState::Closed);
                                            return;
                                        }
                                    }
                                }
                                Err(e) => tracing::warn!(error = %e, "dropping malformed frame"),
                            }
                        }
                        Some(Ok(WireFrame::Ping(payload))) => {
                            if sink.send(WireFrame::Pong(payload)).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(WireFrame::Pong(_))) => {}
                        Some(Ok(WireFrame::Close)) | None => break,
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "transport error");
                            break;
                        }
                    }
                }
            }
        }

        // Unexpected transport loss. The default policy keeps the session
        // down until the caller re-opens; an installed policy may redial.
        ctx.state.set(ConnectionState::Closed);
        loop {
            attempt += 1;
            let Some(delay) = ctx.policy.next_delay(attempt) else {
                tracing::info!("chat transport closed; staying down");
                return;
            };

            ctx.state.set(ConnectionState::Connecting);
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    ctx.state.set(ConnectionState::Closed);
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            match ctx.connector.connect(&ctx.url, ctx.auth_token.as_deref()).await {
                Ok((s, r)) => {
                    sink = s;
                    source = r;
                    attempt = 0;
                    ctx.state.set(ConnectionState::Open);
                    tracing::info!("chat transport reopened");
                    continue 'link;
                }
                Err(e) => {
                    tracing::warn!(error = %e, attempt, "redial failed");
                    ctx.state.set(ConnectionState::Closed);
                }
            }
        }
    }
}

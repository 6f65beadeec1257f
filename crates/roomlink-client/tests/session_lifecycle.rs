//! Session lifecycle over a scripted in-memory transport: room switching,
//! idempotent close, best-effort send, malformed-frame tolerance, and the
//! reconnect seam.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tokio::time::timeout;

use roomlink_client::config::{self, ChatConfig};
use roomlink_client::reconnect::{NoReconnect, ReconnectPolicy};
use roomlink_client::session::ChatSession;
use roomlink_client::transport::conn::ConnectionState;
use roomlink_client::transport::wire::{Connector, FrameSink, FrameSource, WireFrame};
use roomlink_core::error::{Result, RoomlinkError};
use roomlink_core::protocol::{decode, encode, Envelope};

const WAIT: Duration = Duration::from_secs(5);

fn test_config() -> ChatConfig {
    config::load_from_str(
        r#"
version: 1
endpoint:
  base_url: "chat.test"
  page_secure: false
"#,
    )
    .unwrap()
}

/// Handles the test keeps for one scripted link.
struct LinkHandles {
    url: String,
    sent_rx: mpsc::UnboundedReceiver<WireFrame>,
    inject_tx: mpsc::UnboundedSender<Result<WireFrame>>,
}

/// In-memory connector: counts dials, tracks live sinks, and records the
/// handles for every link it hands out.
#[derive(Default)]
struct FakeConnector {
    dials: AtomicUsize,
    alive: Arc<AtomicUsize>,
    links: Mutex<Vec<LinkHandles>>,
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(
        &self,
        url: &str,
        _auth_token: Option<&str>,
    ) -> Result<(Box<dyn FrameSink>, Box<dyn FrameSource>)> {
        self.dials.fetch_add(1, Ordering::SeqCst);
        self.alive.fetch_add(1, Ordering::SeqCst);

        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        let (inject_tx, inject_rx) = mpsc::unbounded_channel();
        self.links.lock().await.push(LinkHandles {
            url: url.to_string(),
            sent_rx,
            inject_tx,
        });

        Ok((
            Box::new(FakeSink {
                sent: sent_tx,
                alive: Arc::clone(&self.alive),
            }),
            Box::new(FakeSource { rx: inject_rx }),
        ))
    }
}

struct FakeSink {
    sent: mpsc::UnboundedSender<WireFrame>,
    alive: Arc<AtomicUsize>,
}

#[async_trait]
impl FrameSink for FakeSink {
    async fn send(&mut self, frame: WireFrame) -> Result<()> {
        self.sent
            .send(frame)
            .map_err(|_| RoomlinkError::Transport("peer gone".into()))
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Drop for FakeSink {
    fn drop(&mut self) {
        self.alive.fetch_sub(1, Ordering::SeqCst);
    }
}

struct FakeSource {
    rx: mpsc::UnboundedReceiver<Result<WireFrame>>,
}

#[async_trait]
impl FrameSource for FakeSource {
    async fn next(&mut self) -> Option<Result<WireFrame>> {
        self.rx.recv().await
    }
}

fn session_with(
    connector: &Arc<FakeConnector>,
    policy: Arc<dyn ReconnectPolicy>,
) -> ChatSession {
    let connector: Arc<dyn Connector> = Arc::clone(connector) as Arc<dyn Connector>;
    ChatSession::with_connector(&test_config(), connector, policy)
}

#[tokio::test]
async fn close_is_idempotent() {
    let connector = Arc::new(FakeConnector::default());
    let mut session = session_with(&connector, Arc::new(NoReconnect));

    session.start("room-A").await.unwrap();
    assert_eq!(session.state(), ConnectionState::Open);

    session.close().await;
    assert_eq!(session.state(), ConnectionState::Closed);
    assert_eq!(connector.alive.load(Ordering::SeqCst), 0);

    session.close().await;
    assert_eq!(session.state(), ConnectionState::Closed);
}

#[tokio::test]
async fn room_switch_leaves_exactly_one_connection() {
    let connector = Arc::new(FakeConnector::default());
    let mut session = session_with(&connector, Arc::new(NoReconnect));

    session.start("room-A").await.unwrap();
    session.start("room-B").await.unwrap();

    assert_eq!(connector.dials.load(Ordering::SeqCst), 2);
    assert_eq!(connector.alive.load(Ordering::SeqCst), 1);
    assert_eq!(session.room().map(|r| r.as_str()), Some("room-B"));

    {
        let links = connector.links.lock().await;
        assert_eq!(links[0].url, "ws://chat.test/chat?roomId=room-A");
        assert_eq!(links[1].url, "ws://chat.test/chat?roomId=room-B");
    }

    // The live link is room-B's: a send lands there.
    session.send("hello b");
    let mut links = connector.links.lock().await;
    let frame = timeout(WAIT, links[1].sent_rx.recv()).await.unwrap().unwrap();
    match frame {
        WireFrame::Text(t) => assert_eq!(decode(&t).unwrap().content, "hello b"),
        other => panic!("expected text frame, got {other:?}"),
    }
}

#[tokio::test]
async fn send_while_closed_reaches_no_transport() {
    let connector = Arc::new(FakeConnector::default());
    let mut session = session_with(&connector, Arc::new(NoReconnect));

    // Before any start: nothing to reach, nothing to panic.
    session.send("too early");

    session.start("room-A").await.unwrap();
    session.close().await;

    session.send("hello");
    tokio::task::yield_now().await;

    let mut links = connector.links.lock().await;
    assert!(links[0].sent_rx.try_recv().is_err());
}

#[tokio::test]
async fn sent_frames_carry_the_envelope_shape() {
    let connector = Arc::new(FakeConnector::default());
    let mut session = session_with(&connector, Arc::new(NoReconnect));
    session.start("room-A").await.unwrap();

    session.send("plain");
    session.send_with_event("delivered", "SYSTEM");

    let mut links = connector.links.lock().await;
    let first = timeout(WAIT, links[0].sent_rx.recv()).await.unwrap().unwrap();
    let second = timeout(WAIT, links[0].sent_rx.recv()).await.unwrap().unwrap();

    let WireFrame::Text(first) = first else {
        panic!("expected text frame");
    };
    let WireFrame::Text(second) = second else {
        panic!("expected text frame");
    };
    assert_eq!(decode(&first).unwrap(), Envelope::new("plain"));
    assert_eq!(
        decode(&second).unwrap(),
        Envelope::with_event_type("delivered", "SYSTEM")
    );
}

#[tokio::test]
async fn malformed_frame_is_dropped_without_closing() {
    let connector = Arc::new(FakeConnector::default());
    let mut session = session_with(&connector, Arc::new(NoReconnect));
    session.start("room-A").await.unwrap();

    let inject = connector.links.lock().await[0].inject_tx.clone();
    inject
        .send(Ok(WireFrame::Text("not json at all".into())))
        .unwrap();
    inject
        .send(Ok(WireFrame::Text(
            encode(&Envelope::new("still here")).unwrap(),
        )))
        .unwrap();

    // The malformed frame never surfaces; the next valid one does.
    let msg = timeout(WAIT, session.recv()).await.unwrap().unwrap();
    assert_eq!(msg.content, "still here");
    assert_eq!(session.state(), ConnectionState::Open);
}

#[tokio::test]
async fn pings_are_answered_with_pongs() {
    let connector = Arc::new(FakeConnector::default());
    let mut session = session_with(&connector, Arc::new(NoReconnect));
    session.start("room-A").await.unwrap();

    let inject = connector.links.lock().await[0].inject_tx.clone();
    inject.send(Ok(WireFrame::Ping(vec![1, 2, 3]))).unwrap();

    let mut links = connector.links.lock().await;
    let frame = timeout(WAIT, links[0].sent_rx.recv()).await.unwrap().unwrap();
    assert_eq!(frame, WireFrame::Pong(vec![1, 2, 3]));
}

#[tokio::test]
async fn empty_room_id_is_a_no_op() {
    let connector = Arc::new(FakeConnector::default());
    let mut session = session_with(&connector, Arc::new(NoReconnect));

    session.start("").await.unwrap();

    assert_eq!(connector.dials.load(Ordering::SeqCst), 0);
    assert_eq!(session.state(), ConnectionState::Closed);
    assert_eq!(session.recv().await, None);
}

#[tokio::test]
async fn transport_loss_leaves_session_closed_until_reopened() {
    let connector = Arc::new(FakeConnector::default());
    let mut session = session_with(&connector, Arc::new(NoReconnect));
    session.start("room-A").await.unwrap();

    let inject = connector.links.lock().await[0].inject_tx.clone();
    inject.send(Ok(WireFrame::Close)).unwrap();

    // The stream ends; no redial happens with the default policy.
    assert_eq!(timeout(WAIT, session.recv()).await.unwrap(), None);
    assert_eq!(session.state(), ConnectionState::Closed);
    assert_eq!(connector.dials.load(Ordering::SeqCst), 1);

    // Re-selecting the room recovers.
    session.start("room-A").await.unwrap();
    assert_eq!(session.state(), ConnectionState::Open);
    assert_eq!(connector.dials.load(Ordering::SeqCst), 2);
}

/// Policy used to exercise the reconnect seam: redial immediately.
struct ImmediateRetry;

impl ReconnectPolicy for ImmediateRetry {
    fn next_delay(&self, _attempt: u32) -> Option<Duration> {
        Some(Duration::ZERO)
    }
}

#[tokio::test]
async fn installed_policy_redials_onto_the_same_stream() {
    let connector = Arc::new(FakeConnector::default());
    let mut session = session_with(&connector, Arc::new(ImmediateRetry));
    session.start("room-A").await.unwrap();

    let inject = connector.links.lock().await[0].inject_tx.clone();
    inject.send(Ok(WireFrame::Close)).unwrap();

    // Wait for the redial to land.
    let deadline = tokio::time::Instant::now() + WAIT;
    loop {
        if connector.links.lock().await.len() == 2 {
            break;
        }
        assert!(tokio::time::Instant::now() < deadline, "redial never happened");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let inject = connector.links.lock().await[1].inject_tx.clone();
    inject
        .send(Ok(WireFrame::Text(
            encode(&Envelope::new("after redial")).unwrap(),
        )))
        .unwrap();

    // Delivery resumes on the original stream.
    let msg = timeout(WAIT, session.recv()).await.unwrap().unwrap();
    assert_eq!(msg.content, "after redial");
    assert_eq!(session.state(), ConnectionState::Open);
}

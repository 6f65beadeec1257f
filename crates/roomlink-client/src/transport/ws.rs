//! WebSocket connector over tokio-tungstenite.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use roomlink_core::error::{Result, RoomlinkError};

use super::wire::{Connector, FrameSink, FrameSource, WireFrame};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Production connector: dials the endpoint, carries the bearer credential
/// on the upgrade request (the handshake's own auth channel, never the
/// message envelope), and splits the socket into the two pump halves.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    async fn connect(
        &self,
        url: &str,
        auth_token: Option<&str>,
    ) -> Result<(Box<dyn FrameSink>, Box<dyn FrameSource>)> {
        let mut request = url
            .into_client_request()
            .map_err(|e| RoomlinkError::ConnectFailed(format!("bad endpoint url: {e}")))?;

        if let Some(token) = auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| RoomlinkError::ConnectFailed(format!("bad auth token: {e}")))?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        let (ws, _response) = connect_async(request)
            .await
            .map_err(|e| RoomlinkError::ConnectFailed(e.to_string()))?;

        let (tx, rx) = ws.split();
        Ok((Box::new(WsSink { tx }), Box::new(WsSource { rx })))
    }
}

struct WsSink {
    tx: SplitSink<WsStream, Message>,
}

#[async_trait]
impl FrameSink for WsSink {
    async fn send(&mut self, frame: WireFrame) -> Result<()> {
        let msg = match frame {
            WireFrame::Text(s) => Message::text(s),
            WireFrame::Ping(p) => Message::Ping(p.into()),
            WireFrame::Pong(p) => Message::Pong(p.into()),
            WireFrame::Close => Message::Close(None),
        };
        self.tx
            .send(msg)
            .await
            .map_err(|e| RoomlinkError::Transport(e.to_string()))
    }

    async fn close(&mut self) -> Result<()> {
        self.tx
            .close()
            .await
            .map_err(|e| RoomlinkError::Transport(e.to_string()))
    }
}

struct WsSource {
    rx: SplitStream<WsStream>,
}

#[async_trait]
impl FrameSource for WsSource {
    async fn next(&mut self) -> Option<Result<WireFrame>> {
        loop {
            match self.rx.next().await? {
                Ok(Message::Text(t)) => return Some(Ok(WireFrame::Text(t.as_str().to_owned()))),
                Ok(Message::Ping(p)) => return Some(Ok(WireFrame::Ping(p.to_vec()))),
                Ok(Message::Pong(p)) => return Some(Ok(WireFrame::Pong(p.to_vec()))),
                Ok(Message::Close(_)) => return Some(Ok(WireFrame::Close)),
                // Text-only protocol: binary and raw frames are outside the contract.
                Ok(Message::Binary(_)) | Ok(Message::Frame(_)) => continue,
                Err(e) => return Some(Err(RoomlinkError::Transport(e.to_string()))),
            }
        }
    }
}

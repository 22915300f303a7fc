//! WebSocket game client
//!
//! A connection-lifecycle wrapper used by tools and integration tests
//! to talk to the server the same way the browser client does: connect,
//! send typed events, read typed events, disconnect.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::error::{AventuraError, NetworkError, ProtocolError, Result};
use crate::protocol::events::{ClientEvent, ServerEvent};

/// Client side of one game connection
pub struct GameClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl GameClient {
    /// Connect to a server at the given websocket URL
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws, _response) = connect_async(url)
            .await
            .map_err(|e| AventuraError::Network(NetworkError::WebSocket(e.to_string())))?;
        debug!(url, "Connected to server");
        Ok(Self { ws })
    }

    /// Send one client event
    pub async fn send(&mut self, event: &ClientEvent) -> Result<()> {
        let frame = event.encode()?;
        self.ws
            .send(Message::Text(frame))
            .await
            .map_err(NetworkError::from)?;
        Ok(())
    }

    /// Wait for the next server event.
    ///
    /// Returns `None` once the server closes the connection. Control
    /// frames are skipped; a binary frame is a protocol error.
    pub async fn next_event(&mut self) -> Result<Option<ServerEvent>> {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(ServerEvent::parse(&text)?));
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => return Err(ProtocolError::UnsupportedFrame.into()),
                Some(Err(e)) => return Err(NetworkError::from(e).into()),
            }
        }
    }

    /// Close the connection
    pub async fn disconnect(mut self) -> Result<()> {
        self.ws.close(None).await.map_err(NetworkError::from)?;
        Ok(())
    }
}

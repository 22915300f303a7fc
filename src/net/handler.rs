//! Connection handler module
//!
//! Handles the lifecycle of client connections including:
//! - WebSocket accept and session creation
//! - Inbound event parsing and dispatch to the world coordinator
//! - Outbound event delivery from the session's channel
//! - Guaranteed leave cleanup on disconnect
//!
//! One bad frame never takes down a connection, and one connection
//! never takes down the server. All outbound traffic for a session
//! flows through its single channel, so delivered events reach the
//! socket in the order they were produced. The channel is only ever
//! drained by the connection task itself, so nothing — including the
//! task's own self-directed events — may block on a full channel;
//! frames that do not fit are dropped.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::{debug, error, info, warn};

use crate::error::{AventuraError, NetworkError, ProtocolError, Result};
use crate::game::player::Player;
use crate::game::world::MoveOutcome;
use crate::net::session::{Session, SessionId, SessionState};
use crate::protocol::events::{ClientEvent, InteractionData, MoveData, ServerEvent};
use crate::state::AppState;

/// Accept websocket connections until shutdown is signalled, spawning
/// one task per connection
pub async fn accept_connections(
    listener: TcpListener,
    state: Arc<AppState>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, addr)) => {
                        let handler = ConnectionHandler::new(state.clone());
                        let mut shutdown = state.shutdown_tx.subscribe();
                        tokio::spawn(async move {
                            if let Err(e) = handler.handle(stream, addr, &mut shutdown).await {
                                debug!(address = %addr, error = %e, "Connection ended with error");
                            }
                        });
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to accept connection");
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                info!("Stopping connection accept loop");
                break;
            }
        }
    }
}

/// Connection handler for one websocket client
pub struct ConnectionHandler {
    /// Shared application state
    state: Arc<AppState>,
}

impl ConnectionHandler {
    /// Create a new connection handler
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Run one connection to completion.
    ///
    /// Whatever happens inside the session loop, the player is removed
    /// from the world and the departure is announced before returning.
    pub async fn handle(
        &self,
        stream: TcpStream,
        addr: SocketAddr,
        shutdown_rx: &mut broadcast::Receiver<()>,
    ) -> Result<()> {
        stream.set_nodelay(true)?;

        let mut ws = accept_async(stream)
            .await
            .map_err(|e| AventuraError::Network(NetworkError::WebSocket(e.to_string())))?;
        info!(address = %addr, "WebSocket connection established");

        let (session, mut outbound_rx) = match self.state.session_manager.create_session(addr) {
            Ok(pair) => pair,
            Err(e) => {
                let _ = ws.close(None).await;
                return Err(e);
            }
        };
        let session_id = session.id;

        let result = self
            .run_session(&mut ws, &session, &mut outbound_rx, shutdown_rx)
            .await;

        self.cleanup(session_id);

        if let Err(e) = ws.close(None).await {
            debug!(session_id, error = %e, "Error during websocket close");
        }

        result
    }

    /// Pump inbound frames, outbound events and the shutdown signal
    /// until the connection ends
    async fn run_session(
        &self,
        ws: &mut WebSocketStream<TcpStream>,
        session: &Arc<Session>,
        outbound_rx: &mut mpsc::Receiver<String>,
        shutdown_rx: &mut broadcast::Receiver<()>,
    ) -> Result<()> {
        let mut joined = false;

        loop {
            tokio::select! {
                inbound = ws.next() => {
                    match inbound {
                        Some(Ok(Message::Text(text))) => {
                            session.touch();
                            self.dispatch(session, &text, &mut joined)?;
                        }
                        Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                            // Control frames are answered by the websocket
                            // layer itself
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            debug!(session_id = session.id, "Client closed connection");
                            break;
                        }
                        Some(Ok(_)) => {
                            debug!(session_id = session.id, "Ignoring non-text frame");
                        }
                        Some(Err(e)) => {
                            return Err(NetworkError::from(e).into());
                        }
                    }
                }
                outbound = outbound_rx.recv() => {
                    match outbound {
                        Some(frame) => {
                            ws.send(Message::Text(frame))
                                .await
                                .map_err(NetworkError::from)?;
                        }
                        None => {
                            debug!(session_id = session.id, "Outbound channel closed");
                            break;
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    debug!(session_id = session.id, "Shutdown signalled");
                    session.set_state(SessionState::Closing);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Parse one inbound frame and apply it.
    ///
    /// Malformed frames are logged and dropped without disturbing the
    /// session; an oversized frame closes this connection. Before a
    /// join, every other event is dropped; after it, further joins are
    /// dropped.
    fn dispatch(&self, session: &Arc<Session>, text: &str, joined: &mut bool) -> Result<()> {
        let event = match ClientEvent::parse(text) {
            Ok(event) => event,
            Err(e @ ProtocolError::MessageTooLarge { .. }) => {
                warn!(session_id = session.id, error = %e, "Closing connection");
                return Err(e.into());
            }
            Err(e) => {
                debug!(session_id = session.id, error = %e, "Dropping malformed frame");
                return Ok(());
            }
        };

        if !*joined {
            return match event {
                ClientEvent::Join { nickname } => self.handle_join(session, nickname, joined),
                other => {
                    debug!(session_id = session.id, event = ?other, "Dropping pre-join event");
                    Ok(())
                }
            };
        }

        match event {
            ClientEvent::Join { .. } => {
                debug!(session_id = session.id, "Dropping repeated join");
                Ok(())
            }
            ClientEvent::Move(update) => self.handle_move(session, update),
            ClientEvent::Chat(msg) => {
                self.handle_chat(session, msg);
                Ok(())
            }
            ClientEvent::Interact(descriptor) => self.handle_interact(session, &descriptor),
            ClientEvent::EquipItem { item_id, slot } => {
                let updated = self.state.world.equip(session.id, &item_id, slot);
                self.handle_equip_change(session, updated)
            }
            ClientEvent::UnequipItem { slot } => {
                let updated = self.state.world.unequip(session.id, slot);
                self.handle_equip_change(session, updated)
            }
        }
    }

    /// Bring the session into the world and deliver its initial state
    fn handle_join(
        &self,
        session: &Arc<Session>,
        nickname: String,
        joined: &mut bool,
    ) -> Result<()> {
        let data = match self.state.world.join(session.id, nickname) {
            Ok(data) => data,
            Err(e) => {
                error!(session_id = session.id, error = %e, "Join failed");
                return Err(e);
            }
        };
        *joined = true;
        session.set_state(SessionState::Active);

        self.send_self(session, &ServerEvent::CurrentPlayers(data.players))?;
        self.send_self(session, &ServerEvent::CurrentMap(data.map))?;
        self.broadcast_except(session.id, &ServerEvent::NewPlayer(data.player));
        Ok(())
    }

    /// Apply a movement intent and fan out the result
    fn handle_move(&self, session: &Arc<Session>, update: MoveData) -> Result<()> {
        match self.state.world.move_player(session.id, update) {
            MoveOutcome::Accepted { player, transition } => {
                self.broadcast_except(session.id, &ServerEvent::PlayerMoved(player));
                if let Some(map) = transition {
                    self.send_self(session, &ServerEvent::CurrentMap(map))?;
                }
            }
            MoveOutcome::Blocked => {
                debug!(session_id = session.id, "Move rejected by collision");
            }
            MoveOutcome::UnknownPlayer => {}
        }
        Ok(())
    }

    /// Fan a chat line out to everyone, including the sender
    fn handle_chat(&self, session: &Arc<Session>, msg: String) {
        let line = self.state.world.chat(session.id, msg);
        self.broadcast_all(&ServerEvent::Chat(line));
    }

    /// Resolve an interaction and report the outcome to the requester
    fn handle_interact(&self, session: &Arc<Session>, descriptor: &InteractionData) -> Result<()> {
        let outcome = match self.state.world.interact(session.id, descriptor) {
            Some(outcome) => outcome,
            None => return Ok(()),
        };

        if let Some(player) = outcome.moved {
            self.broadcast_except(session.id, &ServerEvent::PlayerMoved(player));
        }
        if let Some(map) = outcome.map {
            self.send_self(session, &ServerEvent::CurrentMap(map))?;
        }
        self.send_self(session, &ServerEvent::InteractionResult(outcome.result))
    }

    /// Deliver the outcome of an equip or unequip, if it changed
    /// anything
    fn handle_equip_change(&self, session: &Arc<Session>, updated: Option<Player>) -> Result<()> {
        let player = match updated {
            Some(player) => player,
            None => return Ok(()),
        };
        self.send_self(session, &ServerEvent::PlayerUpdated(player.clone()))?;
        self.broadcast_except(session.id, &ServerEvent::PlayerMoved(player));
        Ok(())
    }

    /// Remove the session's player from the world, drop the session,
    /// then announce the departure to everyone still connected
    fn cleanup(&self, session_id: SessionId) {
        let player = self.state.world.leave(session_id);
        self.state.session_manager.remove(session_id);
        if player.is_some() {
            self.broadcast_all(&ServerEvent::RemovePlayer(session_id));
        }
    }

    /// Queue an event on the session's own channel.
    ///
    /// The channel is drained by this very task, so queueing must never
    /// wait for capacity: a full channel drops the frame, like any
    /// other slow consumer.
    fn send_self(&self, session: &Arc<Session>, event: &ServerEvent) -> Result<()> {
        let frame = event.encode()?;
        match session.try_send(frame) {
            Ok(()) => Ok(()),
            Err(AventuraError::Network(NetworkError::ChannelFull)) => {
                warn!(session_id = session.id, "Outbound channel full, dropping frame");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn broadcast_all(&self, event: &ServerEvent) {
        match event.encode() {
            Ok(frame) => {
                self.state.session_manager.broadcast_all(&frame);
            }
            Err(e) => warn!(error = %e, "Failed to encode broadcast"),
        }
    }

    fn broadcast_except(&self, exclude: SessionId, event: &ServerEvent) {
        match event.encode() {
            Ok(frame) => {
                self.state.session_manager.broadcast_except(exclude, &frame);
            }
            Err(e) => warn!(error = %e, "Failed to encode broadcast"),
        }
    }
}

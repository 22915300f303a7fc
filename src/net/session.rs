//! Session management module
//!
//! Manages client sessions including:
//! - Session lifecycle (creation, tracking, cleanup)
//! - Session state machine (connected -> active -> closing)
//! - Per-session outbound event channel
//! - Thread-safe session registry with broadcast fan-out

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{AventuraError, NetworkError, Result};

/// Unique session identifier, reused as the player's public identity
pub type SessionId = u64;

/// Session state in the connection lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Transport is up, no join received yet
    Connected,
    /// Joined the world and playing
    Active,
    /// Session is shutting down
    Closing,
}

impl SessionState {
    /// Whether the session is still usable (not closing)
    pub fn is_active(&self) -> bool {
        !matches!(self, SessionState::Closing)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Connected => "connected",
            SessionState::Active => "active",
            SessionState::Closing => "closing",
        };
        f.write_str(name)
    }
}

/// A connected client session
pub struct Session {
    /// Unique session identifier
    pub id: SessionId,
    /// Remote address of the client
    pub address: SocketAddr,
    /// Current session state
    state: RwLock<SessionState>,
    /// Time of session creation
    pub created_at: Instant,
    /// Time of last inbound activity
    last_activity: RwLock<Instant>,
    /// Outbound event channel, drained by the connection task
    outbound_tx: mpsc::Sender<String>,
}

impl Session {
    fn new(id: SessionId, address: SocketAddr, outbound_tx: mpsc::Sender<String>) -> Self {
        let now = Instant::now();
        Self {
            id,
            address,
            state: RwLock::new(SessionState::Connected),
            created_at: now,
            last_activity: RwLock::new(now),
            outbound_tx,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// Advance the lifecycle state
    pub fn set_state(&self, new_state: SessionState) {
        let old_state = std::mem::replace(&mut *self.state.write(), new_state);
        debug!(
            session_id = self.id,
            from = %old_state,
            to = %new_state,
            "Session state changed"
        );
    }

    /// Whether the session is still usable
    pub fn is_active(&self) -> bool {
        self.state().is_active()
    }

    /// Record inbound activity now
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    /// Moment of the most recent inbound activity
    pub fn last_activity(&self) -> Instant {
        *self.last_activity.read()
    }

    /// How long the client has been quiet
    pub fn idle_duration(&self) -> Duration {
        self.last_activity().elapsed()
    }

    /// Queue an outbound frame without blocking.
    ///
    /// The channel is drained by the session's own connection task, so
    /// queueing must never wait for capacity: a full channel reports
    /// `ChannelFull` and the caller drops the frame.
    pub fn try_send(&self, frame: String) -> Result<()> {
        self.outbound_tx.try_send(frame).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => {
                AventuraError::Network(NetworkError::ChannelFull)
            }
            mpsc::error::TrySendError::Closed(_) => {
                AventuraError::Network(NetworkError::ConnectionClosed)
            }
        })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("address", &self.address)
            .field("state", &self.state())
            .field("idle", &self.idle_duration())
            .finish_non_exhaustive()
    }
}

/// Thread-safe session manager
pub struct SessionManager {
    /// Map of session ID to session
    sessions: DashMap<SessionId, Arc<Session>>,
    /// Next session ID to assign
    next_id: AtomicU64,
    /// Maximum concurrent sessions
    max_sessions: usize,
    /// Capacity of each session's outbound channel
    outbound_capacity: usize,
}

impl SessionManager {
    /// Manager that allows up to `max_sessions` concurrent clients,
    /// each with an outbound channel of `outbound_capacity` frames
    pub fn new(max_sessions: usize, outbound_capacity: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            next_id: AtomicU64::new(1),
            max_sessions,
            outbound_capacity,
        }
    }

    /// Create a session and register it, handing back the receiving end
    /// of its outbound channel for the connection task to drain
    pub fn create_session(
        &self,
        address: SocketAddr,
    ) -> Result<(Arc<Session>, mpsc::Receiver<String>)> {
        let current = self.sessions.len();
        if current >= self.max_sessions {
            warn!(
                current = current,
                max = self.max_sessions,
                "Connection rejected, server at capacity"
            );
            return Err(AventuraError::Network(NetworkError::AtCapacity {
                current,
                max: self.max_sessions,
            }));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (outbound_tx, outbound_rx) = mpsc::channel(self.outbound_capacity);
        let session = Arc::new(Session::new(id, address, outbound_tx));
        self.sessions.insert(id, session.clone());

        info!(session_id = id, address = %address, "Session created");
        Ok((session, outbound_rx))
    }

    /// Look up a session by id
    pub fn get(&self, id: SessionId) -> Option<Arc<Session>> {
        self.sessions.get(&id).map(|r| r.clone())
    }

    /// Remove a session. Dropping its channel sender ends the
    /// connection task's outbound loop.
    pub fn remove(&self, id: SessionId) {
        if self.sessions.remove(&id).is_some() {
            info!(session_id = id, "Session removed");
        }
    }

    /// Number of live sessions
    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Ids of all live sessions
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|r| *r.key()).collect()
    }

    /// Queue a frame for every session. A session whose channel is full
    /// drops the frame rather than stalling everyone else. Returns the
    /// number of sessions the frame was queued for.
    pub fn broadcast_all(&self, frame: &str) -> usize {
        self.broadcast_filtered(frame, |_| true)
    }

    /// Queue a frame for every session except one
    pub fn broadcast_except(&self, exclude: SessionId, frame: &str) -> usize {
        self.broadcast_filtered(frame, |session| session.id != exclude)
    }

    fn broadcast_filtered(&self, frame: &str, keep: impl Fn(&Session) -> bool) -> usize {
        let mut delivered = 0;
        for session in self.sessions.iter() {
            if !keep(&session) {
                continue;
            }
            match session.try_send(frame.to_string()) {
                Ok(()) => delivered += 1,
                Err(AventuraError::Network(NetworkError::ChannelFull)) => {
                    warn!(
                        session_id = session.id,
                        "Outbound channel full, dropping frame"
                    );
                }
                Err(_) => {
                    // Channel closed, the session is on its way out
                    debug!(session_id = session.id, "Skipped broadcast to closing session");
                }
            }
        }
        delivered
    }

    /// Mark every session as closing and drop them from the registry
    pub fn disconnect_all(&self) {
        for id in self.session_ids() {
            if let Some(session) = self.get(id) {
                session.set_state(SessionState::Closing);
            }
            self.remove(id);
        }
    }
}

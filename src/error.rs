//! Error handling module
//!
//! Defines custom error types for the Aventura server.

use std::io;

use thiserror::Error;

/// Main error type for the Aventura server
#[derive(Error, Debug)]
pub enum AventuraError {
    /// Network-related errors
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Protocol-related errors
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Game logic errors
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Network-specific errors
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Server at capacity: {current}/{max} sessions")]
    AtCapacity { current: usize, max: usize },

    #[error("Outbound channel full")]
    ChannelFull,
}

impl From<tungstenite::Error> for NetworkError {
    fn from(err: tungstenite::Error) -> Self {
        match err {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                NetworkError::ConnectionClosed
            }
            other => NetworkError::WebSocket(other.to_string()),
        }
    }
}

/// Protocol-specific errors
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("Unsupported frame type")]
    UnsupportedFrame,

    #[error("Message too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: usize, max: usize },
}

/// Game logic errors
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Player already registered: {0}")]
    AlreadyRegistered(u64),

    #[error("Unknown map: {0}")]
    UnknownMap(String),
}

/// Result type alias for Aventura operations
pub type Result<T> = std::result::Result<T, AventuraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NetworkError::ConnectionClosed;
        assert_eq!(err.to_string(), "Connection closed");

        let err = NetworkError::AtCapacity {
            current: 100,
            max: 100,
        };
        assert_eq!(err.to_string(), "Server at capacity: 100/100 sessions");

        let err = GameError::UnknownMap("dungeon".to_string());
        assert_eq!(err.to_string(), "Unknown map: dungeon");
    }

    #[test]
    fn test_error_conversion() {
        let err: AventuraError = NetworkError::ConnectionClosed.into();
        assert!(matches!(err, AventuraError::Network(_)));

        let err: AventuraError = GameError::AlreadyRegistered(7).into();
        assert_eq!(err.to_string(), "Game error: Player already registered: 7");
    }

    #[test]
    fn test_tungstenite_error_mapping() {
        let err: NetworkError = tungstenite::Error::ConnectionClosed.into();
        assert!(matches!(err, NetworkError::ConnectionClosed));
    }
}

//! Error types
//!
//! Defines the failure categories of the relay: startup, client connection,
//! per-session and per-delivery errors.

use std::fmt;
use std::io;
use std::net::SocketAddr;

/// Errors raised by the relay server and the client collaborator
#[derive(Debug)]
pub enum RelayError {
    /// The listening socket could not be bound. Fatal at startup.
    Bind { addr: String, source: io::Error },
    /// The server could not be reached. Fatal to that client instance.
    Connect { addr: String, source: io::Error },
    /// A peer dropped its connection mid-session.
    PeerReset { peer: SocketAddr, source: io::Error },
    /// A broadcast could not be written to one recipient.
    Delivery { recipient: String, source: io::Error },
    /// The first chunk from a client trimmed to nothing.
    EmptyName(SocketAddr),
    /// A name already in the registry was refused.
    NameTaken(String),
    /// Configuration could not be loaded or failed validation.
    Config(config::ConfigError),
    Io(io::Error),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Bind { addr, source } => {
                write!(f, "Failed to bind to {}: {}", addr, source)
            }
            RelayError::Connect { addr, source } => {
                write!(f, "Failed to connect to {}: {}", addr, source)
            }
            RelayError::PeerReset { peer, source } => {
                write!(f, "Connection reset by {}: {}", peer, source)
            }
            RelayError::Delivery { recipient, source } => {
                write!(f, "Failed to deliver message to {}: {}", recipient, source)
            }
            RelayError::EmptyName(peer) => write!(f, "Client {} sent an empty name", peer),
            RelayError::NameTaken(name) => write!(f, "Name already in use: {}", name),
            RelayError::Config(e) => write!(f, "Configuration error: {}", e),
            RelayError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RelayError::Bind { source, .. }
            | RelayError::Connect { source, .. }
            | RelayError::PeerReset { source, .. }
            | RelayError::Delivery { source, .. } => Some(source),
            RelayError::Config(e) => Some(e),
            RelayError::Io(e) => Some(e),
            RelayError::EmptyName(_) | RelayError::NameTaken(_) => None,
        }
    }
}

impl From<config::ConfigError> for RelayError {
    fn from(error: config::ConfigError) -> Self {
        RelayError::Config(error)
    }
}

impl From<io::Error> for RelayError {
    fn from(error: io::Error) -> Self {
        RelayError::Io(error)
    }
}

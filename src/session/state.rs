//! Session lifecycle
//!
//! `Connected -> Named -> Active -> Closing -> Closed`, with an empty or
//! refused name jumping straight from `Connected`/`Named` to `Closed`.

use std::fmt;
use std::net::SocketAddr;

use log::debug;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Named,
    Active,
    Closing,
    Closed,
}

impl SessionState {
    /// Returns whether moving from `self` to `next` is a legal step.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Connected, Named)
                | (Connected, Closed)
                | (Named, Active)
                | (Named, Closed)
                | (Active, Closing)
                | (Closing, Closed)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Connected => "CONNECTED",
            SessionState::Named => "NAMED",
            SessionState::Active => "ACTIVE",
            SessionState::Closing => "CLOSING",
            SessionState::Closed => "CLOSED",
        };
        f.write_str(label)
    }
}

/// Why the active loop of a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The client sent `exit`.
    Command,
    /// The client closed its end (zero-length read).
    PeerClosed,
    /// Reading failed; the error has already been reported.
    ReadError,
}

/// Lifecycle tracker for one accepted connection.
pub struct Session {
    peer: SocketAddr,
    state: SessionState,
}

impl Session {
    pub fn new(peer: SocketAddr) -> Self {
        Self {
            peer,
            state: SessionState::Connected,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transition(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal session transition {} -> {}",
            self.state,
            next
        );
        debug!("Session {}: {} -> {}", self.peer, self.state, next);
        self.state = next;
    }
}

//! Error handlers
//!
//! Logs relay errors at the severity of their category and classifies
//! socket errors.

use crate::error::types::RelayError;
use log::{error, info, warn};
use std::io;

/// Report a relay error as an operator diagnostic
pub fn handle_error(err: &RelayError) {
    match err {
        RelayError::Bind { .. } | RelayError::Connect { .. } | RelayError::Config(_) => {
            error!("{}", err)
        }
        RelayError::PeerReset { .. } | RelayError::Delivery { .. } | RelayError::Io(_) => {
            warn!("{}", err)
        }
        RelayError::EmptyName(_) | RelayError::NameTaken(_) => info!("{}", err),
    }
}

/// Whether an I/O error means the peer went away abruptly
pub fn is_peer_reset(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof
    )
}

/// Whether an error is fatal to the process that raised it
pub fn is_fatal(err: &RelayError) -> bool {
    matches!(
        err,
        RelayError::Bind { .. } | RelayError::Connect { .. } | RelayError::Config(_)
    )
}

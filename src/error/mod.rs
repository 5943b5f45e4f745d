//! Error handling
//!
//! Defines the relay error taxonomy and how each category is reported.

pub mod handlers;
pub mod types;

pub use handlers::{handle_error, is_fatal, is_peer_reset};
pub use types::RelayError;

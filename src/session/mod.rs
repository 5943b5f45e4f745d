//! Client sessions
//!
//! One session per accepted connection: name negotiation, the receive loop
//! and guaranteed teardown.

pub mod handler;
pub mod state;
pub mod teardown;

pub use handler::handle_session;
pub use state::{ExitReason, Session, SessionState};

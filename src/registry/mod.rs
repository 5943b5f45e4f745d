//! Connection registry
//!
//! Tracks live clients by name for broadcast delivery.

pub mod connection;
pub mod name;
pub mod store;

pub use connection::{ConnectionHandle, ConnectionId, SharedWriter};
pub use name::ClientName;
pub use store::ConnectionRegistry;

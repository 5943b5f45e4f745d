//! Broadcast delivery
//!
//! Best-effort fan-out over the connection registry.

pub mod engine;
pub mod results;

pub use engine::broadcast;
pub use results::BroadcastReport;

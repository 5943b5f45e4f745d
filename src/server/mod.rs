//! Acceptor loop
//!
//! Binds the listening socket and hands every accepted connection to its own
//! session task.

pub mod core;

pub use core::Server;

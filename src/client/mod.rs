//! Relay client
//!
//! Connection API used by the terminal client.

pub mod connection;

pub use connection::{ClientReceiver, ClientSender, ClientSession, connect};

pub mod broadcast;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod utils;

pub use config::RelayConfig;
pub use server::Server;

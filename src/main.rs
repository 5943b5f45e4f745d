//! Relay Chat Server - Entry Point
//!
//! Accepts TCP clients and relays every message to all other connected clients.

use log::info;
use std::process;

use relay_chat::error::{RelayError, handle_error, is_fatal};
use relay_chat::utils::setup_logging;
use relay_chat::{RelayConfig, Server};

fn exit_on(err: RelayError) -> ! {
    handle_error(&err);
    process::exit(if is_fatal(&err) { 1 } else { 2 })
}

#[tokio::main]
async fn main() {
    setup_logging();

    let config = match RelayConfig::load() {
        Ok(config) => config,
        Err(e) => exit_on(e),
    };

    info!("Launching relay server...");

    let server = match Server::bind(config).await {
        Ok(server) => server,
        Err(e) => exit_on(e),
    };

    server.start().await;
}

use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::registry::ConnectionRegistry;
use crate::session::handle_session;

/// The relay server: a bound listener plus the shared registry.
pub struct Server {
    registry: ConnectionRegistry,
    listener: TcpListener,
    config: Arc<RelayConfig>,
}

impl Server {
    /// Binds the listening socket. A bind failure is returned to the caller,
    /// which is expected to treat it as fatal.
    pub async fn bind(config: RelayConfig) -> Result<Self, RelayError> {
        let addr = config.socket_addr();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| RelayError::Bind {
                addr: addr.clone(),
                source,
            })?;

        info!("Server bound to {}", addr);

        Ok(Self {
            registry: ConnectionRegistry::new(),
            listener,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle on the shared registry.
    pub fn registry(&self) -> ConnectionRegistry {
        self.registry.clone()
    }

    /// Accepts connections forever, one session task per connection.
    pub async fn start(&self) {
        match self.local_addr() {
            Ok(addr) => info!("Relay server listening on {}", addr),
            Err(_) => info!("Relay server listening on {}", self.config.socket_addr()),
        }

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!("New client connected: {}", addr);
                    let registry = self.registry.clone();
                    let config = Arc::clone(&self.config);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(handle_session(stream, addr, registry, config));
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

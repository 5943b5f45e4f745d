//! Guaranteed session teardown
//!
//! Once a session is registered, a [`Teardown`] is armed. Calling
//! [`Teardown::run`] unregisters the name, closes the connection and
//! announces the departure. A session whose slot was taken over by a later
//! client with the same name leaves silently. If the guard is dropped without running (the
//! session task panicked or was aborted) the same sequence is spawned onto
//! the runtime. Either way it happens once.

use log::{debug, info, warn};
use tokio::io::AsyncWriteExt;

use crate::broadcast::broadcast;
use crate::protocol::Notice;
use crate::registry::{ClientName, ConnectionId, ConnectionRegistry, SharedWriter};

pub struct Teardown {
    pending: Option<PendingTeardown>,
}

struct PendingTeardown {
    registry: ConnectionRegistry,
    name: ClientName,
    id: ConnectionId,
    writer: SharedWriter,
}

impl Teardown {
    pub fn arm(
        registry: ConnectionRegistry,
        name: ClientName,
        id: ConnectionId,
        writer: SharedWriter,
    ) -> Self {
        Self {
            pending: Some(PendingTeardown {
                registry,
                name,
                id,
                writer,
            }),
        }
    }

    pub async fn run(mut self) {
        if let Some(pending) = self.pending.take() {
            pending.execute().await;
        }
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                warn!("Session {} ended abnormally, cleaning up", pending.name);
                runtime.spawn(pending.execute());
            }
            Err(_) => warn!(
                "No runtime left to clean up session {}; registry slot is stale",
                pending.name
            ),
        }
    }
}

impl PendingTeardown {
    async fn execute(self) {
        let PendingTeardown {
            registry,
            name,
            id,
            writer,
        } = self;

        let owned_slot = registry.unregister_connection(name.as_str(), id).await;

        if let Err(e) = writer.lock().await.shutdown().await {
            debug!("Shutdown of {} failed: {}", name, e);
        }
        drop(writer);

        if !owned_slot {
            info!("Displaced connection for {} closed", name);
            return;
        }

        info!("{} left the chat", name);
        broadcast(&registry, &Notice::Left(&name).to_string(), name.as_str()).await;
    }
}

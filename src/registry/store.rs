//! Connection registry
//!
//! Maps client names to their connection handles. Every insert, removal and
//! full iteration goes through one lock over the whole map.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::error::RelayError;
use crate::registry::connection::{ConnectionHandle, ConnectionId};
use crate::registry::name::ClientName;

type ClientMap = HashMap<ClientName, ConnectionHandle>;

/// Shared registry of named connections. Clones share the same map.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    clients: Arc<Mutex<ClientMap>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the slot for `name`.
    ///
    /// Returns the displaced handle, if any. The displaced connection is not
    /// closed.
    pub async fn register(
        &self,
        name: ClientName,
        handle: ConnectionHandle,
    ) -> Option<ConnectionHandle> {
        self.clients.lock().await.insert(name, handle)
    }

    /// Inserts `name` only if it is not registered yet.
    pub async fn try_register(
        &self,
        name: ClientName,
        handle: ConnectionHandle,
    ) -> Result<(), RelayError> {
        match self.clients.lock().await.entry(name) {
            Entry::Occupied(slot) => Err(RelayError::NameTaken(slot.key().to_string())),
            Entry::Vacant(slot) => {
                slot.insert(handle);
                Ok(())
            }
        }
    }

    /// Removes `name` if present. Idempotent.
    pub async fn unregister(&self, name: &str) -> Option<ConnectionHandle> {
        self.clients.lock().await.remove(name)
    }

    /// Removes `name` only while its slot still belongs to connection `id`.
    ///
    /// A session whose slot was taken over by a later client with the same
    /// name must not evict that client.
    pub async fn unregister_connection(&self, name: &str, id: ConnectionId) -> bool {
        let mut clients = self.clients.lock().await;
        match clients.get(name) {
            Some(handle) if handle.id() == id => {
                clients.remove(name);
                true
            }
            _ => false,
        }
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.clients.lock().await.contains_key(name)
    }

    pub async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.lock().await.is_empty()
    }

    /// Registered names, sorted.
    pub async fn names(&self) -> Vec<ClientName> {
        let mut names: Vec<ClientName> = self.clients.lock().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Locks the registry for a full iteration. Mutations wait until the
    /// snapshot is dropped.
    pub(crate) async fn snapshot(&self) -> RegistrySnapshot<'_> {
        RegistrySnapshot {
            guard: self.clients.lock().await,
        }
    }
}

/// Consistent view of every entry, valid while the registry lock is held.
pub(crate) struct RegistrySnapshot<'a> {
    guard: MutexGuard<'a, ClientMap>,
}

impl RegistrySnapshot<'_> {
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&ClientName, &ConnectionHandle)> {
        self.guard.iter()
    }
}

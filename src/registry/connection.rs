//! Registry-side connection handles
//!
//! A session owns its socket; the registry only keeps a weak reference to the
//! write half, used to deliver broadcasts.

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Write half of a session's socket, owned by that session.
pub type SharedWriter = Arc<Mutex<OwnedWriteHalf>>;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one accepted connection for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Non-owning handle stored in the registry for one named connection.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    peer: SocketAddr,
    writer: Weak<Mutex<OwnedWriteHalf>>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, peer: SocketAddr, writer: &SharedWriter) -> Self {
        Self {
            id,
            peer,
            writer: Arc::downgrade(writer),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Writes `bytes` to the connection.
    ///
    /// Fails with `NotConnected` once the owning session has dropped its
    /// write half.
    pub async fn send(&self, bytes: &[u8]) -> io::Result<()> {
        let writer = self.writer.upgrade().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "connection already closed")
        })?;

        let mut writer = writer.lock().await;
        writer.write_all(bytes).await?;
        writer.flush().await
    }
}

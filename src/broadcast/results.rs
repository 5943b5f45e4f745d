//! Broadcast result types

use crate::registry::ClientName;

/// Outcome of one fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Recipients the message was written to
    pub delivered: Vec<ClientName>,
    /// Recipients whose delivery failed and were skipped
    pub failed: Vec<ClientName>,
}

impl BroadcastReport {
    pub fn recipients(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}

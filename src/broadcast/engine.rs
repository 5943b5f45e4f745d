//! Broadcast engine
//!
//! Fans one message out to every registered client except the sender.

use log::debug;

use crate::broadcast::results::BroadcastReport;
use crate::error::{RelayError, handle_error};
use crate::registry::ConnectionRegistry;

/// Delivers `message` to every registry entry whose name is not `exclude`.
///
/// The registry stays locked for the whole fan-out, so no join or leave can
/// interleave with it. A failed delivery is logged and skipped; it never
/// stops the remaining recipients and never reaches the caller. Recipient
/// order is the map's iteration order.
pub async fn broadcast(
    registry: &ConnectionRegistry,
    message: &str,
    exclude: &str,
) -> BroadcastReport {
    let bytes = message.as_bytes();
    let mut report = BroadcastReport::default();

    let snapshot = registry.snapshot().await;
    for (name, handle) in snapshot.entries() {
        if name.as_str() == exclude {
            continue;
        }

        match handle.send(bytes).await {
            Ok(()) => report.delivered.push(name.clone()),
            Err(source) => {
                handle_error(&RelayError::Delivery {
                    recipient: name.to_string(),
                    source,
                });
                report.failed.push(name.clone());
            }
        }
    }
    drop(snapshot);

    debug!(
        "Broadcast from {} reached {}/{} recipients",
        exclude,
        report.delivered.len(),
        report.recipients()
    );
    report
}

use log::{info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedReadHalf;
use tokio::sync::Mutex;

use crate::broadcast::broadcast;
use crate::config::{DuplicateNamePolicy, RelayConfig};
use crate::error::{RelayError, handle_error, is_peer_reset};
use crate::protocol::{Inbound, Notice, parse_inbound, parse_name};
use crate::registry::{
    ClientName, ConnectionHandle, ConnectionId, ConnectionRegistry, SharedWriter,
};
use crate::session::state::{ExitReason, Session, SessionState};
use crate::session::teardown::Teardown;

/// Runs one client connection from accept to close.
///
/// - The first chunk read is the client's name; an empty name closes the
///   connection without registering.
/// - Every later chunk is one message: `exit` ends the session, anything
///   else is relayed to the other clients.
/// - Teardown runs once on every exit path, including read errors.
pub async fn handle_session(
    stream: TcpStream,
    peer: SocketAddr,
    registry: ConnectionRegistry,
    config: Arc<RelayConfig>,
) {
    let mut session = Session::new(peer);
    let (mut reader, writer) = stream.into_split();
    let writer: SharedWriter = Arc::new(Mutex::new(writer));
    let mut buffer = vec![0u8; config.buffer_size];

    let name = match read_name(&mut reader, &mut buffer, peer).await {
        Ok(name) => name,
        Err(e) => {
            handle_error(&e);
            close(&writer).await;
            session.transition(SessionState::Closed);
            return;
        }
    };
    session.transition(SessionState::Named);

    let id = ConnectionId::next();
    let handle = ConnectionHandle::new(id, peer, &writer);

    match config.duplicate_names {
        DuplicateNamePolicy::Replace => {
            if let Some(displaced) = registry.register(name.clone(), handle).await {
                warn!(
                    "{} re-registered from {}; connection {} no longer receives messages",
                    name,
                    peer,
                    displaced.peer()
                );
            }
        }
        DuplicateNamePolicy::Reject => {
            if let Err(e) = registry.try_register(name.clone(), handle).await {
                handle_error(&e);
                let refusal = Notice::NameTaken(&name).to_string();
                if let Err(e) = writer.lock().await.write_all(refusal.as_bytes()).await {
                    warn!("Failed to notify {} of name refusal: {}", peer, e);
                }
                close(&writer).await;
                session.transition(SessionState::Closed);
                return;
            }
        }
    }

    let teardown = Teardown::arm(registry.clone(), name.clone(), id, writer);
    info!("{} ({}) joined the chat", name, peer);
    broadcast(&registry, &Notice::Joined(&name).to_string(), name.as_str()).await;
    session.transition(SessionState::Active);

    let reason = receive_loop(
        &mut reader,
        &mut buffer,
        &registry,
        &name,
        peer,
        config.lenient_exit,
    )
    .await;
    session.transition(SessionState::Closing);
    match reason {
        ExitReason::Command => info!("{} disconnected", name),
        ExitReason::PeerClosed => info!("Connection closed by {} ({})", name, peer),
        ExitReason::ReadError => warn!("{} disconnected abruptly", name),
    }

    drop(reader);
    teardown.run().await;
    session.transition(SessionState::Closed);
}

/// Reads the first chunk and interprets it as the client's name.
async fn read_name(
    reader: &mut OwnedReadHalf,
    buffer: &mut [u8],
    peer: SocketAddr,
) -> Result<ClientName, RelayError> {
    let n = reader
        .read(buffer)
        .await
        .map_err(|e| read_error(peer, e))?;

    parse_name(&buffer[..n]).ok_or(RelayError::EmptyName(peer))
}

/// Reads and dispatches messages until the client leaves or the read fails.
async fn receive_loop(
    reader: &mut OwnedReadHalf,
    buffer: &mut [u8],
    registry: &ConnectionRegistry,
    name: &ClientName,
    peer: SocketAddr,
    lenient_exit: bool,
) -> ExitReason {
    loop {
        let n = match reader.read(buffer).await {
            Ok(0) => return ExitReason::PeerClosed,
            Ok(n) => n,
            Err(e) => {
                handle_error(&read_error(peer, e));
                return ExitReason::ReadError;
            }
        };

        match parse_inbound(&buffer[..n], lenient_exit) {
            Inbound::Exit => {
                info!("[{}] exit", name);
                return ExitReason::Command;
            }
            Inbound::Chat(text) => {
                info!("[{}] {}", name, text);
                let relayed = Notice::Chat {
                    from: name,
                    text: &text,
                }
                .to_string();
                broadcast(registry, &relayed, name.as_str()).await;
            }
        }
    }
}

fn read_error(peer: SocketAddr, source: std::io::Error) -> RelayError {
    if is_peer_reset(&source) {
        RelayError::PeerReset { peer, source }
    } else {
        RelayError::Io(source)
    }
}

async fn close(writer: &SharedWriter) {
    if let Err(e) = writer.lock().await.shutdown().await {
        warn!("Failed to close connection: {}", e);
    }
}

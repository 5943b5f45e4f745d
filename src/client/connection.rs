//! Client side of the relay
//!
//! What the terminal UI builds on: connect, send a line, receive messages.
//! Prompting and local echo stay in the UI.

use log::{debug, info};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use crate::config::DEFAULT_BUFFER_SIZE;
use crate::error::{RelayError, is_peer_reset};
use crate::protocol::decode_chunk;

/// An open connection to the relay server.
pub struct ClientSession {
    server: SocketAddr,
    reader: OwnedReadHalf,
    writer: OwnedWriteHalf,
}

/// Sending half of a [`ClientSession`].
pub struct ClientSender {
    server: SocketAddr,
    writer: OwnedWriteHalf,
}

/// Receiving half of a [`ClientSession`].
pub struct ClientReceiver {
    server: SocketAddr,
    reader: OwnedReadHalf,
    buffer_size: usize,
}

/// Connects to the relay at `addr`. No retry on failure.
pub async fn connect(addr: &str) -> Result<ClientSession, RelayError> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|source| RelayError::Connect {
            addr: addr.to_string(),
            source,
        })?;

    let server = stream.peer_addr()?;
    info!("Connected to relay at {}", server);

    let (reader, writer) = stream.into_split();
    Ok(ClientSession {
        server,
        reader,
        writer,
    })
}

impl ClientSession {
    pub fn server_addr(&self) -> SocketAddr {
        self.server
    }

    /// Sends `text` as one unframed message.
    pub async fn send_line(&mut self, text: &str) -> Result<(), RelayError> {
        write_text(&mut self.writer, text).await
    }

    /// Splits the session so sending and receiving can run concurrently.
    pub fn split(self) -> (ClientReceiver, ClientSender) {
        self.split_with_buffer(DEFAULT_BUFFER_SIZE)
    }

    pub fn split_with_buffer(self, buffer_size: usize) -> (ClientReceiver, ClientSender) {
        let receiver = ClientReceiver {
            server: self.server,
            reader: self.reader,
            buffer_size,
        };
        let sender = ClientSender {
            server: self.server,
            writer: self.writer,
        };
        (receiver, sender)
    }
}

impl ClientSender {
    /// Sends `text` as one unframed message.
    pub async fn send_line(&mut self, text: &str) -> Result<(), RelayError> {
        write_text(&mut self.writer, text).await
    }

    /// Closes the sending direction; the server sees end of stream.
    pub async fn close(mut self) -> Result<(), RelayError> {
        debug!("Closing connection to {}", self.server);
        self.writer.shutdown().await?;
        Ok(())
    }
}

impl ClientReceiver {
    /// Calls `on_message` for every chunk received until the server closes
    /// the connection.
    ///
    /// Returns `Ok(())` on a clean close and `PeerReset` if the server went
    /// away abruptly.
    pub async fn receive_loop<F>(mut self, mut on_message: F) -> Result<(), RelayError>
    where
        F: FnMut(String),
    {
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            match self.reader.read(&mut buffer).await {
                Ok(0) => {
                    info!("Server {} closed the connection", self.server);
                    return Ok(());
                }
                Ok(n) => on_message(decode_chunk(&buffer[..n])),
                Err(source) if is_peer_reset(&source) => {
                    return Err(RelayError::PeerReset {
                        peer: self.server,
                        source,
                    });
                }
                Err(e) => return Err(RelayError::Io(e)),
            }
        }
    }
}

async fn write_text(writer: &mut OwnedWriteHalf, text: &str) -> Result<(), RelayError> {
    writer.write_all(text.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

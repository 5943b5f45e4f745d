//! Chunk decoding
//!
//! The wire is unframed: the bytes returned by one receive call are one
//! message. A payload larger than the receive buffer, or one the transport
//! splits, arrives as several messages; two quick sends may arrive merged.
//! Adding framing would break compatibility with existing clients.

use crate::protocol::commands::{Inbound, classify};
use crate::registry::ClientName;

/// Decodes one received chunk as UTF-8, replacing invalid sequences.
pub fn decode_chunk(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Interprets the first chunk of a connection as the client's name.
pub fn parse_name(bytes: &[u8]) -> Option<ClientName> {
    ClientName::parse(&decode_chunk(bytes))
}

/// Decodes and classifies a chunk from an active client.
pub fn parse_inbound(bytes: &[u8], lenient_exit: bool) -> Inbound {
    classify(decode_chunk(bytes), lenient_exit)
}

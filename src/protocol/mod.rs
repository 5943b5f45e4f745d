//! Relay wire protocol
//!
//! Decodes unframed inbound chunks and renders server notices.

pub mod commands;
pub mod parser;
pub mod responses;

pub use commands::{EXIT_COMMAND, Inbound};
pub use parser::{decode_chunk, parse_inbound, parse_name};
pub use responses::Notice;

//! Inbound message classification
//!
//! Every chunk a named client sends is either the `exit` command or a chat
//! line to relay.

/// The literal command a client sends to leave.
pub const EXIT_COMMAND: &str = "exit";

/// One decoded message from an active client.
#[derive(Debug, PartialEq, Eq)]
pub enum Inbound {
    /// The client wants to leave. Consumed, never relayed.
    Exit,
    /// Any other text, relayed verbatim.
    Chat(String),
}

/// Classifies a decoded chunk.
///
/// The chunk is the `exit` command only if it equals `exit` ignoring ASCII
/// case. With `lenient_exit`, one trailing `\n` or `\r\n` is ignored as well
/// so line-oriented tools can leave. Chat text is never trimmed.
pub fn classify(message: String, lenient_exit: bool) -> Inbound {
    let command = if lenient_exit {
        message
            .strip_suffix("\r\n")
            .or_else(|| message.strip_suffix('\n'))
            .unwrap_or(&message)
    } else {
        &message
    };

    if command.eq_ignore_ascii_case(EXIT_COMMAND) {
        Inbound::Exit
    } else {
        Inbound::Chat(message)
    }
}

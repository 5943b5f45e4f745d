//! Server-generated notices
//!
//! The three event categories a recipient can observe: arrival, departure
//! and relayed chat.

use std::fmt;

use crate::registry::ClientName;

/// A message produced by the relay for other clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice<'a> {
    Joined(&'a ClientName),
    Left(&'a ClientName),
    Chat { from: &'a ClientName, text: &'a str },
    NameTaken(&'a ClientName),
}

impl fmt::Display for Notice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Joined(name) => write!(f, "[INFO] {} a rejoint le chat !", name),
            Notice::Left(name) => write!(f, "[INFO] {} a quitté le chat.", name),
            Notice::Chat { from, text } => write!(f, "[{}] {}", from, text),
            Notice::NameTaken(name) => write!(f, "[INFO] Le nom {} est déjà utilisé.", name),
        }
    }
}

//! Client display names

use std::borrow::Borrow;
use std::fmt;

/// A non-empty, whitespace-trimmed display name; the registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientName(String);

impl ClientName {
    /// Trims `raw` and returns `None` if nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ClientName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed() {
        let name = ClientName::parse("  Alice \r\n").unwrap();
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn blank_names_are_refused() {
        assert!(ClientName::parse("").is_none());
        assert!(ClientName::parse(" \t\r\n ").is_none());
    }

    #[test]
    fn inner_whitespace_is_kept() {
        let name = ClientName::parse(" Jean Paul ").unwrap();
        assert_eq!(name.to_string(), "Jean Paul");
    }
}

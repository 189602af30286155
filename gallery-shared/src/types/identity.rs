use serde::{Deserialize, Serialize};
use std::fmt;

/// Anonymous per-session identity token.
///
/// Minted once by the identity provider, bound to one session, and used as
/// the deduplication key in an artwork's `voters` set. The token is opaque;
/// nothing in the application inspects its contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// An empty token is not a valid voting identity.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_serializes_transparently() {
        let identity = Identity::new("anon-1234");
        let json = serde_json::to_string(&identity).unwrap();
        assert_eq!(json, "\"anon-1234\"");
    }

    #[test]
    fn test_empty_identity() {
        assert!(Identity::new("").is_empty());
        assert!(!Identity::new("u1").is_empty());
    }
}

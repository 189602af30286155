use serde::{Deserialize, Serialize};

/// Opaque pagination marker referencing the last item of a fetched page.
///
/// The token's contents are produced and consumed by a single repository
/// backend; callers only carry it between page fetches. A cursor obtained
/// under one backend or sort mode is meaningless under another.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//! Error types for the artwork repository.
//! Defines specific errors that can occur while talking to the remote
//! artwork collection.
use thiserror::Error;

/// Represents errors that can occur within the artwork repository.
///
/// This enum consolidates transport failures, backend rejections, and
/// response decoding problems behind one type so callers handle every
/// backend uniformly.
#[derive(Debug, Error)]
pub enum ArtworkRepositoryError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Artwork not found: {0}")]
    NotFound(String),

    #[error("Invalid pagination cursor: {0}")]
    InvalidCursor(String),

    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

impl ArtworkRepositoryError {
    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an invalid-cursor error.
    pub fn invalid_cursor(msg: impl Into<String>) -> Self {
        Self::InvalidCursor(msg.into())
    }
}

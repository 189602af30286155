//! Error types for the gallery application components.

use gallery_repository::ArtworkRepositoryError;
use gallery_storage::StorageError;
use thiserror::Error;

/// Errors from the vote coordinator.
#[derive(Error, Debug)]
pub enum VoteError {
    /// The caller's session identity is missing or empty. No mutation was
    /// attempted.
    #[error("invalid session: missing identity")]
    InvalidSession,

    /// The target artwork is not present in the caller's list. No mutation
    /// was attempted.
    #[error("unknown artwork: {0}")]
    UnknownArtwork(String),

    /// The remote update failed; the local list has been rolled back.
    #[error("remote vote update failed: {0}")]
    RemoteUpdate(#[source] ArtworkRepositoryError),
}

/// Errors from the query planner and gallery view.
#[derive(Error, Debug)]
pub enum QueryError {
    /// A page fetch failed; the materialized list is unchanged.
    #[error("page fetch failed: {0}")]
    Fetch(#[source] ArtworkRepositoryError),

    /// A count fetch failed.
    #[error("count fetch failed: {0}")]
    Count(#[source] ArtworkRepositoryError),
}

/// Errors from the upload service.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The submission was rejected before any remote call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The blob upload failed; no document was created.
    #[error("image upload failed: {0}")]
    Storage(#[from] StorageError),

    /// The document creation failed after the image was stored.
    #[error("artwork creation failed: {0}")]
    Repository(#[from] ArtworkRepositoryError),
}

impl UploadError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

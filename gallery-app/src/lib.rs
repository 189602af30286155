//! # Gallery App
//!
//! Web gallery application: users upload images with a title and author,
//! browse a paginated and sortable gallery, and cast a single vote per item.
//! Persistence, file storage, and anonymous identity are delegated to remote
//! backends behind the `gallery-repository`, `gallery-storage`, and
//! `gallery-identity` crates.
//!
//! ## Architecture
//!
//! 1. **Vote coordinator**: applies a vote optimistically, issues the atomic
//!    remote update, and rolls back on failure
//! 2. **Query planner**: translates sort/filter modes into remote page
//!    queries and scoped counts
//! 3. **Gallery view**: the materialized list with pagination bookkeeping and
//!    the local search overlay
//! 4. **Upload service**: validates submissions and persists new artworks
//! 5. **HTTP API**: a thin JSON surface over the components
//!
//! ## Modules
//!
//! - [`config`]: configuration and dependency initialization
//! - [`vote`]: vote coordinator
//! - [`query`]: query planner and gallery view
//! - [`upload`]: upload service
//! - [`http`]: axum routes
//! - [`errors`]: error types for the components

pub mod config;
pub mod errors;
pub mod http;
pub mod query;
pub mod upload;
pub mod vote;

pub use config::Dependencies;
pub use errors::{QueryError, UploadError, VoteError};

use thiserror::Error;

/// Errors that can occur during application startup.
#[derive(Error, Debug)]
pub enum GalleryError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The anonymous session could not be established.
    #[error("Identity bootstrap failed: {0}")]
    IdentityError(#[from] gallery_identity::IdentityError),

    /// Listener or server I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl GalleryError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

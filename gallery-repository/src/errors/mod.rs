//! Error types for the gallery repository.
//! Consolidates and re-exports error types related to artwork collection operations.
mod artworks;

pub use artworks::ArtworkRepositoryError;

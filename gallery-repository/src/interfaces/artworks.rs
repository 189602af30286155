//! This module defines the `ArtworkRepository` trait, which provides an
//! interface for interacting with the remote artwork collection. It abstracts
//! paged queries, scoped counts, the atomic vote mutation, and document
//! creation.
use crate::errors::ArtworkRepositoryError;
use crate::types::{ArtworkPage, PageQuery};
use gallery_shared::{Artwork, Identity, NewArtwork};

/// A trait that defines the interface for the remote artwork collection.
///
/// Implementors of this trait provide methods for fetching ordered pages,
/// counting filtered subsets, applying votes, and creating new artwork
/// documents.
#[async_trait::async_trait]
pub trait ArtworkRepository: Send + Sync {
    /// Fetches one page of artworks.
    ///
    /// The query combines an optional equality filter, an order-by clause, a
    /// start-after cursor, and a limit into a single remote request.
    ///
    /// # Arguments
    ///
    /// * `query` - The page query constraints.
    ///
    /// # Returns
    ///
    /// An `ArtworkPage` with the artworks in remote order and a cursor for
    /// the following page, or an `ArtworkRepositoryError` if the fetch fails.
    async fn fetch_page(&self, query: &PageQuery) -> Result<ArtworkPage, ArtworkRepositoryError>;

    /// Counts artworks matching the given event tag filter.
    ///
    /// `None` counts the whole collection. No ordering applies to a count.
    async fn count(&self, event_tag: Option<i64>) -> Result<u64, ArtworkRepositoryError>;

    /// Applies one vote to the stored artwork document.
    ///
    /// Unions `voter` into the stored `voters` set and increments the stored
    /// `voteCount` by 1 as ONE atomic multi-field update; a partial
    /// application of the pair is impossible. The union deduplicates while
    /// the increment does not, so callers must not re-submit a voter they
    /// already know to be present.
    ///
    /// # Arguments
    ///
    /// * `artwork_id` - The target document id.
    /// * `voter` - The session identity casting the vote.
    ///
    /// # Returns
    ///
    /// `Ok(())` once the update is durable, `NotFound` if the document does
    /// not exist, or another `ArtworkRepositoryError` if the update fails.
    async fn apply_vote(
        &self,
        artwork_id: &str,
        voter: &Identity,
    ) -> Result<(), ArtworkRepositoryError>;

    /// Creates a new artwork document.
    ///
    /// The document starts with zero votes, an empty voter set, and a
    /// server-assigned creation timestamp.
    ///
    /// # Arguments
    ///
    /// * `new_artwork` - The creation payload.
    ///
    /// # Returns
    ///
    /// The stored `Artwork` (its `created_at` may still be unresolved), or
    /// an `ArtworkRepositoryError` if the creation fails.
    async fn insert_artwork(
        &self,
        new_artwork: &NewArtwork,
    ) -> Result<Artwork, ArtworkRepositoryError>;
}

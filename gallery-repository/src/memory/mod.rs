//! In-memory artwork repository for tests and local development.
//!
//! `MemoryRepository` reproduces the remote store's observable semantics:
//! filtered and ordered page queries with start-after cursors, scoped counts,
//! and the vote mutation in which the voter union deduplicates while the
//! counter increment does not.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::ArtworkRepositoryError;
use crate::interfaces::ArtworkRepository;
use crate::types::{ArtworkPage, OrderDirection, OrderField, PageQuery};
use gallery_shared::{Artwork, Identity, NewArtwork, PageCursor};

/// In-memory implementation of [`ArtworkRepository`].
///
/// Cursors issued by this backend are the id of the last artwork of the
/// page; ties in the order-by field break on id so a cursor always resumes
/// at a stable position.
#[derive(Default)]
pub struct MemoryRepository {
    artworks: Mutex<Vec<Artwork>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with the given artworks.
    pub fn with_artworks(artworks: Vec<Artwork>) -> Self {
        Self {
            artworks: Mutex::new(artworks),
        }
    }

    /// Returns a snapshot of one stored artwork, if present.
    pub fn artwork(&self, id: &str) -> Option<Artwork> {
        self.artworks
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    fn ordered(&self, query: &PageQuery) -> Vec<Artwork> {
        let mut artworks: Vec<Artwork> = self
            .artworks
            .lock()
            .unwrap()
            .iter()
            .filter(|a| query.event_tag.is_none() || a.event_tag == query.event_tag)
            .cloned()
            .collect();
        artworks.sort_by(|a, b| {
            let ordering = match query.order_by {
                OrderField::VoteCount => a.vote_count.cmp(&b.vote_count),
                OrderField::CreatedAt => created_at_key(a).cmp(&created_at_key(b)),
                OrderField::Title => a.title.cmp(&b.title),
            };
            let ordering = match query.direction {
                OrderDirection::Ascending => ordering,
                OrderDirection::Descending => ordering.reverse(),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });
        artworks
    }
}

/// An unresolved server timestamp orders as the most recent.
fn created_at_key(artwork: &Artwork) -> DateTime<Utc> {
    artwork.created_at.unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[async_trait::async_trait]
impl ArtworkRepository for MemoryRepository {
    async fn fetch_page(&self, query: &PageQuery) -> Result<ArtworkPage, ArtworkRepositoryError> {
        let ordered = self.ordered(query);
        let start = match &query.start_after {
            Some(cursor) => match ordered.iter().position(|a| a.id == cursor.as_str()) {
                Some(position) => position + 1,
                None => {
                    return Err(ArtworkRepositoryError::invalid_cursor(cursor.as_str()));
                }
            },
            None => 0,
        };
        let artworks: Vec<Artwork> = ordered.into_iter().skip(start).take(query.limit).collect();
        let next_cursor = artworks.last().map(|a| PageCursor::new(a.id.clone()));
        Ok(ArtworkPage {
            artworks,
            next_cursor,
        })
    }

    async fn count(&self, event_tag: Option<i64>) -> Result<u64, ArtworkRepositoryError> {
        let artworks = self.artworks.lock().unwrap();
        Ok(artworks
            .iter()
            .filter(|a| event_tag.is_none() || a.event_tag == event_tag)
            .count() as u64)
    }

    async fn apply_vote(
        &self,
        artwork_id: &str,
        voter: &Identity,
    ) -> Result<(), ArtworkRepositoryError> {
        let mut artworks = self.artworks.lock().unwrap();
        let artwork = artworks
            .iter_mut()
            .find(|a| a.id == artwork_id)
            .ok_or_else(|| ArtworkRepositoryError::NotFound(artwork_id.to_string()))?;
        // Same behavior as the remote transforms: the union skips a voter
        // already present, the increment applies regardless.
        if !artwork.voters.contains(voter) {
            artwork.voters.push(voter.clone());
        }
        artwork.vote_count += 1;
        Ok(())
    }

    async fn insert_artwork(
        &self,
        new_artwork: &NewArtwork,
    ) -> Result<Artwork, ArtworkRepositoryError> {
        let artwork = Artwork {
            id: Uuid::new_v4().to_string(),
            title: new_artwork.title.clone(),
            author: new_artwork.author.clone(),
            image_url: new_artwork.image_url.clone(),
            vote_count: 0,
            voters: Vec::new(),
            created_at: Some(Utc::now()),
            event_tag: new_artwork.event_tag,
        };
        self.artworks.lock().unwrap().push(artwork.clone());
        Ok(artwork)
    }
}

//! Vote coordinator: applies a single vote from the current identity to one
//! artwork, with optimistic local mutation and rollback on remote failure.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::VoteError;
use gallery_repository::ArtworkRepository;
use gallery_shared::{Artwork, Identity, SortMode};

/// Outcome of a vote cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The vote was applied locally and confirmed remotely.
    Applied,
    /// The identity had already voted for this artwork; nothing changed and
    /// no remote call was issued.
    AlreadyVoted,
}

/// Applies votes against the remote collection with optimistic local updates.
///
/// The coordinator owns no list state of its own: the caller passes the
/// current in-memory list, which is the source of truth for the idempotency
/// pre-check. The guard is best-effort — it only sees locally known voters,
/// so two sessions holding the same identity can both slip past it (the
/// integration tests demonstrate the consequence).
pub struct VoteCoordinator {
    repository: Arc<dyn ArtworkRepository>,
}

impl VoteCoordinator {
    pub fn new(repository: Arc<dyn ArtworkRepository>) -> Self {
        Self { repository }
    }

    /// Casts one vote on `artwork_id` by `identity`.
    ///
    /// On success the target's `vote_count` is incremented by exactly one,
    /// the identity is appended to its `voters`, and the list is re-sorted
    /// under `mode`. On remote failure the list is restored to its pre-vote
    /// state (re-sorted under `mode`) and the error is surfaced; no retry is
    /// attempted.
    ///
    /// # Arguments
    ///
    /// * `artwork_id` - The target artwork id.
    /// * `identity` - The caller's session identity.
    /// * `artworks` - The caller's materialized list.
    /// * `mode` - The active sort mode, used for the re-sort.
    pub async fn cast_vote(
        &self,
        artwork_id: &str,
        identity: &Identity,
        artworks: &mut Vec<Artwork>,
        mode: SortMode,
    ) -> Result<VoteOutcome, VoteError> {
        if identity.is_empty() {
            return Err(VoteError::InvalidSession);
        }

        let target = artworks
            .iter()
            .find(|a| a.id == artwork_id)
            .ok_or_else(|| VoteError::UnknownArtwork(artwork_id.to_string()))?;

        if target.has_voted(identity) {
            debug!(artwork_id, identity = %identity, "vote skipped, already voted");
            return Ok(VoteOutcome::AlreadyVoted);
        }

        // Optimistic apply: the visible list changes before the remote store
        // confirms, keyed off a snapshot for the rollback path.
        let snapshot = artworks.clone();
        for artwork in artworks.iter_mut() {
            if artwork.id == artwork_id {
                artwork.vote_count += 1;
                artwork.voters.push(identity.clone());
            }
        }
        mode.sort(artworks);

        // One atomic multi-field update: voter union plus counter increment.
        match self.repository.apply_vote(artwork_id, identity).await {
            Ok(()) => {
                debug!(artwork_id, identity = %identity, "vote confirmed");
                Ok(VoteOutcome::Applied)
            }
            Err(error) => {
                warn!(artwork_id, error = %error, "vote update failed, rolling back");
                *artworks = snapshot;
                mode.sort(artworks);
                Err(VoteError::RemoteUpdate(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use gallery_repository::{ArtworkPage, ArtworkRepositoryError, PageQuery};
    use gallery_shared::NewArtwork;

    // Mock repository recording vote submissions, optionally failing them.
    struct MockRepository {
        applied_votes: Mutex<Vec<(String, Identity)>>,
        fail_votes: bool,
    }

    impl MockRepository {
        fn new() -> Self {
            Self {
                applied_votes: Mutex::new(Vec::new()),
                fail_votes: false,
            }
        }

        fn failing() -> Self {
            Self {
                applied_votes: Mutex::new(Vec::new()),
                fail_votes: true,
            }
        }

        fn applied(&self) -> Vec<(String, Identity)> {
            self.applied_votes.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ArtworkRepository for MockRepository {
        async fn fetch_page(
            &self,
            _query: &PageQuery,
        ) -> Result<ArtworkPage, ArtworkRepositoryError> {
            Ok(ArtworkPage {
                artworks: Vec::new(),
                next_cursor: None,
            })
        }

        async fn count(&self, _event_tag: Option<i64>) -> Result<u64, ArtworkRepositoryError> {
            Ok(0)
        }

        async fn apply_vote(
            &self,
            artwork_id: &str,
            voter: &Identity,
        ) -> Result<(), ArtworkRepositoryError> {
            if self.fail_votes {
                return Err(ArtworkRepositoryError::Rejected {
                    status: 503,
                    message: "mock outage".to_string(),
                });
            }
            self.applied_votes
                .lock()
                .unwrap()
                .push((artwork_id.to_string(), voter.clone()));
            Ok(())
        }

        async fn insert_artwork(
            &self,
            new_artwork: &NewArtwork,
        ) -> Result<Artwork, ArtworkRepositoryError> {
            Ok(Artwork {
                id: "unused".to_string(),
                title: new_artwork.title.clone(),
                author: new_artwork.author.clone(),
                image_url: new_artwork.image_url.clone(),
                vote_count: 0,
                voters: Vec::new(),
                created_at: None,
                event_tag: new_artwork.event_tag,
            })
        }
    }

    fn artwork(id: &str, votes: i64, voters: Vec<&str>) -> Artwork {
        Artwork {
            id: id.to_string(),
            title: format!("Title {id}"),
            author: "author".to_string(),
            image_url: format!("https://example.com/{id}.png"),
            vote_count: votes,
            voters: voters.into_iter().map(Identity::new).collect(),
            created_at: None,
            event_tag: None,
        }
    }

    fn ids(artworks: &[Artwork]) -> Vec<&str> {
        artworks.iter().map(|a| a.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_identity_is_rejected_without_mutation() {
        let repository = Arc::new(MockRepository::new());
        let coordinator = VoteCoordinator::new(repository.clone());
        let mut list = vec![artwork("a", 3, vec![])];
        let before = list.clone();

        let result = coordinator
            .cast_vote("a", &Identity::new(""), &mut list, SortMode::Votes)
            .await;

        assert!(matches!(result, Err(VoteError::InvalidSession)));
        assert_eq!(list, before);
        assert!(repository.applied().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_artwork_is_rejected_without_mutation() {
        let repository = Arc::new(MockRepository::new());
        let coordinator = VoteCoordinator::new(repository.clone());
        let mut list = vec![artwork("a", 3, vec![])];

        let result = coordinator
            .cast_vote("missing", &Identity::new("u1"), &mut list, SortMode::Votes)
            .await;

        assert!(matches!(result, Err(VoteError::UnknownArtwork(_))));
        assert!(repository.applied().is_empty());
    }

    #[tokio::test]
    async fn test_already_voted_is_a_local_no_op() {
        let repository = Arc::new(MockRepository::new());
        let coordinator = VoteCoordinator::new(repository.clone());
        let mut list = vec![artwork("a", 3, vec!["u1"]), artwork("b", 5, vec![])];
        let before = list.clone();

        let outcome = coordinator
            .cast_vote("a", &Identity::new("u1"), &mut list, SortMode::Votes)
            .await
            .unwrap();

        assert_eq!(outcome, VoteOutcome::AlreadyVoted);
        assert_eq!(list, before);
        // The guard fires before any remote call.
        assert!(repository.applied().is_empty());
    }

    #[tokio::test]
    async fn test_successful_vote_touches_only_the_target() {
        let repository = Arc::new(MockRepository::new());
        let coordinator = VoteCoordinator::new(repository.clone());
        // [A:3, B:5] under votes ordering is [B, A].
        let mut list = vec![artwork("b", 5, vec![]), artwork("a", 3, vec![])];

        let outcome = coordinator
            .cast_vote("a", &Identity::new("u1"), &mut list, SortMode::Votes)
            .await
            .unwrap();

        assert_eq!(outcome, VoteOutcome::Applied);
        // A moved to 4 votes; 4 < 5, so the order is still [B, A].
        assert_eq!(ids(&list), vec!["b", "a"]);
        assert_eq!(list[1].vote_count, 4);
        assert_eq!(list[1].voters, vec![Identity::new("u1")]);
        assert_eq!(list[0].vote_count, 5);
        assert!(list[0].voters.is_empty());
        assert_eq!(
            repository.applied(),
            vec![("a".to_string(), Identity::new("u1"))]
        );

        // Voting again with the same identity is a no-op.
        let outcome = coordinator
            .cast_vote("a", &Identity::new("u1"), &mut list, SortMode::Votes)
            .await
            .unwrap();
        assert_eq!(outcome, VoteOutcome::AlreadyVoted);
        assert_eq!(list[1].vote_count, 4);
        assert_eq!(repository.applied().len(), 1);
    }

    #[tokio::test]
    async fn test_vote_can_reorder_the_list() {
        let repository = Arc::new(MockRepository::new());
        let coordinator = VoteCoordinator::new(repository);
        let mut list = vec![artwork("b", 5, vec![]), artwork("a", 5, vec![])];

        coordinator
            .cast_vote("a", &Identity::new("u1"), &mut list, SortMode::Votes)
            .await
            .unwrap();

        // A overtakes B at 6 votes.
        assert_eq!(ids(&list), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_failed_remote_update_rolls_back() {
        let repository = Arc::new(MockRepository::failing());
        let coordinator = VoteCoordinator::new(repository);
        let mut list = vec![artwork("b", 5, vec![]), artwork("a", 3, vec![])];
        let before = list.clone();

        let result = coordinator
            .cast_vote("a", &Identity::new("u1"), &mut list, SortMode::Votes)
            .await;

        assert!(matches!(result, Err(VoteError::RemoteUpdate(_))));
        // Element for element, the visible list equals its pre-vote state.
        assert_eq!(list, before);
    }
}

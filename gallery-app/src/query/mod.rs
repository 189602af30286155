//! Gallery query planner: translates a sort/filter mode plus a pagination
//! cursor into one remote page query, and runs the scoped total counts.

mod view;

pub use view::{GalleryView, LoadMoreOutcome};

use std::sync::Arc;

use tracing::debug;

use crate::errors::QueryError;
use gallery_repository::{ArtworkRepository, OrderDirection, OrderField, PageQuery};
use gallery_shared::{Artwork, PageCursor, SortMode};

/// Default number of artworks fetched per page.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// One loaded page, ready to merge into the gallery view.
#[derive(Debug, Clone)]
pub struct LoadedPage {
    /// Artworks in remote order.
    pub artworks: Vec<Artwork>,
    /// Cursor for requesting the page after this one; `None` when the page
    /// came back empty.
    pub next_cursor: Option<PageCursor>,
    /// Whether another page is likely to exist. This is the page-full
    /// heuristic: when the true remaining count is an exact multiple of the
    /// page size, one extra empty fetch is needed to discover exhaustion.
    pub has_more: bool,
}

/// Plans and executes remote page queries for the gallery listing.
pub struct QueryPlanner {
    repository: Arc<dyn ArtworkRepository>,
}

impl QueryPlanner {
    pub fn new(repository: Arc<dyn ArtworkRepository>) -> Self {
        Self { repository }
    }

    /// Builds the remote query for `mode`: the optional event-tag equality
    /// filter, the order-by clause, the start-after cursor, and the limit.
    fn plan(mode: SortMode, cursor: Option<PageCursor>, page_size: usize) -> PageQuery {
        let (order_by, direction) = match mode {
            SortMode::Newest => (OrderField::CreatedAt, OrderDirection::Descending),
            SortMode::Oldest => (OrderField::CreatedAt, OrderDirection::Ascending),
            SortMode::Title => (OrderField::Title, OrderDirection::Ascending),
            SortMode::Votes | SortMode::Event1 | SortMode::Event2 => {
                (OrderField::VoteCount, OrderDirection::Descending)
            }
        };
        PageQuery {
            event_tag: mode.event_filter(),
            order_by,
            direction,
            start_after: cursor,
            limit: page_size,
        }
    }

    /// Fetches one page under `mode`, resuming after `cursor` when given.
    pub async fn load_page(
        &self,
        mode: SortMode,
        cursor: Option<PageCursor>,
        page_size: usize,
    ) -> Result<LoadedPage, QueryError> {
        let query = Self::plan(mode, cursor, page_size);
        debug!(?mode, limit = page_size, "fetching gallery page");
        let page = self
            .repository
            .fetch_page(&query)
            .await
            .map_err(QueryError::Fetch)?;
        let has_more = page.artworks.len() == page_size;
        Ok(LoadedPage {
            artworks: page.artworks,
            next_cursor: page.next_cursor,
            has_more,
        })
    }

    /// Counts all artworks matching `mode`'s filter. No ordering applies to
    /// a count.
    pub async fn count(&self, mode: SortMode) -> Result<u64, QueryError> {
        self.repository
            .count(mode.event_filter())
            .await
            .map_err(QueryError::Count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use gallery_repository::{ArtworkPage, ArtworkRepositoryError};
    use gallery_shared::{Identity, NewArtwork};

    // Mock repository that records every page query and serves a canned page.
    struct RecordingRepository {
        queries: Mutex<Vec<PageQuery>>,
        page: Vec<Artwork>,
    }

    impl RecordingRepository {
        fn new(page: Vec<Artwork>) -> Self {
            Self {
                queries: Mutex::new(Vec::new()),
                page,
            }
        }

        fn last_query(&self) -> PageQuery {
            self.queries.lock().unwrap().last().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ArtworkRepository for RecordingRepository {
        async fn fetch_page(
            &self,
            query: &PageQuery,
        ) -> Result<ArtworkPage, ArtworkRepositoryError> {
            self.queries.lock().unwrap().push(query.clone());
            Ok(ArtworkPage {
                artworks: self.page.clone(),
                next_cursor: self.page.last().map(|a| PageCursor::new(a.id.clone())),
            })
        }

        async fn count(&self, _event_tag: Option<i64>) -> Result<u64, ArtworkRepositoryError> {
            Ok(self.page.len() as u64)
        }

        async fn apply_vote(
            &self,
            _artwork_id: &str,
            _voter: &Identity,
        ) -> Result<(), ArtworkRepositoryError> {
            Ok(())
        }

        async fn insert_artwork(
            &self,
            _new_artwork: &NewArtwork,
        ) -> Result<Artwork, ArtworkRepositoryError> {
            unreachable!("not used by planner tests")
        }
    }

    fn artwork(id: &str) -> Artwork {
        Artwork {
            id: id.to_string(),
            title: format!("Title {id}"),
            author: "author".to_string(),
            image_url: format!("https://example.com/{id}.png"),
            vote_count: 0,
            voters: Vec::new(),
            created_at: None,
            event_tag: None,
        }
    }

    #[tokio::test]
    async fn test_mode_to_query_translation() {
        let repository = Arc::new(RecordingRepository::new(Vec::new()));
        let planner = QueryPlanner::new(repository.clone());

        let cases = [
            (SortMode::Votes, None, OrderField::VoteCount, OrderDirection::Descending),
            (SortMode::Newest, None, OrderField::CreatedAt, OrderDirection::Descending),
            (SortMode::Oldest, None, OrderField::CreatedAt, OrderDirection::Ascending),
            (SortMode::Title, None, OrderField::Title, OrderDirection::Ascending),
            (SortMode::Event1, Some(1), OrderField::VoteCount, OrderDirection::Descending),
            (SortMode::Event2, Some(2), OrderField::VoteCount, OrderDirection::Descending),
        ];

        for (mode, event_tag, order_by, direction) in cases {
            planner.load_page(mode, None, 8).await.unwrap();
            let query = repository.last_query();
            assert_eq!(query.event_tag, event_tag, "{mode:?}");
            assert_eq!(query.order_by, order_by, "{mode:?}");
            assert_eq!(query.direction, direction, "{mode:?}");
            assert_eq!(query.limit, 8);
        }
    }

    #[tokio::test]
    async fn test_cursor_is_forwarded() {
        let repository = Arc::new(RecordingRepository::new(Vec::new()));
        let planner = QueryPlanner::new(repository.clone());

        planner
            .load_page(SortMode::Votes, Some(PageCursor::new("after-x")), 8)
            .await
            .unwrap();
        let query = repository.last_query();
        assert_eq!(query.start_after, Some(PageCursor::new("after-x")));
    }

    #[tokio::test]
    async fn test_has_more_is_the_page_full_heuristic() {
        let full = Arc::new(RecordingRepository::new(vec![artwork("a"), artwork("b")]));
        let planner = QueryPlanner::new(full);
        let page = planner.load_page(SortMode::Votes, None, 2).await.unwrap();
        assert!(page.has_more);

        let short = Arc::new(RecordingRepository::new(vec![artwork("a")]));
        let planner = QueryPlanner::new(short);
        let page = planner.load_page(SortMode::Votes, None, 2).await.unwrap();
        assert!(!page.has_more);
    }
}

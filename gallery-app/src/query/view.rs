//! Client-local gallery view state: the materialized artwork list, the
//! active sort mode, pagination bookkeeping, and the local search overlay.

use crate::errors::QueryError;
use crate::query::QueryPlanner;
use gallery_shared::{Artwork, PageCursor, SortMode};

/// Result of a load-more request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMoreOutcome {
    /// A page was fetched; this many artworks were appended.
    Loaded(usize),
    /// Nothing further to fetch.
    Exhausted,
    /// A search term is active; paginating a client-filtered view is not
    /// well-defined, so no remote fetch was issued.
    Suppressed,
}

/// Ephemeral, client-local state of the gallery listing.
///
/// All remote access goes through the [`QueryPlanner`] passed into each
/// method; the view itself only owns the materialized list and its
/// pagination bookkeeping. Subsequent pages are appended, never replacing
/// the list, except on a mode change or explicit refresh.
#[derive(Debug)]
pub struct GalleryView {
    artworks: Vec<Artwork>,
    mode: SortMode,
    cursor: Option<PageCursor>,
    has_more: bool,
    total: u64,
    search_term: String,
    page_size: usize,
}

impl GalleryView {
    pub fn new(page_size: usize) -> Self {
        Self {
            artworks: Vec::new(),
            mode: SortMode::default(),
            cursor: None,
            has_more: false,
            total: 0,
            search_term: String::new(),
            page_size,
        }
    }

    pub fn artworks(&self) -> &[Artwork] {
        &self.artworks
    }

    /// Mutable access to the materialized list, for the vote coordinator.
    pub fn artworks_mut(&mut self) -> &mut Vec<Artwork> {
        &mut self.artworks
    }

    pub fn mode(&self) -> SortMode {
        self.mode
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Total-count estimate for the active filter, refreshed on every reset.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Artworks currently visible: the materialized list filtered by the
    /// active search term (case-insensitive substring on title or author).
    pub fn visible(&self) -> Vec<&Artwork> {
        if self.search_term.is_empty() {
            self.artworks.iter().collect()
        } else {
            self.artworks
                .iter()
                .filter(|a| a.matches_search(&self.search_term))
                .collect()
        }
    }

    /// Whether load-more may issue a remote fetch right now.
    pub fn can_load_more(&self) -> bool {
        self.has_more && self.search_term.is_empty()
    }

    /// Discards pagination state, then refetches the first page and the
    /// total count under the current mode.
    ///
    /// The list and its bookkeeping are replaced only once both fetches
    /// succeed; on failure the previous list stays visible.
    pub async fn refresh(&mut self, planner: &QueryPlanner) -> Result<(), QueryError> {
        let page = planner.load_page(self.mode, None, self.page_size).await?;
        let total = planner.count(self.mode).await?;

        self.artworks = page.artworks;
        self.cursor = page.next_cursor;
        self.has_more = page.has_more;
        self.total = total;
        Ok(())
    }

    /// Switches the sort/filter mode.
    ///
    /// A changed mode discards the cursor and restarts pagination from the
    /// first page; an unchanged mode is a no-op.
    pub async fn set_mode(
        &mut self,
        mode: SortMode,
        planner: &QueryPlanner,
    ) -> Result<(), QueryError> {
        if mode == self.mode {
            return Ok(());
        }
        self.mode = mode;
        // A stale cursor must never leak into the new mode, even if the
        // refetch below fails.
        self.cursor = None;
        self.has_more = false;
        self.refresh(planner).await
    }

    /// Appends the next page to the materialized list.
    ///
    /// Suppressed while a search term is active, and a no-op once the
    /// listing is exhausted.
    pub async fn load_more(&mut self, planner: &QueryPlanner) -> Result<LoadMoreOutcome, QueryError> {
        if !self.search_term.is_empty() {
            return Ok(LoadMoreOutcome::Suppressed);
        }
        if !self.has_more {
            return Ok(LoadMoreOutcome::Exhausted);
        }

        let page = planner
            .load_page(self.mode, self.cursor.clone(), self.page_size)
            .await?;
        let appended = page.artworks.len();
        self.artworks.extend(page.artworks);
        if page.next_cursor.is_some() {
            // An empty page keeps the previous cursor: there is nothing new
            // to resume after.
            self.cursor = page.next_cursor;
        }
        self.has_more = page.has_more;
        Ok(LoadMoreOutcome::Loaded(appended))
    }

    /// Sets the local search term. Never touches the remote store or the
    /// pagination cursor.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }
}

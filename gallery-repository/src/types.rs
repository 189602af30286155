//! Request and response types for artwork repository operations.

use gallery_shared::{Artwork, PageCursor};

/// The remote field a page query orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    VoteCount,
    CreatedAt,
    Title,
}

impl OrderField {
    /// The stored field path for this order key.
    pub fn field_path(&self) -> &'static str {
        match self {
            OrderField::VoteCount => "voteCount",
            OrderField::CreatedAt => "createdAt",
            OrderField::Title => "title",
        }
    }
}

/// Direction of an order-by clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

/// One remote page query.
///
/// Combines an optional equality filter on the event tag, an order-by
/// clause, an optional start-after cursor, and a page size limit — the four
/// constraints every backend must honor together in a single query.
#[derive(Debug, Clone)]
pub struct PageQuery {
    /// Equality filter on the `type` field, if any.
    pub event_tag: Option<i64>,
    /// Field to order by.
    pub order_by: OrderField,
    /// Order direction.
    pub direction: OrderDirection,
    /// Resume after this cursor; `None` fetches the first page.
    pub start_after: Option<PageCursor>,
    /// Maximum number of artworks to return.
    pub limit: usize,
}

/// One fetched page of artworks.
#[derive(Debug, Clone)]
pub struct ArtworkPage {
    /// Artworks in remote order.
    pub artworks: Vec<Artwork>,
    /// Cursor referencing the last artwork of the page; `None` when the page
    /// came back empty.
    pub next_cursor: Option<PageCursor>,
}

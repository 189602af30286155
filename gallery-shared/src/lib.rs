//! # Gallery Shared
//! This crate defines shared data structures and types used across the
//! gallery application. It includes common definitions for artworks,
//! session identities, sort modes, and pagination cursors.
pub mod types;

pub use types::{Artwork, Identity, NewArtwork, PageCursor, SortMode};

mod artwork;
mod cursor;
mod identity;
mod sort_mode;

pub use artwork::{Artwork, NewArtwork};
pub use cursor::PageCursor;
pub use identity::Identity;
pub use sort_mode::SortMode;

//! This module defines and re-exports the interfaces for the gallery repository.
//! It serves as a central point for accessing traits related to data interaction.
mod artworks;

pub use artworks::ArtworkRepository;

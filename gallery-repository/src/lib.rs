//! # Gallery Repository
//! This crate provides traits and implementations for interacting with the
//! remote artwork collection. It includes definitions for errors, interfaces,
//! a concrete implementation for Firestore, and an in-memory implementation
//! for tests and local development.
pub mod errors;
pub mod firestore;
pub mod interfaces;
pub mod memory;
pub mod types;

pub use errors::ArtworkRepositoryError;
pub use firestore::{FirestoreConfig, FirestoreProvider};
pub use interfaces::ArtworkRepository;
pub use memory::MemoryRepository;
pub use types::{ArtworkPage, OrderDirection, OrderField, PageQuery};

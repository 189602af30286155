//! Configuration and dependency initialization for the gallery application.

mod dependencies;

pub use dependencies::{Backend, Dependencies};

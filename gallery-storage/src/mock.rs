//! Mock image store for testing and local development.
//!
//! The `MockImageStore` keeps every upload in memory and hands back a
//! synthetic `memory://` URL, allowing tests to run without network access
//! and to assert on what was written.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{ImageStore, Result};

/// One object captured by the mock store.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Mock [`ImageStore`] backed by an in-memory list of uploads.
#[derive(Default)]
pub struct MockImageStore {
    uploads: Mutex<Vec<StoredObject>>,
}

impl MockImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything uploaded so far.
    pub fn uploads(&self) -> Vec<StoredObject> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for MockImageStore {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        self.uploads.lock().unwrap().push(StoredObject {
            key: key.to_string(),
            bytes,
            content_type: content_type.to_string(),
        });
        Ok(format!("memory://{key}"))
    }
}

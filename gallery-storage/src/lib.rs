//! Blob store client for uploading gallery images.
//!
//! This crate provides:
//! - [`StorageSource`] config enum for choosing between mock and live clients
//! - [`ImageStore`] trait for abstracting the blob store
//! - [`FirebaseStorageClient`] production client that uploads to a Firebase
//!   Storage bucket and returns a durable download URL
//! - [`MockImageStore`] mock client for testing without network access
//!
//! ## Usage with StorageSource (Recommended)
//!
//! ```ignore
//! use gallery_storage::StorageSource;
//!
//! // Development/testing: keep uploads in memory
//! let store = StorageSource::mock().into_store();
//!
//! // Production: upload to a live bucket
//! let store = StorageSource::live("my-project.appspot.com", None).into_store();
//!
//! let url = store.upload("artworks/abc.png", bytes, "image/png").await?;
//! ```

mod mock;

pub use mock::{MockImageStore, StoredObject};

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("upload rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("malformed upload response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Trait for uploading image bytes to a blob store.
///
/// This trait abstracts the blob store to enable dependency injection and
/// mocking for testing. Production code uses [`FirebaseStorageClient`], while
/// tests can use [`MockImageStore`].
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Uploads `bytes` under `key` and returns a durable download URL.
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String>;
}

/// Production client that uploads to a Firebase Storage bucket.
///
/// # Example
///
/// ```ignore
/// use gallery_storage::FirebaseStorageClient;
///
/// let client = FirebaseStorageClient::new("my-project.appspot.com");
/// let url = client.upload("artworks/abc.png", bytes, "image/png").await?;
/// ```
pub struct FirebaseStorageClient {
    bucket: String,
    bearer_token: Option<String>,
    client: ReqwestClient,
}

const BASE_URL: &str = "https://firebasestorage.googleapis.com/v0";

impl FirebaseStorageClient {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            bearer_token: None,
            client: ReqwestClient::new(),
        }
    }

    /// Attach a bearer token to every upload request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

#[async_trait]
impl ImageStore for FirebaseStorageClient {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let upload_url = format!(
            "{}/b/{}/o?uploadType=media&name={}",
            BASE_URL,
            self.bucket,
            encode_object_name(key)
        );

        let mut request = self
            .client
            .post(&upload_url)
            .header("Content-Type", content_type)
            .body(bytes);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: serde_json::Value = response.json().await?;
        let name = body
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| StorageError::MalformedResponse("missing object name".to_string()))?;

        let mut url = format!(
            "{}/b/{}/o/{}?alt=media",
            BASE_URL,
            self.bucket,
            encode_object_name(name)
        );
        if let Some(token) = body.get("downloadTokens").and_then(|v| v.as_str()) {
            if !token.is_empty() {
                url.push_str("&token=");
                url.push_str(token);
            }
        }
        Ok(url)
    }
}

/// Escapes an object name for use as one URL component.
///
/// Object keys are `<prefix>/<uuid>.<ext>`; the `/` must appear as `%2F` for
/// the storage API to treat the name as a single object.
fn encode_object_name(name: &str) -> String {
    name.replace('/', "%2F")
}

/// Configuration for the image storage backend.
///
/// Use this to explicitly choose between mock and live clients.
///
/// # Example
///
/// ```ignore
/// use gallery_storage::StorageSource;
///
/// let store = StorageSource::mock().into_store();
/// let store = StorageSource::live("my-project.appspot.com", None).into_store();
/// ```
#[derive(Debug, Clone)]
pub enum StorageSource {
    /// Keep uploads in memory and hand back synthetic URLs.
    Mock,
    /// Upload to a live Firebase Storage bucket.
    Live {
        /// The bucket name (e.g., "my-project.appspot.com")
        bucket: String,
        /// Optional bearer token for authenticated uploads.
        bearer_token: Option<String>,
    },
}

impl StorageSource {
    /// Create a mock storage source.
    pub fn mock() -> Self {
        Self::Mock
    }

    /// Create a live storage source for the given bucket.
    pub fn live(bucket: impl Into<String>, bearer_token: Option<String>) -> Self {
        Self::Live {
            bucket: bucket.into(),
            bearer_token,
        }
    }

    /// Create the appropriate ImageStore implementation.
    pub fn into_store(self) -> Box<dyn ImageStore> {
        match self {
            Self::Mock => Box::new(MockImageStore::new()),
            Self::Live {
                bucket,
                bearer_token,
            } => {
                let mut client = FirebaseStorageClient::new(bucket);
                if let Some(token) = bearer_token {
                    client = client.with_bearer_token(token);
                }
                Box::new(client)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_object_name_escapes_separators() {
        assert_eq!(
            encode_object_name("artworks/abc.png"),
            "artworks%2Fabc.png"
        );
        assert_eq!(encode_object_name("flat.png"), "flat.png");
    }
}

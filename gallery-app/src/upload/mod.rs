//! Upload service: validates a submission, stores the image bytes, and
//! creates the artwork document.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::errors::UploadError;
use gallery_repository::ArtworkRepository;
use gallery_shared::{Artwork, NewArtwork};
use gallery_storage::ImageStore;

/// Maximum accepted image size: 10 MiB.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// One upload submission, as received from the caller.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub title: String,
    pub author: String,
    /// Original file name; its extension is kept on the stored object key.
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Validates and persists new artwork submissions.
pub struct UploadService {
    repository: Arc<dyn ArtworkRepository>,
    store: Arc<dyn ImageStore>,
    /// Object key prefix, normally the collection name.
    prefix: String,
    /// Event tag stamped on new uploads.
    event_tag: Option<i64>,
}

impl UploadService {
    pub fn new(
        repository: Arc<dyn ArtworkRepository>,
        store: Arc<dyn ImageStore>,
        prefix: impl Into<String>,
        event_tag: Option<i64>,
    ) -> Self {
        Self {
            repository,
            store,
            prefix: prefix.into(),
            event_tag,
        }
    }

    /// Uploads the image and creates the artwork document.
    ///
    /// Validation failures reject the submission before any remote call. A
    /// failed blob upload leaves no document behind; a failed document
    /// creation surfaces after the blob was stored (the blob is not removed).
    pub async fn submit(&self, request: UploadRequest) -> Result<Artwork, UploadError> {
        Self::validate(&request)?;

        let UploadRequest {
            title,
            author,
            file_name,
            content_type,
            bytes,
        } = request;

        let key = self.object_key(&file_name);
        let image_url = self.store.upload(&key, bytes, &content_type).await?;

        let new_artwork = NewArtwork {
            title,
            author,
            image_url,
            event_tag: self.event_tag,
        };
        let artwork = self.repository.insert_artwork(&new_artwork).await?;
        info!(artwork_id = %artwork.id, title = %artwork.title, "artwork uploaded");
        Ok(artwork)
    }

    /// Validates the submission without touching any remote service.
    fn validate(request: &UploadRequest) -> Result<(), UploadError> {
        if request.title.trim().is_empty() {
            return Err(UploadError::validation("title must not be empty"));
        }
        if request.author.trim().is_empty() {
            return Err(UploadError::validation("author must not be empty"));
        }
        if request.bytes.is_empty() {
            return Err(UploadError::validation("an image file is required"));
        }
        if request.bytes.len() > MAX_IMAGE_BYTES {
            return Err(UploadError::validation("image exceeds the 10 MiB limit"));
        }
        if !request.content_type.starts_with("image/") {
            return Err(UploadError::validation(format!(
                "unsupported content type: {}",
                request.content_type
            )));
        }
        Ok(())
    }

    /// Derives a collision-free object key, keeping the submitted file
    /// extension.
    fn object_key(&self, file_name: &str) -> String {
        let id = Uuid::new_v4();
        match file_name.rsplit_once('.') {
            Some((_, extension)) if !extension.is_empty() => {
                format!("{}/{}.{}", self.prefix, id, extension)
            }
            _ => format!("{}/{}", self.prefix, id),
        }
    }
}

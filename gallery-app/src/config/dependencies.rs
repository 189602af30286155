//! Dependency initialization and wiring for the gallery application.

use std::env;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::http::AppState;
use crate::query::{GalleryView, QueryPlanner, DEFAULT_PAGE_SIZE};
use crate::upload::UploadService;
use crate::vote::VoteCoordinator;
use crate::GalleryError;
use gallery_identity::{IdentityProvider, IdentitySource};
use gallery_repository::{ArtworkRepository, FirestoreConfig, FirestoreProvider, MemoryRepository};
use gallery_shared::Identity;
use gallery_storage::{ImageStore, StorageSource};

/// Default collection name, also used as the object key prefix.
const DEFAULT_COLLECTION: &str = "artworks";

/// Default bind address for the HTTP API.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Event tag stamped on new uploads when none is configured.
const DEFAULT_UPLOAD_EVENT_TAG: i64 = 2;

/// Which backend stack to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// In-memory stores, no network access. The default.
    Memory,
    /// Live Firebase services.
    Firebase,
}

impl Backend {
    /// Parse the backend selection from environment variables.
    ///
    /// Valid values: "memory" or "firebase" (case-insensitive).
    /// Defaults to "memory" if not set or invalid.
    fn from_env() -> Self {
        match env::var("GALLERY_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => Self::Memory,
            "firebase" => Self::Firebase,
            _ => {
                warn!("Invalid GALLERY_BACKEND, defaulting to 'memory'");
                Self::Memory
            }
        }
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Shared state for the HTTP layer, fully wired.
    pub state: AppState,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `GALLERY_BACKEND`: Backend stack - "memory" or "firebase" (default: memory)
    /// - `FIREBASE_PROJECT_ID`: Firestore project id (firebase backend only)
    /// - `FIREBASE_API_KEY`: API key for anonymous sign-in (firebase backend only)
    /// - `FIREBASE_STORAGE_BUCKET`: Storage bucket name (firebase backend only)
    /// - `GALLERY_COLLECTION`: Collection and object key prefix (default: artworks)
    /// - `GALLERY_PAGE_SIZE`: Artworks per page (default: 8)
    /// - `GALLERY_UPLOAD_EVENT_TAG`: Event tag stamped on uploads (default: 2)
    /// - `GALLERY_BIND_ADDR`: HTTP bind address (default: 127.0.0.1:3000)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(GalleryError)` - If required configuration is missing or the
    ///   anonymous session cannot be established
    pub async fn new() -> Result<Self, GalleryError> {
        let backend = Backend::from_env();
        let collection =
            env::var("GALLERY_COLLECTION").unwrap_or_else(|_| DEFAULT_COLLECTION.to_string());
        let page_size = env::var("GALLERY_PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let event_tag = env::var("GALLERY_UPLOAD_EVENT_TAG")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(DEFAULT_UPLOAD_EVENT_TAG);
        let bind_addr =
            env::var("GALLERY_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        info!(
            ?backend,
            collection = %collection,
            page_size,
            event_tag,
            "Initializing dependencies"
        );

        match backend {
            Backend::Memory => {
                let provider = IdentitySource::mock().into_provider();
                let session = provider.sign_in().await?;
                let repository: Arc<dyn ArtworkRepository> = Arc::new(MemoryRepository::new());
                let store: Arc<dyn ImageStore> = Arc::from(StorageSource::mock().into_store());
                Ok(Self::assemble(
                    repository,
                    store,
                    session.identity,
                    collection,
                    page_size,
                    event_tag,
                    bind_addr,
                ))
            }
            Backend::Firebase => {
                let project_id = require_env("FIREBASE_PROJECT_ID")?;
                let api_key = require_env("FIREBASE_API_KEY")?;
                let bucket = require_env("FIREBASE_STORAGE_BUCKET")?;

                // The session comes first: its token authenticates both the
                // document store and the blob store.
                let provider = IdentitySource::live(api_key).into_provider();
                let session = provider.sign_in().await?;
                info!(identity = %session.identity, "Anonymous session established");

                let config = FirestoreConfig::new(project_id, collection.clone())
                    .with_bearer_token(session.id_token.clone());
                let repository: Arc<dyn ArtworkRepository> =
                    Arc::new(FirestoreProvider::new(config));
                let store: Arc<dyn ImageStore> = Arc::from(
                    StorageSource::live(bucket, Some(session.id_token.clone())).into_store(),
                );
                Ok(Self::assemble(
                    repository,
                    store,
                    session.identity,
                    collection,
                    page_size,
                    event_tag,
                    bind_addr,
                ))
            }
        }
    }

    fn assemble(
        repository: Arc<dyn ArtworkRepository>,
        store: Arc<dyn ImageStore>,
        identity: Identity,
        collection: String,
        page_size: usize,
        event_tag: i64,
        bind_addr: String,
    ) -> Self {
        let planner = Arc::new(QueryPlanner::new(Arc::clone(&repository)));
        let coordinator = Arc::new(VoteCoordinator::new(Arc::clone(&repository)));
        let uploader = Arc::new(UploadService::new(
            repository,
            store,
            collection,
            Some(event_tag),
        ));
        let view = Arc::new(Mutex::new(GalleryView::new(page_size)));

        Self {
            state: AppState {
                view,
                planner,
                coordinator,
                uploader,
                identity,
            },
            bind_addr,
        }
    }
}

fn require_env(name: &str) -> Result<String, GalleryError> {
    env::var(name)
        .map_err(|_| GalleryError::config(format!("{name} is required for the firebase backend")))
}

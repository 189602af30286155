//! HTTP API for the gallery: a thin JSON surface over the vote coordinator,
//! the query planner, and the upload service.
//!
//! The shared gallery view sits behind one async mutex, so user-triggered
//! actions (vote, sort change, load-more) are serialized exactly like the
//! original single-page client serialized them by disabling controls while a
//! request was in flight.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::errors::{QueryError, UploadError, VoteError};
use crate::query::{GalleryView, LoadMoreOutcome, QueryPlanner};
use crate::upload::{UploadRequest, UploadService};
use crate::vote::{VoteCoordinator, VoteOutcome};
use gallery_shared::{Artwork, Identity, SortMode};

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub view: Arc<Mutex<GalleryView>>,
    pub planner: Arc<QueryPlanner>,
    pub coordinator: Arc<VoteCoordinator>,
    pub uploader: Arc<UploadService>,
    /// The bootstrapped anonymous session identity.
    pub identity: Identity,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/gallery", get(get_gallery))
        .route("/api/gallery/mode", put(set_mode))
        .route("/api/gallery/search", put(set_search))
        .route("/api/gallery/load-more", post(load_more))
        .route("/api/artworks", post(upload_artwork))
        .route("/api/artworks/:id/vote", post(cast_vote))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

fn query_error(error: QueryError) -> ApiError {
    error!(error = %error, "gallery query failed");
    api_error(StatusCode::BAD_GATEWAY, error.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GalleryResponse {
    artworks: Vec<Artwork>,
    mode: SortMode,
    total: u64,
    has_more: bool,
    can_load_more: bool,
    search_term: String,
}

impl GalleryResponse {
    fn from_view(view: &GalleryView) -> Self {
        Self {
            artworks: view.visible().into_iter().cloned().collect(),
            mode: view.mode(),
            total: view.total(),
            has_more: view.has_more(),
            can_load_more: view.can_load_more(),
            search_term: view.search_term().to_string(),
        }
    }
}

async fn get_gallery(State(state): State<AppState>) -> Json<GalleryResponse> {
    let view = state.view.lock().await;
    Json(GalleryResponse::from_view(&view))
}

#[derive(Debug, Deserialize)]
struct ModeRequest {
    mode: SortMode,
}

async fn set_mode(
    State(state): State<AppState>,
    Json(request): Json<ModeRequest>,
) -> Result<Json<GalleryResponse>, ApiError> {
    let mut view = state.view.lock().await;
    view.set_mode(request.mode, &state.planner)
        .await
        .map_err(query_error)?;
    Ok(Json(GalleryResponse::from_view(&view)))
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    term: String,
}

async fn set_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Json<GalleryResponse> {
    let mut view = state.view.lock().await;
    view.set_search_term(request.term);
    Json(GalleryResponse::from_view(&view))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoadMoreResponse {
    outcome: &'static str,
    appended: usize,
    has_more: bool,
}

async fn load_more(
    State(state): State<AppState>,
) -> Result<Json<LoadMoreResponse>, ApiError> {
    let mut view = state.view.lock().await;
    let outcome = view.load_more(&state.planner).await.map_err(query_error)?;
    let (outcome, appended) = match outcome {
        LoadMoreOutcome::Loaded(appended) => ("loaded", appended),
        LoadMoreOutcome::Exhausted => ("exhausted", 0),
        LoadMoreOutcome::Suppressed => ("suppressed", 0),
    };
    Ok(Json(LoadMoreResponse {
        outcome,
        appended,
        has_more: view.has_more(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoteResponse {
    outcome: &'static str,
    artworks: Vec<Artwork>,
}

async fn cast_vote(
    State(state): State<AppState>,
    Path(artwork_id): Path<String>,
) -> Result<Json<VoteResponse>, ApiError> {
    let mut view = state.view.lock().await;
    let mode = view.mode();
    let result = state
        .coordinator
        .cast_vote(&artwork_id, &state.identity, view.artworks_mut(), mode)
        .await;

    let outcome = match result {
        Ok(VoteOutcome::Applied) => "applied",
        Ok(VoteOutcome::AlreadyVoted) => "already_voted",
        Err(VoteError::InvalidSession) => {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "invalid session, reload the page",
            ));
        }
        Err(VoteError::UnknownArtwork(id)) => {
            return Err(api_error(
                StatusCode::NOT_FOUND,
                format!("unknown artwork: {id}"),
            ));
        }
        Err(error @ VoteError::RemoteUpdate(_)) => {
            error!(error = %error, artwork_id = %artwork_id, "vote failed");
            return Err(api_error(
                StatusCode::BAD_GATEWAY,
                "vote failed, please try again",
            ));
        }
    };

    Ok(Json(VoteResponse {
        outcome,
        artworks: view.visible().into_iter().cloned().collect(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadBody {
    title: String,
    author: String,
    file_name: String,
    content_type: String,
    /// Image bytes, base64-encoded.
    data: String,
}

async fn upload_artwork(
    State(state): State<AppState>,
    Json(body): Json<UploadBody>,
) -> Result<(StatusCode, Json<Artwork>), ApiError> {
    let bytes = BASE64
        .decode(&body.data)
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, "image data is not valid base64"))?;

    let request = UploadRequest {
        title: body.title,
        author: body.author,
        file_name: body.file_name,
        content_type: body.content_type,
        bytes,
    };

    match state.uploader.submit(request).await {
        Ok(artwork) => Ok((StatusCode::CREATED, Json(artwork))),
        Err(UploadError::Validation(message)) => {
            Err(api_error(StatusCode::BAD_REQUEST, message))
        }
        Err(error) => {
            error!(error = %error, "upload failed");
            Err(api_error(
                StatusCode::BAD_GATEWAY,
                "upload failed, please try again",
            ))
        }
    }
}

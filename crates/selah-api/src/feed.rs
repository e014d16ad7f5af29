use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use selah_types::api::{CreatePostRequest, FeedPost, FeedQuery};

use crate::error::ApiError;
use crate::middleware::Viewer;
use crate::state::AppState;

/// GET /feed. Never fails; a missing session or a backend error yields `[]`.
/// Pass the last post's `created_at` as `before` for the next page.
pub async fn get_feed(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Query(query): Query<FeedQuery>,
) -> Json<Vec<FeedPost>> {
    Json(state.feed.public_feed(&viewer, query.into()).await)
}

/// GET /groups/{group_id}/feed
pub async fn get_group_feed(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Extension(viewer): Extension<Viewer>,
    Query(query): Query<FeedQuery>,
) -> Json<Vec<FeedPost>> {
    Json(state.feed.group_feed(&viewer, group_id, query.into()).await)
}

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Json(req): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.feed.create_post(&viewer, req).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

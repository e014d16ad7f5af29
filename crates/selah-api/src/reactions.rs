use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use selah_types::models::Reaction;

use crate::error::ApiError;
use crate::middleware::Viewer;
use crate::state::AppState;

/// POST /posts/{post_id}/like
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(viewer): Extension<Viewer>,
) -> Result<impl IntoResponse, ApiError> {
    let liked = state.feed.toggle_reaction(&viewer, post_id, Reaction::Like).await?;
    Ok(Json(serde_json::json!({ "liked": liked })))
}

/// POST /posts/{post_id}/prayer
pub async fn toggle_prayer(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Extension(viewer): Extension<Viewer>,
) -> Result<impl IntoResponse, ApiError> {
    let prayed = state.feed.toggle_reaction(&viewer, post_id, Reaction::Prayer).await?;
    Ok(Json(serde_json::json!({ "prayed": prayed })))
}

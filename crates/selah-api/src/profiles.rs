use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use selah_feed::FeedError;

use crate::error::ApiError;
use crate::middleware::Viewer;
use crate::state::AppState;

/// GET /profiles/{user_id}: merged identity of one account.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .feed
        .author_profile(user_id)
        .await?
        .ok_or(FeedError::NotFound)?;
    Ok(Json(profile))
}

/// POST /users/{user_id}/shield: toggle the viewer's shield on another account.
pub async fn toggle_shield(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(viewer): Extension<Viewer>,
) -> Result<impl IntoResponse, ApiError> {
    let shielded = state.feed.toggle_shield(&viewer, user_id).await?;
    Ok(Json(serde_json::json!({ "shielded": shielded })))
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use selah_feed::FeedError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Feed(#[from] FeedError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Feed(FeedError::Unauthenticated) => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Feed(FeedError::NotFound) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Feed(FeedError::Invalid(_)) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Feed(FeedError::Backend(e)) => {
                error!("Backend error: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

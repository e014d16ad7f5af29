use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::debug;
use uuid::Uuid;

use selah_feed::SessionSource;
use selah_types::api::Claims;

use crate::state::AppState;

/// The account making the request, if its bearer token checked out.
#[derive(Debug, Clone, Copy)]
pub struct Viewer(pub Option<Uuid>);

#[async_trait]
impl SessionSource for Viewer {
    async fn viewer(&self) -> anyhow::Result<Option<Uuid>> {
        Ok(self.0)
    }
}

/// Extract and validate a JWT from the Authorization header.
fn decode_bearer(headers: &HeaderMap, secret: &str) -> Option<Claims> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?
        .strip_prefix("Bearer ")?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| debug!("Rejected bearer token: {}", e))
    .ok()
    .map(|data| data.claims)
}

/// Attach a `Viewer`, which is empty when no valid token is present.
pub async fn optional_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let viewer = decode_bearer(req.headers(), &state.jwt_secret).map(|c| c.sub);
    req.extensions_mut().insert(Viewer(viewer));
    next.run(req).await
}

/// Reject requests without a valid token; otherwise attach the `Viewer`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let claims = decode_bearer(req.headers(), &state.jwt_secret).ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(Viewer(Some(claims.sub)));
    Ok(next.run(req).await)
}

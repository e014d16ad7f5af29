pub mod error;
pub mod feed;
pub mod middleware;
pub mod profiles;
pub mod reactions;
pub mod state;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::middleware::{optional_auth, require_auth};
use crate::state::AppState;

/// All HTTP routes. Feed reads work without a session; everything else
/// requires a bearer token.
pub fn router(state: AppState) -> Router {
    let open_routes = Router::new()
        .route("/feed", get(feed::get_feed))
        .route("/groups/{group_id}/feed", get(feed::get_group_feed))
        .layer(from_fn_with_state(state.clone(), optional_auth));

    let protected_routes = Router::new()
        .route("/posts", post(feed::create_post))
        .route("/posts/{post_id}/like", post(reactions::toggle_like))
        .route("/posts/{post_id}/prayer", post(reactions::toggle_prayer))
        .route("/profiles/{user_id}", get(profiles::get_profile))
        .route("/users/{user_id}/shield", post(profiles::toggle_shield))
        .layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(open_routes)
        .merge(protected_routes)
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::{Duration, Utc};
    use http_body_util::BodyExt;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use selah_db::{Database, SqliteBackend};
    use selah_feed::{FeedService, PagePolicy};
    use selah_types::api::Claims;

    use super::*;
    use crate::state::AppStateInner;

    const SECRET: &str = "test-secret";

    fn test_state() -> AppState {
        let db = Arc::new(Database::open_in_memory().unwrap());
        Arc::new(AppStateInner {
            feed: FeedService::new(SqliteBackend::new(db), PagePolicy::default()),
            jwt_secret: SECRET.into(),
        })
    }

    fn token(user: Uuid) -> String {
        let claims = Claims {
            sub: user,
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    fn request(method: &str, uri: &str, user: Option<Uuid>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token(user)));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, Value) {
        let res = router(state.clone()).oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn feed_without_session_is_empty_list() {
        let state = test_state();
        let (status, body) = send(&state, request("GET", "/feed", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn protected_routes_require_token() {
        let state = test_state();
        let uri = format!("/posts/{}/like", Uuid::new_v4());
        let (status, _) = send(&state, request("POST", &uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let forged = Request::builder()
            .method("POST")
            .uri(&uri)
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&state, forged).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn post_like_and_read_back() {
        let state = test_state();
        let viewer = Uuid::new_v4();

        let (status, created) = send(
            &state,
            request("POST", "/posts", Some(viewer), Some(json!({ "content": "Hello" }))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let post_id = created["id"].as_str().unwrap().to_string();

        let (status, liked) = send(
            &state,
            request("POST", &format!("/posts/{}/like", post_id), Some(viewer), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(liked, json!({ "liked": true }));

        let (_, feed) = send(&state, request("GET", "/feed", Some(viewer), None)).await;
        assert_eq!(feed[0]["content"], "Hello");
        assert_eq!(feed[0]["like_count"], 1);
        assert_eq!(feed[0]["liked"], true);
        assert_eq!(feed[0]["prayed"], false);
    }

    #[tokio::test]
    async fn liking_unknown_post_is_not_found() {
        let state = test_state();
        let uri = format!("/posts/{}/prayer", Uuid::new_v4());
        let (status, _) = send(&state, request("POST", &uri, Some(Uuid::new_v4()), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_post_is_bad_request() {
        let state = test_state();
        let (status, body) = send(
            &state,
            request("POST", "/posts", Some(Uuid::new_v4()), Some(json!({ "content": "  " }))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("empty"));
    }

    #[tokio::test]
    async fn malformed_cursor_is_bad_request() {
        let state = test_state();
        let (status, _) = send(
            &state,
            request("GET", "/feed?before=yesterday", Some(Uuid::new_v4()), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn shielding_hides_posts_both_ways() {
        let state = test_state();
        let viewer = Uuid::new_v4();
        let author = Uuid::new_v4();

        send(&state, request("POST", "/posts", Some(author), Some(json!({ "content": "Hi" })))).await;
        send(&state, request("POST", "/posts", Some(viewer), Some(json!({ "content": "Mine" })))).await;

        let (_, feed) = send(&state, request("GET", "/feed", Some(viewer), None)).await;
        assert_eq!(feed.as_array().unwrap().len(), 2);

        let (status, body) = send(
            &state,
            request("POST", &format!("/users/{}/shield", author), Some(viewer), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "shielded": true }));

        let (_, feed) = send(&state, request("GET", "/feed", Some(viewer), None)).await;
        assert_eq!(feed.as_array().unwrap().len(), 1);
        assert_eq!(feed[0]["content"], "Mine");

        let (_, feed) = send(&state, request("GET", "/feed", Some(author), None)).await;
        assert_eq!(feed.as_array().unwrap().len(), 1);
        assert_eq!(feed[0]["content"], "Hi");
    }

    #[tokio::test]
    async fn unknown_profile_is_not_found() {
        let state = test_state();
        let uri = format!("/profiles/{}", Uuid::new_v4());
        let (status, _) = send(&state, request("GET", &uri, Some(Uuid::new_v4()), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_is_open() {
        let state = test_state();
        let res = router(state).oneshot(request("GET", "/health", None, None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}

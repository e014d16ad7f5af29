use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Post;

// -- JWT Claims --

/// Bearer token claims issued by the auth provider. Only `sub` identifies
/// the viewer; the service never issues tokens itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
}

// -- Feed --

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<u32>,
    /// Cursor: `created_at` of the oldest post on the previous page.
    pub before: Option<DateTime<Utc>>,
}

/// Author identity merged from base and verified profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub profile_photo_url: String,
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPost {
    #[serde(flatten)]
    pub post: Post,
    pub author: Author,
    pub like_count: usize,
    pub prayer_count: usize,
    pub comment_count: usize,
    pub share_count: usize,
    pub liked: bool,
    pub prayed: bool,
}

// -- Posts --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub audio_url: Option<String>,
    pub link_url: Option<String>,
    pub scripture_reference: Option<String>,
    pub group_id: Option<Uuid>,
    pub shared_post_id: Option<Uuid>,
}

// -- Profiles --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorProfile {
    #[serde(flatten)]
    pub author: Author,
    pub ministry_name: Option<String>,
    pub cover_photo_url: Option<String>,
    pub follower_count: i64,
    pub following_count: i64,
}

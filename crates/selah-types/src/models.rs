use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A post as stored by the backend, before any enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    /// Author account id.
    pub user_id: Uuid,
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub audio_url: Option<String>,
    pub link_url: Option<String>,
    pub scripture_reference: Option<String>,
    pub group_id: Option<Uuid>,
    pub shared_post_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a post. Timestamps and id are assigned on insert.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub user_id: Uuid,
    pub content: String,
    pub images: Vec<String>,
    pub audio_url: Option<String>,
    pub link_url: Option<String>,
    pub scripture_reference: Option<String>,
    pub group_id: Option<Uuid>,
    pub shared_post_id: Option<Uuid>,
}

/// One identity row. Base profiles and verified profiles share this shape;
/// any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_photo_url: Option<String>,
}

/// A row of `verified_profiles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    #[serde(flatten)]
    pub identity: Identity,
    pub ministry_name: Option<String>,
    pub cover_photo_url: Option<String>,
    pub follower_count: i64,
    pub following_count: i64,
}

/// The four interaction relations attached to posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Like,
    Prayer,
    Comment,
    Share,
}

/// Interactions a viewer can toggle on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    Like,
    Prayer,
}

impl From<Reaction> for InteractionKind {
    fn from(reaction: Reaction) -> Self {
        match reaction {
            Reaction::Like => Self::Like,
            Reaction::Prayer => Self::Prayer,
        }
    }
}

/// Existence of one interaction row: `user_id` acted on `post_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interaction {
    pub post_id: Uuid,
    pub user_id: Uuid,
}

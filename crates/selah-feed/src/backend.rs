use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use selah_types::models::{
    Identity, Interaction, InteractionKind, NewPost, Post, Reaction, VerifiedIdentity,
};

/// Parameters of one `posts` fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub limit: usize,
    /// Only posts with `created_at` strictly before this instant.
    pub before: Option<DateTime<Utc>>,
    /// Restrict to posts made inside one group.
    pub group_id: Option<Uuid>,
}

/// Data access the feed needs from the backend.
///
/// Reads are independent queries and the aggregator decides which of them
/// run concurrently. Toggles must check and write under one lock.
#[async_trait]
pub trait FeedBackend: Send + Sync {
    // -- Shields --

    /// Accounts that `user_id` has shielded.
    async fn shielded_by_user(&self, user_id: Uuid) -> Result<Vec<Uuid>>;

    /// Accounts that have shielded `user_id`.
    async fn users_shielding(&self, user_id: Uuid) -> Result<Vec<Uuid>>;

    /// Add the shield if absent, remove it if present, as one atomic step.
    /// Returns `true` if the shield now exists.
    async fn toggle_shield(&self, user_id: Uuid, shielded_user_id: Uuid) -> Result<bool>;

    // -- Posts --

    /// Posts ordered by `(created_at desc, id desc)`, at most `query.limit`.
    async fn recent_posts(&self, query: PostQuery) -> Result<Vec<Post>>;

    async fn post_exists(&self, post_id: Uuid) -> Result<bool>;

    async fn insert_post(&self, post: NewPost) -> Result<Post>;

    // -- Identity --

    async fn profiles(&self, ids: &[Uuid]) -> Result<Vec<Identity>>;

    async fn verified_profiles(&self, ids: &[Uuid]) -> Result<Vec<VerifiedIdentity>>;

    // -- Interactions --

    /// Interaction rows of `kind` for `post_ids`, optionally only those made by `actor`.
    async fn interactions(
        &self,
        kind: InteractionKind,
        post_ids: &[Uuid],
        actor: Option<Uuid>,
    ) -> Result<Vec<Interaction>>;

    /// Insert or delete `user_id`'s reaction on a post as one atomic step.
    /// Returns `true` if the reaction now exists.
    async fn toggle_reaction(&self, reaction: Reaction, post_id: Uuid, user_id: Uuid) -> Result<bool>;
}

/// Resolves the account id of whoever is making the request.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// `Ok(None)` means there is no session, which is not an error.
    async fn viewer(&self) -> Result<Option<Uuid>>;
}

#[async_trait]
impl SessionSource for Option<Uuid> {
    async fn viewer(&self) -> Result<Option<Uuid>> {
        Ok(*self)
    }
}

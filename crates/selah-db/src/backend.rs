use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use uuid::Uuid;

use selah_feed::{FeedBackend, PostQuery};
use selah_types::models::{
    Identity, Interaction, InteractionKind, NewPost, Post, Reaction, VerifiedIdentity,
};

use crate::models::{InteractionRow, PostRow, ProfileRow, VerifiedProfileRow};
use crate::{Database, TIMESTAMP_FORMAT, format_timestamp};

/// `FeedBackend` over the SQLite database. Every query runs on the
/// blocking pool so the async runtime is never stalled on the DB lock.
#[derive(Clone)]
pub struct SqliteBackend {
    db: Arc<Database>,
}

impl SqliteBackend {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| anyhow!("spawn_blocking join error: {}", e))?
    }
}

fn parse_uuid(value: &str) -> Result<Uuid> {
    value.parse().with_context(|| format!("Corrupt id '{}'", value))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|ndt| ndt.and_utc())
        .with_context(|| format!("Corrupt timestamp '{}'", value))
}

/// Stored timestamps keep microseconds. A finer cursor is rounded up so that
/// `created_at < cursor` still admits every row strictly older than it.
fn cursor_timestamp(before: DateTime<Utc>) -> String {
    let sub_micros = i64::from(before.timestamp_subsec_nanos() % 1_000);
    if sub_micros == 0 {
        format_timestamp(before)
    } else {
        format_timestamp(before + Duration::nanoseconds(1_000 - sub_micros))
    }
}

fn id_strings(ids: &[Uuid]) -> Vec<String> {
    ids.iter().map(Uuid::to_string).collect()
}

impl TryFrom<PostRow> for Post {
    type Error = anyhow::Error;

    fn try_from(row: PostRow) -> Result<Self> {
        Ok(Post {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            images: serde_json::from_str(&row.images)
                .with_context(|| format!("Corrupt images on post '{}'", row.id))?,
            content: row.content,
            audio_url: row.audio_url,
            link_url: row.link_url,
            scripture_reference: row.scripture_reference,
            group_id: row.group_id.as_deref().map(parse_uuid).transpose()?,
            shared_post_id: row.shared_post_id.as_deref().map(parse_uuid).transpose()?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

impl TryFrom<ProfileRow> for Identity {
    type Error = anyhow::Error;

    fn try_from(row: ProfileRow) -> Result<Self> {
        Ok(Identity {
            id: parse_uuid(&row.id)?,
            first_name: row.first_name,
            last_name: row.last_name,
            profile_photo_url: row.profile_photo_url,
        })
    }
}

impl TryFrom<VerifiedProfileRow> for VerifiedIdentity {
    type Error = anyhow::Error;

    fn try_from(row: VerifiedProfileRow) -> Result<Self> {
        Ok(VerifiedIdentity {
            identity: Identity {
                id: parse_uuid(&row.id)?,
                first_name: row.first_name,
                last_name: row.last_name,
                profile_photo_url: row.profile_photo_url,
            },
            ministry_name: row.ministry_name,
            cover_photo_url: row.cover_photo_url,
            follower_count: row.follower_count,
            following_count: row.following_count,
        })
    }
}

impl TryFrom<InteractionRow> for Interaction {
    type Error = anyhow::Error;

    fn try_from(row: InteractionRow) -> Result<Self> {
        Ok(Interaction {
            post_id: parse_uuid(&row.post_id)?,
            user_id: parse_uuid(&row.user_id)?,
        })
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = anyhow::Error>,
{
    rows.into_iter().map(T::try_from).collect()
}

fn parse_ids(ids: Vec<String>) -> Result<Vec<Uuid>> {
    ids.iter().map(|id| parse_uuid(id)).collect()
}

#[async_trait]
impl FeedBackend for SqliteBackend {
    async fn shielded_by_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let ids = self
            .blocking(move |db| db.get_shielded_by_user(&user_id.to_string()))
            .await?;
        parse_ids(ids)
    }

    async fn users_shielding(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let ids = self
            .blocking(move |db| db.get_users_shielding(&user_id.to_string()))
            .await?;
        parse_ids(ids)
    }

    async fn toggle_shield(&self, user_id: Uuid, shielded_user_id: Uuid) -> Result<bool> {
        let now = format_timestamp(Utc::now());
        self.blocking(move |db| {
            db.toggle_shield(&user_id.to_string(), &shielded_user_id.to_string(), &now)
        })
        .await
    }

    async fn recent_posts(&self, query: PostQuery) -> Result<Vec<Post>> {
        let before = query.before.map(cursor_timestamp);
        let group_id = query.group_id.map(|g| g.to_string());
        let rows = self
            .blocking(move |db| db.get_recent_posts(query.limit, before.as_deref(), group_id.as_deref()))
            .await?;
        convert_all(rows)
    }

    async fn post_exists(&self, post_id: Uuid) -> Result<bool> {
        self.blocking(move |db| db.post_exists(&post_id.to_string())).await
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        let now = format_timestamp(Utc::now());
        let row = PostRow {
            id: Uuid::new_v4().to_string(),
            user_id: post.user_id.to_string(),
            content: post.content,
            images: serde_json::to_string(&post.images)?,
            audio_url: post.audio_url,
            link_url: post.link_url,
            scripture_reference: post.scripture_reference,
            group_id: post.group_id.map(|g| g.to_string()),
            shared_post_id: post.shared_post_id.map(|s| s.to_string()),
            created_at: now.clone(),
            updated_at: now,
        };
        let row = self
            .blocking(move |db| {
                db.insert_post(&row)?;
                Ok(row)
            })
            .await?;
        Post::try_from(row)
    }

    async fn profiles(&self, ids: &[Uuid]) -> Result<Vec<Identity>> {
        let ids = id_strings(ids);
        let rows = self.blocking(move |db| db.get_profiles(&ids)).await?;
        convert_all(rows)
    }

    async fn verified_profiles(&self, ids: &[Uuid]) -> Result<Vec<VerifiedIdentity>> {
        let ids = id_strings(ids);
        let rows = self.blocking(move |db| db.get_verified_profiles(&ids)).await?;
        convert_all(rows)
    }

    async fn interactions(
        &self,
        kind: InteractionKind,
        post_ids: &[Uuid],
        actor: Option<Uuid>,
    ) -> Result<Vec<Interaction>> {
        let post_ids = id_strings(post_ids);
        let actor = actor.map(|a| a.to_string());
        let rows = self
            .blocking(move |db| db.get_interactions(kind, &post_ids, actor.as_deref()))
            .await?;
        convert_all(rows)
    }

    async fn toggle_reaction(&self, reaction: Reaction, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let id = Uuid::new_v4().to_string();
        let now = format_timestamp(Utc::now());
        self.blocking(move |db| {
            db.toggle_interaction(reaction.into(), &id, &post_id.to_string(), &user_id.to_string(), &now)
        })
        .await
    }
}

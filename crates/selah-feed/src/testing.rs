//! In-memory backend used by the unit tests of this crate.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use selah_types::models::{
    Identity, Interaction, InteractionKind, NewPost, Post, Reaction, VerifiedIdentity,
};

use crate::{FeedBackend, PostQuery, SessionSource};

pub fn post_at(user_id: Uuid, created_at: DateTime<Utc>) -> Post {
    Post {
        id: Uuid::new_v4(),
        user_id,
        content: String::new(),
        images: vec![],
        audio_url: None,
        link_url: None,
        scripture_reference: None,
        group_id: None,
        shared_post_id: None,
        created_at,
        updated_at: created_at,
    }
}

pub struct FailingSession;

#[async_trait]
impl SessionSource for FailingSession {
    async fn viewer(&self) -> Result<Option<Uuid>> {
        bail!("session lookup failed")
    }
}

#[derive(Default)]
struct State {
    posts: Vec<Post>,
    profiles: Vec<Identity>,
    verified: Vec<VerifiedIdentity>,
    interactions: Vec<(InteractionKind, Interaction)>,
    shields: Vec<(Uuid, Uuid)>,
    last_post_query: Option<PostQuery>,
}

/// Records how many queries were issued and can be switched into failing mode.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryBackend {
    pub fn add_post(&self, post: Post) {
        self.state.lock().unwrap().posts.push(post);
    }

    pub fn add_profile(&self, identity: Identity) {
        self.state.lock().unwrap().profiles.push(identity);
    }

    pub fn add_verified(&self, identity: VerifiedIdentity) {
        self.state.lock().unwrap().verified.push(identity);
    }

    pub fn add_interaction(&self, kind: InteractionKind, post_id: Uuid, user_id: Uuid) {
        self.state
            .lock()
            .unwrap()
            .interactions
            .push((kind, Interaction { post_id, user_id }));
    }

    pub fn add_shield(&self, user_id: Uuid, shielded_user_id: Uuid) {
        self.state.lock().unwrap().shields.push((user_id, shielded_user_id));
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }

    pub fn last_post_query(&self) -> Option<PostQuery> {
        self.state.lock().unwrap().last_post_query.clone()
    }

    fn enter(&self) -> Result<std::sync::MutexGuard<'_, State>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            bail!("backend unavailable");
        }
        Ok(self.state.lock().unwrap())
    }
}

#[async_trait]
impl FeedBackend for MemoryBackend {
    async fn shielded_by_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let state = self.enter()?;
        Ok(state.shields.iter().filter(|(u, _)| *u == user_id).map(|(_, s)| *s).collect())
    }

    async fn users_shielding(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let state = self.enter()?;
        Ok(state.shields.iter().filter(|(_, s)| *s == user_id).map(|(u, _)| *u).collect())
    }

    async fn toggle_shield(&self, user_id: Uuid, shielded_user_id: Uuid) -> Result<bool> {
        let mut state = self.enter()?;
        let row = (user_id, shielded_user_id);
        if state.shields.contains(&row) {
            state.shields.retain(|s| *s != row);
            Ok(false)
        } else {
            state.shields.push(row);
            Ok(true)
        }
    }

    async fn recent_posts(&self, query: PostQuery) -> Result<Vec<Post>> {
        let mut state = self.enter()?;
        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter(|p| query.before.is_none_or(|before| p.created_at < before))
            .filter(|p| query.group_id.is_none_or(|g| p.group_id == Some(g)))
            .cloned()
            .collect();
        posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        posts.truncate(query.limit);
        state.last_post_query = Some(query);
        Ok(posts)
    }

    async fn post_exists(&self, post_id: Uuid) -> Result<bool> {
        let state = self.enter()?;
        Ok(state.posts.iter().any(|p| p.id == post_id))
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        let mut state = self.enter()?;
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            user_id: post.user_id,
            content: post.content,
            images: post.images,
            audio_url: post.audio_url,
            link_url: post.link_url,
            scripture_reference: post.scripture_reference,
            group_id: post.group_id,
            shared_post_id: post.shared_post_id,
            created_at: now,
            updated_at: now,
        };
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn profiles(&self, ids: &[Uuid]) -> Result<Vec<Identity>> {
        let state = self.enter()?;
        Ok(state.profiles.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
    }

    async fn verified_profiles(&self, ids: &[Uuid]) -> Result<Vec<VerifiedIdentity>> {
        let state = self.enter()?;
        Ok(state
            .verified
            .iter()
            .filter(|p| ids.contains(&p.identity.id))
            .cloned()
            .collect())
    }

    async fn interactions(
        &self,
        kind: InteractionKind,
        post_ids: &[Uuid],
        actor: Option<Uuid>,
    ) -> Result<Vec<Interaction>> {
        let state = self.enter()?;
        Ok(state
            .interactions
            .iter()
            .filter(|(k, row)| *k == kind && post_ids.contains(&row.post_id))
            .filter(|(_, row)| actor.is_none_or(|a| row.user_id == a))
            .map(|(_, row)| *row)
            .collect())
    }

    async fn toggle_reaction(&self, reaction: Reaction, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut state = self.enter()?;
        let row = (InteractionKind::from(reaction), Interaction { post_id, user_id });
        if state.interactions.contains(&row) {
            state.interactions.retain(|r| *r != row);
            Ok(false)
        } else {
            state.interactions.push(row);
            Ok(true)
        }
    }
}

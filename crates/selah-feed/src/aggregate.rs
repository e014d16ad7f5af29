use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use selah_types::api::{FeedPost, FeedQuery};
use selah_types::models::{Interaction, InteractionKind, Post};

use crate::{FeedBackend, FeedService, PostQuery, SessionSource, count_by_key, merge_identity};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedRequest {
    pub limit: Option<u32>,
    pub before: Option<DateTime<Utc>>,
    pub group_id: Option<Uuid>,
}

impl From<FeedQuery> for FeedRequest {
    fn from(query: FeedQuery) -> Self {
        Self {
            limit: query.limit,
            before: query.before,
            group_id: None,
        }
    }
}

/// Result of one aggregation, keeping the reason when nothing is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    Page(Vec<FeedPost>),
    Empty(EmptyReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    NoSession,
    ZeroLimit,
    NoPosts,
    BackendFailed(String),
}

impl FeedOutcome {
    pub fn into_posts(self) -> Vec<FeedPost> {
        match self {
            Self::Page(posts) => posts,
            Self::Empty(_) => Vec::new(),
        }
    }
}

impl<B: FeedBackend> FeedService<B> {
    /// Home feed for the session's viewer, newest first.
    ///
    /// Returns an empty list when there is no session, when nothing matches,
    /// and when any backend query fails. The page may hold fewer than `limit`
    /// posts even if older posts exist (see [`crate::PagePolicy`]).
    pub async fn public_feed(&self, session: &impl SessionSource, request: FeedRequest) -> Vec<FeedPost> {
        self.aggregate(session, FeedRequest { group_id: None, ..request })
            .await
            .into_posts()
    }

    /// Feed restricted to posts made in `group_id`.
    pub async fn group_feed(
        &self,
        session: &impl SessionSource,
        group_id: Uuid,
        request: FeedRequest,
    ) -> Vec<FeedPost> {
        self.aggregate(session, FeedRequest { group_id: Some(group_id), ..request })
            .await
            .into_posts()
    }

    pub async fn aggregate(&self, session: &impl SessionSource, request: FeedRequest) -> FeedOutcome {
        let outcome = match self.try_aggregate(session, &request).await {
            Ok(outcome) => outcome,
            Err(e) => FeedOutcome::Empty(EmptyReason::BackendFailed(format!("{e:#}"))),
        };

        match &outcome {
            FeedOutcome::Page(posts) => debug!("Feed page with {} posts", posts.len()),
            FeedOutcome::Empty(EmptyReason::BackendFailed(e)) => warn!("Feed query failed: {}", e),
            FeedOutcome::Empty(reason) => debug!("Empty feed: {:?}", reason),
        }

        outcome
    }

    async fn try_aggregate(
        &self,
        session: &impl SessionSource,
        request: &FeedRequest,
    ) -> anyhow::Result<FeedOutcome> {
        let Some(viewer) = session.viewer().await? else {
            return Ok(FeedOutcome::Empty(EmptyReason::NoSession));
        };

        let page_size = self.policy.page_size(request.limit);
        if page_size == 0 {
            return Ok(FeedOutcome::Empty(EmptyReason::ZeroLimit));
        }

        // Shields hide content in both directions
        let (outgoing, incoming) = tokio::try_join!(
            self.backend.shielded_by_user(viewer),
            self.backend.users_shielding(viewer),
        )?;
        let excluded: HashSet<Uuid> = outgoing.into_iter().chain(incoming).collect();

        let candidates = self
            .backend
            .recent_posts(PostQuery {
                limit: self.policy.fetch_size(page_size),
                before: request.before,
                group_id: request.group_id,
            })
            .await?;

        let page: Vec<Post> = candidates
            .into_iter()
            .filter(|p| !excluded.contains(&p.user_id))
            .take(page_size)
            .collect();

        if page.is_empty() {
            return Ok(FeedOutcome::Empty(EmptyReason::NoPosts));
        }

        Ok(FeedOutcome::Page(self.enrich(viewer, page).await?))
    }

    /// Attach author identity, interaction counts and viewer flags to a page.
    pub(crate) async fn enrich(&self, viewer: Uuid, page: Vec<Post>) -> anyhow::Result<Vec<FeedPost>> {
        let mut author_ids: Vec<Uuid> = page.iter().map(|p| p.user_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let post_ids: Vec<Uuid> = page.iter().map(|p| p.id).collect();

        let backend = &self.backend;
        let (base, verified, likes, my_likes, prayers, my_prayers, comments, shares) = tokio::try_join!(
            backend.profiles(&author_ids),
            backend.verified_profiles(&author_ids),
            backend.interactions(InteractionKind::Like, &post_ids, None),
            backend.interactions(InteractionKind::Like, &post_ids, Some(viewer)),
            backend.interactions(InteractionKind::Prayer, &post_ids, None),
            backend.interactions(InteractionKind::Prayer, &post_ids, Some(viewer)),
            backend.interactions(InteractionKind::Comment, &post_ids, None),
            backend.interactions(InteractionKind::Share, &post_ids, None),
        )?;

        let base: HashMap<Uuid, _> = base.into_iter().map(|p| (p.id, p)).collect();
        let verified: HashMap<Uuid, _> = verified.into_iter().map(|p| (p.identity.id, p.identity)).collect();

        let by_post = |row: &Interaction| row.post_id;
        let like_counts = count_by_key(likes, by_post);
        let prayer_counts = count_by_key(prayers, by_post);
        let comment_counts = count_by_key(comments, by_post);
        let share_counts = count_by_key(shares, by_post);

        let liked: HashSet<Uuid> = my_likes.iter().map(by_post).collect();
        let prayed: HashSet<Uuid> = my_prayers.iter().map(by_post).collect();

        let count = |counts: &HashMap<Uuid, usize>, id: &Uuid| counts.get(id).copied().unwrap_or(0);

        let posts = page
            .into_iter()
            .map(|post| FeedPost {
                author: merge_identity(post.user_id, base.get(&post.user_id), verified.get(&post.user_id)),
                like_count: count(&like_counts, &post.id),
                prayer_count: count(&prayer_counts, &post.id),
                comment_count: count(&comment_counts, &post.id),
                share_count: count(&share_counts, &post.id),
                liked: liked.contains(&post.id),
                prayed: prayed.contains(&post.id),
                post,
            })
            .collect();

        Ok(posts)
    }
}

use tracing::{debug, info};
use uuid::Uuid;

use selah_types::api::{CreatePostRequest, FeedPost};
use selah_types::models::{NewPost, Reaction};

use crate::{FeedBackend, FeedError, FeedService, SessionSource, merge_identity};

const MAX_CONTENT_CHARS: usize = 5000;
const MAX_IMAGES: usize = 10;

async fn require_viewer(session: &impl SessionSource) -> Result<Uuid, FeedError> {
    session.viewer().await?.ok_or(FeedError::Unauthenticated)
}

/// Trim an optional text field; blank becomes `None`.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl<B: FeedBackend> FeedService<B> {
    /// Toggle the viewer's like or prayer on a post.
    /// Returns the new state: `true` if the row now exists.
    pub async fn toggle_reaction(
        &self,
        session: &impl SessionSource,
        post_id: Uuid,
        reaction: Reaction,
    ) -> Result<bool, FeedError> {
        let viewer = require_viewer(session).await?;

        if !self.backend.post_exists(post_id).await? {
            return Err(FeedError::NotFound);
        }

        let added = self.backend.toggle_reaction(reaction, post_id, viewer).await?;
        debug!(
            "{:?} {} post {} by {}",
            reaction,
            if added { "added to" } else { "removed from" },
            post_id,
            viewer
        );
        Ok(added)
    }

    /// Toggle the viewer's shield on `target`. Returns `true` if now shielded.
    pub async fn toggle_shield(&self, session: &impl SessionSource, target: Uuid) -> Result<bool, FeedError> {
        let viewer = require_viewer(session).await?;
        if viewer == target {
            return Err(FeedError::Invalid("cannot shield yourself".into()));
        }

        let shielded = self.backend.toggle_shield(viewer, target).await?;
        if shielded {
            info!("User {} shielded {}", viewer, target);
        } else {
            info!("User {} removed shield on {}", viewer, target);
        }
        Ok(shielded)
    }

    /// Create a post authored by the viewer and return it ready for display.
    pub async fn create_post(
        &self,
        session: &impl SessionSource,
        req: CreatePostRequest,
    ) -> Result<FeedPost, FeedError> {
        let viewer = require_viewer(session).await?;

        let content = req.content.trim().to_string();
        let images: Vec<String> = req
            .images
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();
        let audio_url = non_blank(req.audio_url);
        let link_url = non_blank(req.link_url);

        if content.chars().count() > MAX_CONTENT_CHARS {
            return Err(FeedError::Invalid(format!(
                "content exceeds {} characters",
                MAX_CONTENT_CHARS
            )));
        }
        if images.len() > MAX_IMAGES {
            return Err(FeedError::Invalid(format!("at most {} images", MAX_IMAGES)));
        }
        if content.is_empty() && images.is_empty() && audio_url.is_none() && link_url.is_none() {
            return Err(FeedError::Invalid("post is empty".into()));
        }
        if let Some(shared) = req.shared_post_id {
            if !self.backend.post_exists(shared).await? {
                return Err(FeedError::Invalid("shared post does not exist".into()));
            }
        }

        let post = self
            .backend
            .insert_post(NewPost {
                user_id: viewer,
                content,
                images,
                audio_url,
                link_url,
                scripture_reference: non_blank(req.scripture_reference),
                group_id: req.group_id,
                shared_post_id: req.shared_post_id,
            })
            .await?;
        info!("User {} created post {}", viewer, post.id);

        let ids = [viewer];
        let (base, verified) = tokio::try_join!(
            self.backend.profiles(&ids),
            self.backend.verified_profiles(&ids),
        )?;
        let author = merge_identity(
            viewer,
            base.first(),
            verified.first().map(|v| &v.identity),
        );

        Ok(FeedPost {
            post,
            author,
            like_count: 0,
            prayer_count: 0,
            comment_count: 0,
            share_count: 0,
            liked: false,
            prayed: false,
        })
    }
}

use uuid::Uuid;

use selah_types::api::{Author, AuthorProfile};
use selah_types::models::Identity;

use crate::{FeedBackend, FeedError, FeedService};

/// Merge the two identity rows of one account field by field.
///
/// A verified value wins when it is non-empty (names are compared after
/// trimming, the photo URL as stored), otherwise the base value is used,
/// otherwise `""`. `is_verified` is set iff a verified row exists.
pub fn merge_identity(id: Uuid, base: Option<&Identity>, verified: Option<&Identity>) -> Author {
    Author {
        id,
        first_name: pick(
            verified.and_then(|v| v.first_name.as_deref()).map(str::trim),
            base.and_then(|b| b.first_name.as_deref()),
        ),
        last_name: pick(
            verified.and_then(|v| v.last_name.as_deref()).map(str::trim),
            base.and_then(|b| b.last_name.as_deref()),
        ),
        profile_photo_url: pick(
            verified.and_then(|v| v.profile_photo_url.as_deref()),
            base.and_then(|b| b.profile_photo_url.as_deref()),
        ),
        is_verified: verified.is_some(),
    }
}

fn pick(verified: Option<&str>, base: Option<&str>) -> String {
    verified
        .filter(|v| !v.is_empty())
        .or(base)
        .unwrap_or_default()
        .to_string()
}

impl<B: FeedBackend> FeedService<B> {
    /// Merged identity of one account plus its verified-only fields.
    /// `None` when the account has neither a base nor a verified profile.
    pub async fn author_profile(&self, user_id: Uuid) -> Result<Option<AuthorProfile>, FeedError> {
        let ids = [user_id];
        let (base, verified) = tokio::try_join!(
            self.backend.profiles(&ids),
            self.backend.verified_profiles(&ids),
        )?;

        let base = base.into_iter().find(|p| p.id == user_id);
        let verified = verified.into_iter().find(|p| p.identity.id == user_id);

        if base.is_none() && verified.is_none() {
            return Ok(None);
        }

        let author = merge_identity(user_id, base.as_ref(), verified.as_ref().map(|v| &v.identity));
        let profile = match verified {
            Some(v) => AuthorProfile {
                author,
                ministry_name: v.ministry_name,
                cover_photo_url: v.cover_photo_url,
                follower_count: v.follower_count,
                following_count: v.following_count,
            },
            None => AuthorProfile {
                author,
                ministry_name: None,
                cover_photo_url: None,
                follower_count: 0,
                following_count: 0,
            },
        };

        Ok(Some(profile))
    }
}

//! Database row types: these map directly to SQLite rows.
//! Distinct from selah-types models; conversion happens in `backend`.

pub struct PostRow {
    pub id: String,
    pub user_id: String,
    pub content: String,
    /// JSON array of image URLs.
    pub images: String,
    pub audio_url: Option<String>,
    pub link_url: Option<String>,
    pub scripture_reference: Option<String>,
    pub group_id: Option<String>,
    pub shared_post_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub struct ProfileRow {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_photo_url: Option<String>,
}

pub struct VerifiedProfileRow {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_photo_url: Option<String>,
    pub ministry_name: Option<String>,
    pub cover_photo_url: Option<String>,
    pub follower_count: i64,
    pub following_count: i64,
}

pub struct InteractionRow {
    pub post_id: String,
    pub user_id: String,
}

use std::sync::Arc;

use selah_db::SqliteBackend;
use selah_feed::FeedService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub feed: FeedService<SqliteBackend>,
    /// Shared HS256 secret of the auth provider that issues bearer tokens.
    pub jwt_secret: String,
}

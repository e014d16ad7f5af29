use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE profiles (
                id                  TEXT PRIMARY KEY,
                first_name          TEXT,
                last_name           TEXT,
                profile_photo_url   TEXT
            );

            CREATE TABLE verified_profiles (
                id                  TEXT PRIMARY KEY,
                first_name          TEXT,
                last_name           TEXT,
                profile_photo_url   TEXT,
                ministry_name       TEXT,
                cover_photo_url     TEXT,
                follower_count      INTEGER NOT NULL DEFAULT 0,
                following_count     INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE posts (
                id                  TEXT PRIMARY KEY,
                user_id             TEXT NOT NULL,
                content             TEXT NOT NULL,
                images              TEXT NOT NULL DEFAULT '[]',
                audio_url           TEXT,
                link_url            TEXT,
                scripture_reference TEXT,
                group_id            TEXT,
                shared_post_id      TEXT REFERENCES posts(id) ON DELETE SET NULL,
                created_at          TEXT NOT NULL,
                updated_at          TEXT NOT NULL
            );

            CREATE INDEX idx_posts_created ON posts(created_at DESC, id DESC);
            CREATE INDEX idx_posts_group ON posts(group_id, created_at DESC);

            CREATE TABLE post_likes (
                id          TEXT PRIMARY KEY,
                post_id     TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                user_id     TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                UNIQUE(post_id, user_id)
            );

            CREATE TABLE post_prayers (
                id          TEXT PRIMARY KEY,
                post_id     TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                user_id     TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                UNIQUE(post_id, user_id)
            );

            CREATE TABLE post_comments (
                id          TEXT PRIMARY KEY,
                post_id     TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                user_id     TEXT NOT NULL,
                content     TEXT NOT NULL DEFAULT '',
                created_at  TEXT NOT NULL
            );

            CREATE TABLE post_shares (
                id          TEXT PRIMARY KEY,
                post_id     TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                user_id     TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );

            CREATE INDEX idx_post_likes_post ON post_likes(post_id);
            CREATE INDEX idx_post_prayers_post ON post_prayers(post_id);
            CREATE INDEX idx_post_comments_post ON post_comments(post_id);
            CREATE INDEX idx_post_shares_post ON post_shares(post_id);

            CREATE TABLE user_shields (
                user_id             TEXT NOT NULL,
                shielded_user_id    TEXT NOT NULL,
                created_at          TEXT NOT NULL,
                PRIMARY KEY (user_id, shielded_user_id)
            );

            CREATE INDEX idx_user_shields_target ON user_shields(shielded_user_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

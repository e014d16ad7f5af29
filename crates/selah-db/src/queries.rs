use crate::Database;
use crate::models::{InteractionRow, PostRow, ProfileRow, VerifiedProfileRow};
use anyhow::Result;
use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension, Row};
use selah_types::models::InteractionKind;

fn interaction_table(kind: InteractionKind) -> &'static str {
    match kind {
        InteractionKind::Like => "post_likes",
        InteractionKind::Prayer => "post_prayers",
        InteractionKind::Comment => "post_comments",
        InteractionKind::Share => "post_shares",
    }
}

/// `?start, ?start+1, ...` for an IN list of `count` values.
fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

const POST_COLUMNS: &str = "id, user_id, content, images, audio_url, link_url, \
     scripture_reference, group_id, shared_post_id, created_at, updated_at";

impl Database {
    // -- Shields --

    pub fn get_shielded_by_user(&self, user_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            query_ids(
                conn,
                "SELECT shielded_user_id FROM user_shields WHERE user_id = ?1",
                user_id,
            )
        })
    }

    pub fn get_users_shielding(&self, user_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            query_ids(
                conn,
                "SELECT user_id FROM user_shields WHERE shielded_user_id = ?1",
                user_id,
            )
        })
    }

    pub fn insert_shield(&self, user_id: &str, shielded_user_id: &str, created_at: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO user_shields (user_id, shielded_user_id, created_at) VALUES (?1, ?2, ?3)",
                (user_id, shielded_user_id, created_at),
            )?;
            Ok(())
        })
    }

    /// Toggle a shield: removes if exists, inserts if not.
    /// Returns `true` if the shield now exists.
    pub fn toggle_shield(&self, user_id: &str, shielded_user_id: &str, created_at: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM user_shields WHERE user_id = ?1 AND shielded_user_id = ?2",
                (user_id, shielded_user_id),
            )?;
            if removed > 0 {
                return Ok(false);
            }

            conn.execute(
                "INSERT INTO user_shields (user_id, shielded_user_id, created_at) VALUES (?1, ?2, ?3)",
                (user_id, shielded_user_id, created_at),
            )?;
            Ok(true)
        })
    }

    // -- Posts --

    /// Newest first with `id` as tie-break, so a `created_at` cursor pages stably.
    pub fn get_recent_posts(
        &self,
        limit: usize,
        before: Option<&str>,
        group_id: Option<&str>,
    ) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {POST_COLUMNS} FROM posts
                 WHERE (?1 IS NULL OR created_at < ?1)
                   AND (?2 IS NULL OR group_id = ?2)
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?3"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params![before, group_id, limit as i64], post_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn post_exists(&self, post_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let found: i64 = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM posts WHERE id = ?1)",
                [post_id],
                |row| row.get(0),
            )?;
            Ok(found != 0)
        })
    }

    pub fn insert_post(&self, post: &PostRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO posts ({POST_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                ),
                rusqlite::params![
                    post.id,
                    post.user_id,
                    post.content,
                    post.images,
                    post.audio_url,
                    post.link_url,
                    post.scripture_reference,
                    post.group_id,
                    post.shared_post_id,
                    post.created_at,
                    post.updated_at,
                ],
            )?;
            Ok(())
        })
    }

    // -- Profiles --

    pub fn upsert_profile(&self, profile: &ProfileRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO profiles (id, first_name, last_name, profile_photo_url)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    profile.id,
                    profile.first_name,
                    profile.last_name,
                    profile.profile_photo_url,
                ],
            )?;
            Ok(())
        })
    }

    pub fn upsert_verified_profile(&self, profile: &VerifiedProfileRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO verified_profiles
                    (id, first_name, last_name, profile_photo_url, ministry_name,
                     cover_photo_url, follower_count, following_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    profile.id,
                    profile.first_name,
                    profile.last_name,
                    profile.profile_photo_url,
                    profile.ministry_name,
                    profile.cover_photo_url,
                    profile.follower_count,
                    profile.following_count,
                ],
            )?;
            Ok(())
        })
    }

    /// Batch-fetch base profiles for a set of account ids.
    pub fn get_profiles(&self, ids: &[String]) -> Result<Vec<ProfileRow>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let sql = format!(
                "SELECT id, first_name, last_name, profile_photo_url FROM profiles WHERE id IN ({})",
                placeholders(1, ids.len())
            );
            let mut stmt = conn.prepare(&sql)?;
            let params: Vec<&dyn ToSql> = ids.iter().map(|id| id as &dyn ToSql).collect();

            let rows = stmt
                .query_map(params.as_slice(), |row| {
                    Ok(ProfileRow {
                        id: row.get(0)?,
                        first_name: row.get(1)?,
                        last_name: row.get(2)?,
                        profile_photo_url: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Batch-fetch verified profiles for a set of account ids.
    pub fn get_verified_profiles(&self, ids: &[String]) -> Result<Vec<VerifiedProfileRow>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let sql = format!(
                "SELECT id, first_name, last_name, profile_photo_url, ministry_name,
                        cover_photo_url, follower_count, following_count
                 FROM verified_profiles WHERE id IN ({})",
                placeholders(1, ids.len())
            );
            let mut stmt = conn.prepare(&sql)?;
            let params: Vec<&dyn ToSql> = ids.iter().map(|id| id as &dyn ToSql).collect();

            let rows = stmt
                .query_map(params.as_slice(), |row| {
                    Ok(VerifiedProfileRow {
                        id: row.get(0)?,
                        first_name: row.get(1)?,
                        last_name: row.get(2)?,
                        profile_photo_url: row.get(3)?,
                        ministry_name: row.get(4)?,
                        cover_photo_url: row.get(5)?,
                        follower_count: row.get(6)?,
                        following_count: row.get(7)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Interactions --

    /// Batch-fetch interaction rows of one kind for a set of posts,
    /// optionally only those made by `actor`.
    pub fn get_interactions(
        &self,
        kind: InteractionKind,
        post_ids: &[String],
        actor: Option<&str>,
    ) -> Result<Vec<InteractionRow>> {
        if post_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let mut sql = format!(
                "SELECT post_id, user_id FROM {} WHERE post_id IN ({})",
                interaction_table(kind),
                placeholders(1, post_ids.len())
            );
            let mut params: Vec<&dyn ToSql> = post_ids.iter().map(|id| id as &dyn ToSql).collect();
            if let Some(actor) = &actor {
                sql.push_str(&format!(" AND user_id = ?{}", post_ids.len() + 1));
                params.push(actor);
            }

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params.as_slice(), |row| {
                    Ok(InteractionRow {
                        post_id: row.get(0)?,
                        user_id: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn insert_interaction(
        &self,
        kind: InteractionKind,
        id: &str,
        post_id: &str,
        user_id: &str,
        created_at: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            let sql = format!(
                "INSERT INTO {} (id, post_id, user_id, created_at) VALUES (?1, ?2, ?3, ?4)",
                interaction_table(kind)
            );
            conn.execute(&sql, (id, post_id, user_id, created_at))?;
            Ok(())
        })
    }

    /// Toggle a like or prayer: removes if exists, inserts if not.
    /// Returns `true` if the row now exists.
    pub fn toggle_interaction(
        &self,
        kind: InteractionKind,
        id: &str,
        post_id: &str,
        user_id: &str,
        created_at: &str,
    ) -> Result<bool> {
        let table = interaction_table(kind);
        self.with_conn(|conn| {
            let existing: Option<String> = conn
                .query_row(
                    &format!("SELECT id FROM {} WHERE post_id = ?1 AND user_id = ?2", table),
                    (post_id, user_id),
                    |row| row.get(0),
                )
                .optional()?;

            if let Some(existing_id) = existing {
                conn.execute(&format!("DELETE FROM {} WHERE id = ?1", table), [&existing_id])?;
                Ok(false)
            } else {
                conn.execute(
                    &format!(
                        "INSERT INTO {} (id, post_id, user_id, created_at) VALUES (?1, ?2, ?3, ?4)",
                        table
                    ),
                    (id, post_id, user_id, created_at),
                )?;
                Ok(true)
            }
        })
    }
}

fn query_ids(conn: &Connection, sql: &str, param: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let ids = stmt
        .query_map([param], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;
    Ok(ids)
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<PostRow> {
    Ok(PostRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        content: row.get(2)?,
        images: row.get(3)?,
        audio_url: row.get(4)?,
        link_url: row.get(5)?,
        scripture_reference: row.get(6)?,
        group_id: row.get(7)?,
        shared_post_id: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

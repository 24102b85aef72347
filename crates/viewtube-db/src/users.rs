use crate::models::{ChannelProfileRow, UserRow, VideoWithOwner};
use crate::videos::VIDEO_WITH_OWNER_COLS;
use crate::{Database, OptionalExt};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    #[allow(clippy::too_many_arguments)]
    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        email: &str,
        full_name: &str,
        password_hash: &str,
        avatar: &str,
        cover_image: Option<&str>,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, full_name, password, avatar, cover_image)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![id, username, email, full_name, password_hash, avatar, cover_image],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id = ?1", id))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username = ?1", username))
    }

    /// Login lookup: the handle may be a username or an email.
    pub fn get_user_by_username_or_email(&self, handle: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username = ?1 OR email = ?1", handle))
    }

    pub fn user_exists(&self, username: &str, email: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1 OR email = ?2)",
                rusqlite::params![username, email],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    /// Persist (or clear) the single active refresh token for a user.
    pub fn set_refresh_token(&self, id: &str, token: Option<&str>) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET refresh_token = ?2, updated_at = datetime('now') WHERE id = ?1",
                rusqlite::params![id, token],
            )?;
            Ok(())
        })
    }

    pub fn set_password(&self, id: &str, password_hash: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET password = ?2, updated_at = datetime('now') WHERE id = ?1",
                rusqlite::params![id, password_hash],
            )?;
            Ok(())
        })
    }

    /// Partial profile update; absent fields keep their current value.
    pub fn update_user_profile(
        &self,
        id: &str,
        full_name: Option<&str>,
        email: Option<&str>,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users
                 SET full_name = COALESCE(?2, full_name),
                     email = COALESCE(?3, email),
                     updated_at = datetime('now')
                 WHERE id = ?1",
                rusqlite::params![id, full_name, email],
            )?;
            Ok(())
        })
    }

    pub fn set_avatar(&self, id: &str, url: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET avatar = ?2, updated_at = datetime('now') WHERE id = ?1",
                rusqlite::params![id, url],
            )?;
            Ok(())
        })
    }

    pub fn set_cover_image(&self, id: &str, url: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET cover_image = ?2, updated_at = datetime('now') WHERE id = ?1",
                rusqlite::params![id, url],
            )?;
            Ok(())
        })
    }

    /// Channel profile with computed subscriber counts and whether `caller_id`
    /// is among the channel's subscribers.
    pub fn channel_profile(
        &self,
        username: &str,
        caller_id: &str,
    ) -> Result<Option<ChannelProfileRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT u.id, u.username, u.full_name, u.email, u.avatar, u.cover_image,
                            (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id),
                            (SELECT COUNT(*) FROM subscriptions s WHERE s.subscriber_id = u.id),
                            EXISTS(SELECT 1 FROM subscriptions s
                                   WHERE s.channel_id = u.id AND s.subscriber_id = ?2)
                     FROM users u
                     WHERE u.username = ?1",
                    rusqlite::params![username, caller_id],
                    |row| {
                        Ok(ChannelProfileRow {
                            id: row.get(0)?,
                            username: row.get(1)?,
                            full_name: row.get(2)?,
                            email: row.get(3)?,
                            avatar: row.get(4)?,
                            cover_image: row.get(5)?,
                            subscribers_count: row.get(6)?,
                            channel_subscribed_to_count: row.get(7)?,
                            is_subscribed: row.get(8)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    /// Record a watch. Re-watching moves the entry to the front of the
    /// history rather than duplicating it.
    pub fn record_watch(&self, user_id: &str, video_id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "DELETE FROM watch_history WHERE user_id = ?1 AND video_id = ?2",
                rusqlite::params![user_id, video_id],
            )?;
            conn.execute(
                "INSERT INTO watch_history (user_id, video_id) VALUES (?1, ?2)",
                rusqlite::params![user_id, video_id],
            )?;
            Ok(())
        })
    }

    /// Watch history resolved to full videos with their owners, newest-first.
    pub fn watch_history(&self, user_id: &str) -> Result<Vec<VideoWithOwner>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {VIDEO_WITH_OWNER_COLS}
                 FROM watch_history h
                 JOIN videos v ON v.id = h.video_id
                 JOIN users u ON u.id = v.owner_id
                 WHERE h.user_id = ?1
                 ORDER BY h.seq DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_id], crate::videos::map_video_with_owner)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_user(conn: &Connection, filter: &str, param: &str) -> Result<Option<UserRow>> {
    let sql = format!(
        "SELECT id, username, email, full_name, password, avatar, cover_image,
                refresh_token, created_at, updated_at
         FROM users WHERE {filter}"
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([param], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                full_name: row.get(3)?,
                password: row.get(4)?,
                avatar: row.get(5)?,
                cover_image: row.get(6)?,
                refresh_token: row.get(7)?,
                created_at: row.get(8)?,
                updated_at: row.get(9)?,
            })
        })
        .optional()?;

    Ok(row)
}

use crate::models::VideoWithOwner;
use crate::videos::VIDEO_WITH_OWNER_COLS;
use crate::{Database, OptionalExt};
use anyhow::Result;

/// The single entity a like row points at.
#[derive(Debug, Clone, Copy)]
pub enum LikeTarget<'a> {
    Video(&'a str),
    Comment(&'a str),
    Tweet(&'a str),
}

impl LikeTarget<'_> {
    fn column(&self) -> &'static str {
        match self {
            LikeTarget::Video(_) => "video_id",
            LikeTarget::Comment(_) => "comment_id",
            LikeTarget::Tweet(_) => "tweet_id",
        }
    }

    fn target_id(&self) -> &str {
        match self {
            LikeTarget::Video(id) | LikeTarget::Comment(id) | LikeTarget::Tweet(id) => id,
        }
    }
}

impl Database {
    /// Toggle a like: removes if it exists, inserts if not.
    /// Returns true when the like was added, false when it was removed.
    pub fn toggle_like(&self, id: &str, user_id: &str, target: LikeTarget) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let column = target.column();

            let existing: Option<String> = conn
                .query_row(
                    &format!("SELECT id FROM likes WHERE liked_by = ?1 AND {column} = ?2"),
                    rusqlite::params![user_id, target.target_id()],
                    |row| row.get(0),
                )
                .optional()?;

            if let Some(existing_id) = existing {
                conn.execute("DELETE FROM likes WHERE id = ?1", [&existing_id])?;
                Ok(false)
            } else {
                conn.execute(
                    &format!("INSERT INTO likes (id, liked_by, {column}) VALUES (?1, ?2, ?3)"),
                    rusqlite::params![id, user_id, target.target_id()],
                )?;
                Ok(true)
            }
        })
    }

    /// Videos the user has liked, owner-joined, newest like first.
    pub fn liked_videos(&self, user_id: &str) -> Result<Vec<VideoWithOwner>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {VIDEO_WITH_OWNER_COLS}
                 FROM likes l
                 JOIN videos v ON v.id = l.video_id
                 JOIN users u ON u.id = v.owner_id
                 WHERE l.liked_by = ?1 AND l.video_id IS NOT NULL
                 ORDER BY l.created_at DESC, l.id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_id], crate::videos::map_video_with_owner)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Total likes received across all of a channel's videos.
    pub fn count_likes_on_owner_videos(&self, owner_id: &str) -> Result<i64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*)
                 FROM likes l
                 JOIN videos v ON v.id = l.video_id
                 WHERE v.owner_id = ?1",
                [owner_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }
}

use crate::models::{OwnerRow, VideoRow, VideoWithOwner};
use crate::{Database, OptionalExt};
use anyhow::Result;

/// Shared projection for video queries that join the owner.
pub(crate) const VIDEO_WITH_OWNER_COLS: &str = "v.id, v.owner_id, v.title, v.description, \
     v.video_file, v.thumbnail, v.duration, v.views, v.is_published, \
     v.created_at, v.updated_at, u.username, u.full_name, u.avatar";

pub(crate) fn map_video_with_owner(row: &rusqlite::Row<'_>) -> rusqlite::Result<VideoWithOwner> {
    let owner_id: String = row.get(1)?;
    Ok(VideoWithOwner {
        video: VideoRow {
            id: row.get(0)?,
            owner_id: owner_id.clone(),
            title: row.get(2)?,
            description: row.get(3)?,
            video_file: row.get(4)?,
            thumbnail: row.get(5)?,
            duration: row.get(6)?,
            views: row.get(7)?,
            is_published: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        },
        owner: OwnerRow {
            id: owner_id,
            username: row.get(11)?,
            full_name: row.get(12)?,
            avatar: row.get(13)?,
        },
    })
}

/// Whitelisted sort columns for video listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSort {
    CreatedAt,
    Views,
    Duration,
    Title,
}

impl VideoSort {
    fn column(self) -> &'static str {
        match self {
            VideoSort::CreatedAt => "v.created_at",
            VideoSort::Views => "v.views",
            VideoSort::Duration => "v.duration",
            VideoSort::Title => "v.title",
        }
    }
}

impl Database {
    #[allow(clippy::too_many_arguments)]
    pub fn insert_video(
        &self,
        id: &str,
        owner_id: &str,
        title: &str,
        description: &str,
        video_file: &str,
        thumbnail: &str,
        duration: f64,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO videos (id, owner_id, title, description, video_file, thumbnail, duration)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![id, owner_id, title, description, video_file, thumbnail, duration],
            )?;
            Ok(())
        })
    }

    pub fn get_video(&self, id: &str) -> Result<Option<VideoWithOwner>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {VIDEO_WITH_OWNER_COLS}
                 FROM videos v
                 JOIN users u ON u.id = v.owner_id
                 WHERE v.id = ?1"
            );
            let row = conn
                .query_row(&sql, [id], map_video_with_owner)
                .optional()?;
            Ok(row)
        })
    }

    /// Owner-scoped, optionally title-filtered listing with a total count for
    /// the pagination envelope.
    pub fn list_videos(
        &self,
        owner_id: &str,
        title_query: Option<&str>,
        sort: VideoSort,
        ascending: bool,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<VideoWithOwner>, i64)> {
        self.with_conn(|conn| {
            let pattern = title_query.map(|q| format!("%{q}%"));
            let direction = if ascending { "ASC" } else { "DESC" };

            let sql = format!(
                "SELECT {VIDEO_WITH_OWNER_COLS}
                 FROM videos v
                 JOIN users u ON u.id = v.owner_id
                 WHERE v.owner_id = ?1 AND (?2 IS NULL OR v.title LIKE ?2)
                 ORDER BY {} {direction}, v.id DESC
                 LIMIT ?3 OFFSET ?4",
                sort.column()
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(
                    rusqlite::params![owner_id, pattern, limit, offset],
                    map_video_with_owner,
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM videos v
                 WHERE v.owner_id = ?1 AND (?2 IS NULL OR v.title LIKE ?2)",
                rusqlite::params![owner_id, pattern],
                |row| row.get(0),
            )?;

            Ok((rows, total))
        })
    }

    /// Partial update; absent fields keep their current value.
    pub fn update_video(
        &self,
        id: &str,
        title: Option<&str>,
        description: Option<&str>,
        thumbnail: Option<&str>,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE videos
                 SET title = COALESCE(?2, title),
                     description = COALESCE(?3, description),
                     thumbnail = COALESCE(?4, thumbnail),
                     updated_at = datetime('now')
                 WHERE id = ?1",
                rusqlite::params![id, title, description, thumbnail],
            )?;
            Ok(())
        })
    }

    pub fn delete_video(&self, id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute("DELETE FROM videos WHERE id = ?1", [id])?;
            Ok(())
        })
    }

    /// Flip the publish flag, returning the new state.
    pub fn toggle_publish(&self, id: &str) -> Result<Option<bool>> {
        self.with_conn_mut(|conn| {
            let current: Option<bool> = conn
                .query_row("SELECT is_published FROM videos WHERE id = ?1", [id], |row| {
                    row.get(0)
                })
                .optional()?;

            match current {
                Some(state) => {
                    conn.execute(
                        "UPDATE videos SET is_published = ?2, updated_at = datetime('now')
                         WHERE id = ?1",
                        rusqlite::params![id, !state],
                    )?;
                    Ok(Some(!state))
                }
                None => Ok(None),
            }
        })
    }

    pub fn increment_views(&self, id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute("UPDATE videos SET views = views + 1 WHERE id = ?1", [id])?;
            Ok(())
        })
    }
}

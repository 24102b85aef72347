use crate::models::{CommentRow, CommentWithOwner, OwnerRow};
use crate::{Database, OptionalExt};
use anyhow::Result;

const COMMENT_WITH_OWNER_COLS: &str = "c.id, c.video_id, c.owner_id, c.content, \
     c.created_at, c.updated_at, u.username, u.full_name, u.avatar";

fn map_comment_with_owner(row: &rusqlite::Row<'_>) -> rusqlite::Result<CommentWithOwner> {
    let owner_id: String = row.get(2)?;
    Ok(CommentWithOwner {
        comment: CommentRow {
            id: row.get(0)?,
            video_id: row.get(1)?,
            owner_id: owner_id.clone(),
            content: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        },
        owner: OwnerRow {
            id: owner_id,
            username: row.get(6)?,
            full_name: row.get(7)?,
            avatar: row.get(8)?,
        },
    })
}

impl Database {
    pub fn insert_comment(&self, id: &str, video_id: &str, owner_id: &str, content: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO comments (id, video_id, owner_id, content) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, video_id, owner_id, content],
            )?;
            Ok(())
        })
    }

    pub fn get_comment(&self, id: &str) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, video_id, owner_id, content, created_at, updated_at
                     FROM comments WHERE id = ?1",
                    [id],
                    |row| {
                        Ok(CommentRow {
                            id: row.get(0)?,
                            video_id: row.get(1)?,
                            owner_id: row.get(2)?,
                            content: row.get(3)?,
                            created_at: row.get(4)?,
                            updated_at: row.get(5)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn get_comment_with_owner(&self, id: &str) -> Result<Option<CommentWithOwner>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {COMMENT_WITH_OWNER_COLS}
                 FROM comments c
                 JOIN users u ON u.id = c.owner_id
                 WHERE c.id = ?1"
            );
            let row = conn
                .query_row(&sql, [id], map_comment_with_owner)
                .optional()?;
            Ok(row)
        })
    }

    /// Owner-joined comment page for a video, newest-first, with the total
    /// for the pagination envelope.
    pub fn comments_by_video(
        &self,
        video_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<CommentWithOwner>, i64)> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {COMMENT_WITH_OWNER_COLS}
                 FROM comments c
                 JOIN users u ON u.id = c.owner_id
                 WHERE c.video_id = ?1
                 ORDER BY c.created_at DESC, c.id DESC
                 LIMIT ?2 OFFSET ?3"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(
                    rusqlite::params![video_id, limit, offset],
                    map_comment_with_owner,
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM comments WHERE video_id = ?1",
                [video_id],
                |row| row.get(0),
            )?;

            Ok((rows, total))
        })
    }

    pub fn update_comment(&self, id: &str, content: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE comments SET content = ?2, updated_at = datetime('now') WHERE id = ?1",
                rusqlite::params![id, content],
            )?;
            Ok(())
        })
    }

    pub fn delete_comment(&self, id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute("DELETE FROM comments WHERE id = ?1", [id])?;
            Ok(())
        })
    }
}

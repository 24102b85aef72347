use crate::models::{OwnerRow, TweetRow, TweetWithOwner};
use crate::{Database, OptionalExt};
use anyhow::Result;

const TWEET_WITH_OWNER_COLS: &str =
    "t.id, t.owner_id, t.content, t.created_at, t.updated_at, u.username, u.full_name, u.avatar";

fn map_tweet_with_owner(row: &rusqlite::Row<'_>) -> rusqlite::Result<TweetWithOwner> {
    let owner_id: String = row.get(1)?;
    Ok(TweetWithOwner {
        tweet: TweetRow {
            id: row.get(0)?,
            owner_id: owner_id.clone(),
            content: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        },
        owner: OwnerRow {
            id: owner_id,
            username: row.get(5)?,
            full_name: row.get(6)?,
            avatar: row.get(7)?,
        },
    })
}

impl Database {
    pub fn insert_tweet(&self, id: &str, owner_id: &str, content: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO tweets (id, owner_id, content) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, owner_id, content],
            )?;
            Ok(())
        })
    }

    pub fn get_tweet(&self, id: &str) -> Result<Option<TweetRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, owner_id, content, created_at, updated_at FROM tweets WHERE id = ?1",
                    [id],
                    |row| {
                        Ok(TweetRow {
                            id: row.get(0)?,
                            owner_id: row.get(1)?,
                            content: row.get(2)?,
                            created_at: row.get(3)?,
                            updated_at: row.get(4)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn get_tweet_with_owner(&self, id: &str) -> Result<Option<TweetWithOwner>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {TWEET_WITH_OWNER_COLS}
                 FROM tweets t
                 JOIN users u ON u.id = t.owner_id
                 WHERE t.id = ?1"
            );
            let row = conn.query_row(&sql, [id], map_tweet_with_owner).optional()?;
            Ok(row)
        })
    }

    pub fn tweets_by_user(&self, owner_id: &str) -> Result<Vec<TweetWithOwner>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {TWEET_WITH_OWNER_COLS}
                 FROM tweets t
                 JOIN users u ON u.id = t.owner_id
                 WHERE t.owner_id = ?1
                 ORDER BY t.created_at DESC, t.id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([owner_id], map_tweet_with_owner)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_tweet(&self, id: &str, content: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE tweets SET content = ?2, updated_at = datetime('now') WHERE id = ?1",
                rusqlite::params![id, content],
            )?;
            Ok(())
        })
    }

    pub fn delete_tweet(&self, id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute("DELETE FROM tweets WHERE id = ?1", [id])?;
            Ok(())
        })
    }
}

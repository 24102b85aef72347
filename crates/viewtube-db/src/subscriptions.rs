use crate::models::{ChannelStatsRow, OwnerRow};
use crate::{Database, OptionalExt};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    /// Toggle a subscription: removes if it exists, inserts if not.
    /// Returns true when the subscription was added, false when removed.
    /// Self-subscription is rejected at the API layer before this runs.
    pub fn toggle_subscription(&self, id: &str, subscriber_id: &str, channel_id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let existing: Option<String> = conn
                .query_row(
                    "SELECT id FROM subscriptions WHERE subscriber_id = ?1 AND channel_id = ?2",
                    rusqlite::params![subscriber_id, channel_id],
                    |row| row.get(0),
                )
                .optional()?;

            if let Some(existing_id) = existing {
                conn.execute("DELETE FROM subscriptions WHERE id = ?1", [&existing_id])?;
                Ok(false)
            } else {
                conn.execute(
                    "INSERT INTO subscriptions (id, subscriber_id, channel_id) VALUES (?1, ?2, ?3)",
                    rusqlite::params![id, subscriber_id, channel_id],
                )?;
                Ok(true)
            }
        })
    }

    /// Users subscribed to the given channel.
    pub fn subscribers_of(&self, channel_id: &str) -> Result<Vec<OwnerRow>> {
        self.with_conn(|conn| {
            query_profiles(
                conn,
                "SELECT u.id, u.username, u.full_name, u.avatar
                 FROM subscriptions s
                 JOIN users u ON u.id = s.subscriber_id
                 WHERE s.channel_id = ?1
                 ORDER BY s.created_at DESC",
                channel_id,
            )
        })
    }

    /// Channels the given user is subscribed to.
    pub fn subscribed_channels(&self, subscriber_id: &str) -> Result<Vec<OwnerRow>> {
        self.with_conn(|conn| {
            query_profiles(
                conn,
                "SELECT u.id, u.username, u.full_name, u.avatar
                 FROM subscriptions s
                 JOIN users u ON u.id = s.channel_id
                 WHERE s.subscriber_id = ?1
                 ORDER BY s.created_at DESC",
                subscriber_id,
            )
        })
    }

    /// Dashboard aggregation over a channel's own videos: counts, summed
    /// views, subscribers, and likes received.
    pub fn channel_stats(&self, owner_id: &str) -> Result<ChannelStatsRow> {
        self.with_conn(|conn| {
            let (total_videos, total_views): (i64, i64) = conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(views), 0) FROM videos WHERE owner_id = ?1",
                [owner_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            let total_subscribers: i64 = conn.query_row(
                "SELECT COUNT(*) FROM subscriptions WHERE channel_id = ?1",
                [owner_id],
                |row| row.get(0),
            )?;

            let total_likes: i64 = conn.query_row(
                "SELECT COUNT(*)
                 FROM likes l
                 JOIN videos v ON v.id = l.video_id
                 WHERE v.owner_id = ?1",
                [owner_id],
                |row| row.get(0),
            )?;

            Ok(ChannelStatsRow {
                total_videos,
                total_views,
                total_subscribers,
                total_likes,
            })
        })
    }
}

fn query_profiles(conn: &Connection, sql: &str, param: &str) -> Result<Vec<OwnerRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([param], |row| {
            Ok(OwnerRow {
                id: row.get(0)?,
                username: row.get(1)?,
                full_name: row.get(2)?,
                avatar: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

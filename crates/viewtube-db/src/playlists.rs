use crate::models::{OwnerRow, PlaylistEntryRow, PlaylistRow, PlaylistWithVideos};
use crate::{Database, OptionalExt};
use anyhow::Result;
use rusqlite::Connection;

const PLAYLIST_WITH_OWNER_COLS: &str = "p.id, p.owner_id, p.name, p.description, \
     p.created_at, p.updated_at, u.username, u.full_name, u.avatar";

fn map_playlist_with_owner(row: &rusqlite::Row<'_>) -> rusqlite::Result<(PlaylistRow, OwnerRow)> {
    let owner_id: String = row.get(1)?;
    Ok((
        PlaylistRow {
            id: row.get(0)?,
            owner_id: owner_id.clone(),
            name: row.get(2)?,
            description: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        },
        OwnerRow {
            id: owner_id,
            username: row.get(6)?,
            full_name: row.get(7)?,
            avatar: row.get(8)?,
        },
    ))
}

fn load_entries(conn: &Connection, playlist_id: &str) -> Result<Vec<PlaylistEntryRow>> {
    let mut stmt = conn.prepare(
        "SELECT v.id, v.title, v.description, v.duration, v.created_at
         FROM playlist_videos pv
         JOIN videos v ON v.id = pv.video_id
         WHERE pv.playlist_id = ?1
         ORDER BY pv.position",
    )?;
    let rows = stmt
        .query_map([playlist_id], |row| {
            Ok(PlaylistEntryRow {
                id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                duration: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

impl Database {
    pub fn insert_playlist(&self, id: &str, owner_id: &str, name: &str, description: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO playlists (id, owner_id, name, description) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, owner_id, name, description],
            )?;
            Ok(())
        })
    }

    /// Bare row, used for ownership checks before mutation.
    pub fn get_playlist(&self, id: &str) -> Result<Option<PlaylistRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, owner_id, name, description, created_at, updated_at
                     FROM playlists WHERE id = ?1",
                    [id],
                    |row| {
                        Ok(PlaylistRow {
                            id: row.get(0)?,
                            owner_id: row.get(1)?,
                            name: row.get(2)?,
                            description: row.get(3)?,
                            created_at: row.get(4)?,
                            updated_at: row.get(5)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn get_playlist_with_videos(&self, id: &str) -> Result<Option<PlaylistWithVideos>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {PLAYLIST_WITH_OWNER_COLS}
                 FROM playlists p
                 JOIN users u ON u.id = p.owner_id
                 WHERE p.id = ?1"
            );
            let found = conn
                .query_row(&sql, [id], map_playlist_with_owner)
                .optional()?;

            match found {
                Some((playlist, owner)) => {
                    let videos = load_entries(conn, &playlist.id)?;
                    Ok(Some(PlaylistWithVideos {
                        playlist,
                        owner,
                        videos,
                    }))
                }
                None => Ok(None),
            }
        })
    }

    pub fn playlists_by_owner(&self, owner_id: &str) -> Result<Vec<PlaylistWithVideos>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {PLAYLIST_WITH_OWNER_COLS}
                 FROM playlists p
                 JOIN users u ON u.id = p.owner_id
                 WHERE p.owner_id = ?1
                 ORDER BY p.created_at DESC, p.id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let pairs = stmt
                .query_map([owner_id], map_playlist_with_owner)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let mut playlists = Vec::with_capacity(pairs.len());
            for (playlist, owner) in pairs {
                let videos = load_entries(conn, &playlist.id)?;
                playlists.push(PlaylistWithVideos {
                    playlist,
                    owner,
                    videos,
                });
            }
            Ok(playlists)
        })
    }

    /// Partial update; absent fields keep their current value.
    pub fn update_playlist(&self, id: &str, name: Option<&str>, description: Option<&str>) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE playlists
                 SET name = COALESCE(?2, name),
                     description = COALESCE(?3, description),
                     updated_at = datetime('now')
                 WHERE id = ?1",
                rusqlite::params![id, name, description],
            )?;
            Ok(())
        })
    }

    pub fn delete_playlist(&self, id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute("DELETE FROM playlists WHERE id = ?1", [id])?;
            Ok(())
        })
    }

    /// Append a video to the playlist. Returns false (and changes nothing)
    /// when the video is already present.
    pub fn add_video_to_playlist(&self, playlist_id: &str, video_id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM playlist_videos WHERE playlist_id = ?1 AND video_id = ?2)",
                rusqlite::params![playlist_id, video_id],
                |row| row.get(0),
            )?;
            if exists {
                return Ok(false);
            }

            conn.execute(
                "INSERT INTO playlist_videos (playlist_id, video_id, position)
                 VALUES (?1, ?2,
                         (SELECT COALESCE(MAX(position) + 1, 0)
                          FROM playlist_videos WHERE playlist_id = ?1))",
                rusqlite::params![playlist_id, video_id],
            )?;
            conn.execute(
                "UPDATE playlists SET updated_at = datetime('now') WHERE id = ?1",
                [playlist_id],
            )?;
            Ok(true)
        })
    }

    /// Returns false when the video was not in the playlist.
    pub fn remove_video_from_playlist(&self, playlist_id: &str, video_id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let removed = conn.execute(
                "DELETE FROM playlist_videos WHERE playlist_id = ?1 AND video_id = ?2",
                rusqlite::params![playlist_id, video_id],
            )?;
            if removed > 0 {
                conn.execute(
                    "UPDATE playlists SET updated_at = datetime('now') WHERE id = ?1",
                    [playlist_id],
                )?;
            }
            Ok(removed > 0)
        })
    }
}

use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              TEXT PRIMARY KEY,
            username        TEXT NOT NULL UNIQUE,
            email           TEXT NOT NULL UNIQUE,
            full_name       TEXT NOT NULL,
            password        TEXT NOT NULL,
            avatar          TEXT NOT NULL,
            cover_image     TEXT,
            refresh_token   TEXT,
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS videos (
            id              TEXT PRIMARY KEY,
            owner_id        TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title           TEXT NOT NULL,
            description     TEXT NOT NULL,
            video_file      TEXT NOT NULL,
            thumbnail       TEXT NOT NULL,
            duration        REAL NOT NULL DEFAULT 0,
            views           INTEGER NOT NULL DEFAULT 0,
            is_published    INTEGER NOT NULL DEFAULT 1,
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_videos_owner
            ON videos(owner_id, created_at);

        CREATE TABLE IF NOT EXISTS comments (
            id          TEXT PRIMARY KEY,
            video_id    TEXT NOT NULL REFERENCES videos(id) ON DELETE CASCADE,
            owner_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_comments_video
            ON comments(video_id, created_at);

        CREATE TABLE IF NOT EXISTS tweets (
            id          TEXT PRIMARY KEY,
            owner_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_tweets_owner
            ON tweets(owner_id, created_at);

        -- Exactly one of video_id / comment_id / tweet_id is set per row.
        -- Partial unique indexes reject a duplicate like even if a race gets
        -- past the check in the toggle.
        CREATE TABLE IF NOT EXISTS likes (
            id          TEXT PRIMARY KEY,
            liked_by    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            video_id    TEXT REFERENCES videos(id) ON DELETE CASCADE,
            comment_id  TEXT REFERENCES comments(id) ON DELETE CASCADE,
            tweet_id    TEXT REFERENCES tweets(id) ON DELETE CASCADE,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            CHECK (
                (video_id IS NOT NULL) + (comment_id IS NOT NULL) + (tweet_id IS NOT NULL) = 1
            )
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_likes_video
            ON likes(liked_by, video_id) WHERE video_id IS NOT NULL;
        CREATE UNIQUE INDEX IF NOT EXISTS idx_likes_comment
            ON likes(liked_by, comment_id) WHERE comment_id IS NOT NULL;
        CREATE UNIQUE INDEX IF NOT EXISTS idx_likes_tweet
            ON likes(liked_by, tweet_id) WHERE tweet_id IS NOT NULL;

        CREATE TABLE IF NOT EXISTS subscriptions (
            id              TEXT PRIMARY KEY,
            subscriber_id   TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            channel_id      TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(subscriber_id, channel_id)
        );

        CREATE INDEX IF NOT EXISTS idx_subscriptions_channel
            ON subscriptions(channel_id);

        CREATE TABLE IF NOT EXISTS playlists (
            id          TEXT PRIMARY KEY,
            owner_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name        TEXT NOT NULL,
            description TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Composite primary key keeps a video from appearing twice in the
        -- same playlist; position preserves insertion order.
        CREATE TABLE IF NOT EXISTS playlist_videos (
            playlist_id TEXT NOT NULL REFERENCES playlists(id) ON DELETE CASCADE,
            video_id    TEXT NOT NULL REFERENCES videos(id) ON DELETE CASCADE,
            position    INTEGER NOT NULL,
            PRIMARY KEY (playlist_id, video_id)
        );

        -- seq gives a stable newest-first ordering even when two watches land
        -- in the same second.
        CREATE TABLE IF NOT EXISTS watch_history (
            seq         INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            video_id    TEXT NOT NULL REFERENCES videos(id) ON DELETE CASCADE,
            watched_at  TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(user_id, video_id)
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}

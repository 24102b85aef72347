/// Database row types — these map directly to SQLite rows.
/// Distinct from viewtube-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Minimal owner projection joined onto resource rows.
pub struct OwnerRow {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub avatar: String,
}

pub struct VideoRow {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub video_file: String,
    pub thumbnail: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
}

pub struct VideoWithOwner {
    pub video: VideoRow,
    pub owner: OwnerRow,
}

pub struct CommentRow {
    pub id: String,
    pub video_id: String,
    pub owner_id: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

pub struct CommentWithOwner {
    pub comment: CommentRow,
    pub owner: OwnerRow,
}

pub struct TweetRow {
    pub id: String,
    pub owner_id: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

pub struct TweetWithOwner {
    pub tweet: TweetRow,
    pub owner: OwnerRow,
}

pub struct PlaylistRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Trimmed video fields carried inside a playlist.
pub struct PlaylistEntryRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub created_at: String,
}

pub struct PlaylistWithVideos {
    pub playlist: PlaylistRow,
    pub owner: OwnerRow,
    pub videos: Vec<PlaylistEntryRow>,
}

/// Channel profile aggregation: the user plus subscription counts and whether
/// the calling user is among the subscribers.
pub struct ChannelProfileRow {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub subscribers_count: i64,
    pub channel_subscribed_to_count: i64,
    pub is_subscribed: bool,
}

pub struct ChannelStatsRow {
    pub total_videos: i64,
    pub total_views: i64,
    pub total_subscribers: i64,
    pub total_likes: i64,
}

//! Row-to-DTO mapping. Ids written by this service are always canonical
//! UUID strings; a corrupt id is logged and rendered as the nil UUID rather
//! than failing the whole response.

use tracing::warn;
use uuid::Uuid;

use viewtube_db::models::{
    ChannelProfileRow, ChannelStatsRow, CommentWithOwner, OwnerRow, PlaylistWithVideos,
    TweetWithOwner, UserRow, VideoWithOwner,
};
use viewtube_types::api::{
    ChannelProfileResponse, ChannelStatsResponse, CommentResponse, OwnerProfile, PlaylistResponse,
    PlaylistVideo, TweetResponse, UserPublic, VideoResponse,
};

pub(crate) fn parse_id(raw: &str, context: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt id '{}' on {}: {}", raw, context, e);
        Uuid::default()
    })
}

pub(crate) fn user_public(row: &UserRow) -> UserPublic {
    UserPublic {
        id: parse_id(&row.id, "user"),
        username: row.username.clone(),
        email: row.email.clone(),
        full_name: row.full_name.clone(),
        avatar: row.avatar.clone(),
        cover_image: row.cover_image.clone(),
        created_at: row.created_at.clone(),
        updated_at: row.updated_at.clone(),
    }
}

pub(crate) fn owner_profile(row: &OwnerRow) -> OwnerProfile {
    OwnerProfile {
        id: parse_id(&row.id, "owner"),
        username: row.username.clone(),
        full_name: row.full_name.clone(),
        avatar: row.avatar.clone(),
    }
}

pub(crate) fn video_response(row: &VideoWithOwner) -> VideoResponse {
    VideoResponse {
        id: parse_id(&row.video.id, "video"),
        title: row.video.title.clone(),
        description: row.video.description.clone(),
        video_file: row.video.video_file.clone(),
        thumbnail: row.video.thumbnail.clone(),
        duration: row.video.duration,
        views: row.video.views,
        is_published: row.video.is_published,
        owner: owner_profile(&row.owner),
        created_at: row.video.created_at.clone(),
        updated_at: row.video.updated_at.clone(),
    }
}

pub(crate) fn comment_response(row: &CommentWithOwner) -> CommentResponse {
    CommentResponse {
        id: parse_id(&row.comment.id, "comment"),
        video_id: parse_id(&row.comment.video_id, "comment"),
        content: row.comment.content.clone(),
        owner: owner_profile(&row.owner),
        created_at: row.comment.created_at.clone(),
        updated_at: row.comment.updated_at.clone(),
    }
}

pub(crate) fn tweet_response(row: &TweetWithOwner) -> TweetResponse {
    TweetResponse {
        id: parse_id(&row.tweet.id, "tweet"),
        content: row.tweet.content.clone(),
        owner: owner_profile(&row.owner),
        created_at: row.tweet.created_at.clone(),
        updated_at: row.tweet.updated_at.clone(),
    }
}

pub(crate) fn playlist_response(row: &PlaylistWithVideos) -> PlaylistResponse {
    PlaylistResponse {
        id: parse_id(&row.playlist.id, "playlist"),
        name: row.playlist.name.clone(),
        description: row.playlist.description.clone(),
        owner: owner_profile(&row.owner),
        videos: row
            .videos
            .iter()
            .map(|v| PlaylistVideo {
                id: parse_id(&v.id, "playlist video"),
                title: v.title.clone(),
                description: v.description.clone(),
                duration: v.duration,
                created_at: v.created_at.clone(),
            })
            .collect(),
        created_at: row.playlist.created_at.clone(),
        updated_at: row.playlist.updated_at.clone(),
    }
}

pub(crate) fn channel_profile_response(row: &ChannelProfileRow) -> ChannelProfileResponse {
    ChannelProfileResponse {
        id: parse_id(&row.id, "channel"),
        username: row.username.clone(),
        full_name: row.full_name.clone(),
        email: row.email.clone(),
        avatar: row.avatar.clone(),
        cover_image: row.cover_image.clone(),
        subscribers_count: row.subscribers_count,
        channel_subscribed_to_count: row.channel_subscribed_to_count,
        is_subscribed: row.is_subscribed,
    }
}

pub(crate) fn channel_stats_response(row: &ChannelStatsRow) -> ChannelStatsResponse {
    ChannelStatsResponse {
        total_videos: row.total_videos,
        total_views: row.total_views,
        total_subscribers: row.total_subscribers,
        total_likes: row.total_likes,
    }
}

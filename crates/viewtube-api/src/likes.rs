use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use viewtube_db::likes::LikeTarget;
use viewtube_types::api::ApiResponse;

use crate::auth::AppState;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::{blocking_db, dto};

/// POST /likes/toggle-video-like/{videoId}
pub async fn toggle_video_like(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(video_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let target_id = video_id.to_string();
    {
        let id = target_id.clone();
        blocking_db(&state, move |db| db.get_video(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found.".into()))?;
    }

    let like_id = Uuid::new_v4().to_string();
    let user_id = current.id.to_string();
    let liked = blocking_db(&state, move |db| {
        db.toggle_like(&like_id, &user_id, LikeTarget::Video(&target_id))
    })
    .await?;

    let message = if liked {
        "Video liked successfully."
    } else {
        "Video disliked successfully."
    };
    Ok(Json(ApiResponse::new(200, (), message)))
}

/// POST /likes/toggle-comment-like/{commentId}
pub async fn toggle_comment_like(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(comment_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let target_id = comment_id.to_string();
    {
        let id = target_id.clone();
        blocking_db(&state, move |db| db.get_comment(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found.".into()))?;
    }

    let like_id = Uuid::new_v4().to_string();
    let user_id = current.id.to_string();
    let liked = blocking_db(&state, move |db| {
        db.toggle_like(&like_id, &user_id, LikeTarget::Comment(&target_id))
    })
    .await?;

    let message = if liked {
        "Comment liked successfully."
    } else {
        "Comment disliked successfully."
    };
    Ok(Json(ApiResponse::new(200, (), message)))
}

/// POST /likes/toggle-tweet-like/{tweetId}
pub async fn toggle_tweet_like(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(tweet_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let target_id = tweet_id.to_string();
    {
        let id = target_id.clone();
        blocking_db(&state, move |db| db.get_tweet(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("Tweet not found.".into()))?;
    }

    let like_id = Uuid::new_v4().to_string();
    let user_id = current.id.to_string();
    let liked = blocking_db(&state, move |db| {
        db.toggle_like(&like_id, &user_id, LikeTarget::Tweet(&target_id))
    })
    .await?;

    let message = if liked {
        "Tweet liked successfully."
    } else {
        "Tweet disliked successfully."
    };
    Ok(Json(ApiResponse::new(200, (), message)))
}

/// GET /likes/get-liked-videos
pub async fn get_liked_videos(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let user_id = current.id.to_string();
    let rows = blocking_db(&state, move |db| db.liked_videos(&user_id)).await?;

    let videos: Vec<_> = rows.iter().map(dto::video_response).collect();
    Ok(Json(ApiResponse::new(
        200,
        videos,
        "Liked videos fetched successfully.",
    )))
}

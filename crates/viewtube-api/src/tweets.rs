use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use viewtube_types::api::{ApiResponse, TweetRequest};

use crate::auth::AppState;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::{blocking_db, dto};

fn required_content(content: &str) -> Result<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Content is required.".into()));
    }
    Ok(trimmed)
}

/// POST /tweets/create-tweet
pub async fn create_tweet(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<TweetRequest>,
) -> Result<impl IntoResponse> {
    let content = required_content(&req.content)?.to_string();

    let tweet_id = Uuid::new_v4().to_string();
    {
        let (id, owner_id) = (tweet_id.clone(), current.id.to_string());
        blocking_db(&state, move |db| db.insert_tweet(&id, &owner_id, &content)).await?;
    }

    let created = blocking_db(&state, move |db| db.get_tweet_with_owner(&tweet_id))
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("tweet missing after insert")))?;

    Ok(Json(ApiResponse::new(
        200,
        dto::tweet_response(&created),
        "Tweet created successfully.",
    )))
}

/// GET /tweets/get-tweets/{userId} — a user's tweets, newest-first.
pub async fn get_tweets(
    State(state): State<AppState>,
    Extension(_current): Extension<CurrentUser>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = user_id.to_string();
    {
        let id = user_id.clone();
        blocking_db(&state, move |db| db.get_user_by_id(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".into()))?;
    }

    let rows = blocking_db(&state, move |db| db.tweets_by_user(&user_id)).await?;

    let tweets: Vec<_> = rows.iter().map(dto::tweet_response).collect();
    Ok(Json(ApiResponse::new(
        200,
        tweets,
        "Tweets retrieved successfully.",
    )))
}

/// PATCH /tweets/update-tweet/{tweetId} — owner only.
pub async fn update_tweet(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(tweet_id): Path<Uuid>,
    Json(req): Json<TweetRequest>,
) -> Result<impl IntoResponse> {
    let content = required_content(&req.content)?.to_string();

    let tweet_id = tweet_id.to_string();
    let existing = {
        let id = tweet_id.clone();
        blocking_db(&state, move |db| db.get_tweet(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("Tweet not found.".into()))?
    };

    if existing.owner_id != current.id.to_string() {
        return Err(AppError::Forbidden(
            "You are not authorized to update this tweet.".into(),
        ));
    }

    {
        let id = tweet_id.clone();
        blocking_db(&state, move |db| db.update_tweet(&id, &content)).await?;
    }

    let updated = blocking_db(&state, move |db| db.get_tweet_with_owner(&tweet_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found.".into()))?;

    Ok(Json(ApiResponse::new(
        200,
        dto::tweet_response(&updated),
        "Tweet updated successfully.",
    )))
}

/// DELETE /tweets/delete-tweet/{tweetId} — owner only; permanent.
pub async fn delete_tweet(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(tweet_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let tweet_id = tweet_id.to_string();
    let existing = {
        let id = tweet_id.clone();
        blocking_db(&state, move |db| db.get_tweet(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("Tweet not found.".into()))?
    };

    if existing.owner_id != current.id.to_string() {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this tweet.".into(),
        ));
    }

    blocking_db(&state, move |db| db.delete_tweet(&tweet_id)).await?;

    Ok(Json(ApiResponse::new(200, (), "Tweet deleted successfully.")))
}

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use viewtube_types::api::ApiResponse;

use crate::auth::AppState;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::{blocking_db, dto};

/// POST /subscriptions/toggle/{channelId} — subscribe/unsubscribe. A user
/// can never subscribe to their own channel; that is rejected before the
/// toggle runs.
pub async fn toggle_subscription(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(channel_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    if channel_id == current.id {
        return Err(AppError::BadRequest(
            "You cannot subscribe to your own channel.".into(),
        ));
    }

    let channel_id = channel_id.to_string();
    {
        let id = channel_id.clone();
        blocking_db(&state, move |db| db.get_user_by_id(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("Channel not found.".into()))?;
    }

    let subscription_id = Uuid::new_v4().to_string();
    let subscriber_id = current.id.to_string();
    let subscribed = blocking_db(&state, move |db| {
        db.toggle_subscription(&subscription_id, &subscriber_id, &channel_id)
    })
    .await?;

    let message = if subscribed {
        "Channel subscribed successfully."
    } else {
        "Channel unsubscribed successfully."
    };
    Ok(Json(ApiResponse::new(200, (), message)))
}

/// GET /subscriptions/get-subscribers — who subscribes to the caller.
pub async fn get_subscribers(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let channel_id = current.id.to_string();
    let rows = blocking_db(&state, move |db| db.subscribers_of(&channel_id)).await?;

    let subscribers: Vec<_> = rows.iter().map(dto::owner_profile).collect();
    Ok(Json(ApiResponse::new(
        200,
        subscribers,
        "Subscribers list retrieved successfully.",
    )))
}

/// GET /subscriptions/get-subscribed-channels — who the caller subscribes to.
pub async fn get_subscribed_channels(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let subscriber_id = current.id.to_string();
    let rows = blocking_db(&state, move |db| db.subscribed_channels(&subscriber_id)).await?;

    let channels: Vec<_> = rows.iter().map(dto::owner_profile).collect();
    Ok(Json(ApiResponse::new(
        200,
        channels,
        "Subscribed channels retrieved successfully.",
    )))
}

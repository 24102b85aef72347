//! Profile endpoints plus the channel-profile and watch-history read models.

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    response::IntoResponse,
};

use viewtube_types::api::{ApiResponse, UpdateUserRequest};

use crate::auth::AppState;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::{blocking_db, dto, uploads};

/// GET /users/get-user
pub async fn get_user(Extension(current): Extension<CurrentUser>) -> Result<impl IntoResponse> {
    Ok(Json(ApiResponse::new(
        200,
        current.public(),
        "User fetched successfully.",
    )))
}

/// PATCH /users/update-user — partial update of fullName/email.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse> {
    let full_name = req
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let email = req
        .email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    if full_name.is_none() && email.is_none() {
        return Err(AppError::Validation(
            "At least one field (fullName, email) must be provided.".into(),
        ));
    }

    let id = current.id.to_string();
    {
        let id = id.clone();
        blocking_db(&state, move |db| {
            db.update_user_profile(&id, full_name.as_deref(), email.as_deref())
        })
        .await?;
    }

    let updated = blocking_db(&state, move |db| db.get_user_by_id(&id))
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".into()))?;

    Ok(Json(ApiResponse::new(
        200,
        dto::user_public(&updated),
        "User updated successfully.",
    )))
}

/// PATCH /users/avatar — multipart single file.
pub async fn update_avatar(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    update_user_image(state, current, multipart, "avatar").await
}

/// PATCH /users/cover-image — multipart single file.
pub async fn update_cover_image(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    update_user_image(state, current, multipart, "coverImage").await
}

async fn update_user_image(
    state: AppState,
    current: CurrentUser,
    multipart: Multipart,
    field: &'static str,
) -> Result<impl IntoResponse> {
    let form = uploads::collect(multipart).await?;
    let file = form
        .file(field)
        .ok_or_else(|| AppError::Validation(format!("A {field} file is required.")))?;

    let stored = uploads::store_image(&state, file).await?;

    let id = current.id.to_string();
    {
        let id = id.clone();
        let url = stored.url.clone();
        blocking_db(&state, move |db| {
            if field == "avatar" {
                db.set_avatar(&id, &url)
            } else {
                db.set_cover_image(&id, &url)
            }
        })
        .await?;
    }

    let updated = blocking_db(&state, move |db| db.get_user_by_id(&id))
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".into()))?;

    Ok(Json(ApiResponse::new(
        200,
        dto::user_public(&updated),
        "User image updated successfully.",
    )))
}

/// GET /users/get-user-channel-profile/{username} — subscriber counts plus
/// whether the caller is subscribed.
pub async fn get_channel_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse> {
    let username = username.trim().to_lowercase();
    if username.is_empty() {
        return Err(AppError::Validation("Username is required.".into()));
    }

    let caller_id = current.id.to_string();
    let profile = blocking_db(&state, move |db| db.channel_profile(&username, &caller_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Channel not found.".into()))?;

    Ok(Json(ApiResponse::new(
        200,
        dto::channel_profile_response(&profile),
        "Channel profile retrieved successfully.",
    )))
}

/// GET /users/get-user-watch-history — watched videos, newest-first, each
/// with its owner reduced to a minimal profile.
pub async fn get_watch_history(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let id = current.id.to_string();
    let rows = blocking_db(&state, move |db| db.watch_history(&id)).await?;

    let videos: Vec<_> = rows.iter().map(dto::video_response).collect();
    Ok(Json(ApiResponse::new(
        200,
        videos,
        "Watch history retrieved successfully.",
    )))
}

use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use viewtube_db::videos::VideoSort;
use viewtube_types::api::{ApiResponse, Page};

use crate::auth::AppState;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::{blocking_db, dto, uploads};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Case-insensitive title filter.
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub user_id: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

pub(crate) fn page_params(page: u32, limit: u32) -> Result<(u32, u32)> {
    if page == 0 || limit == 0 {
        return Err(AppError::Validation(
            "Page number and limit must be positive.".into(),
        ));
    }
    Ok((page, limit.min(100)))
}

fn parse_sort(sort_by: Option<&str>, sort_type: Option<&str>) -> Result<(VideoSort, bool)> {
    let sort = match sort_by.unwrap_or("createdAt") {
        "createdAt" => VideoSort::CreatedAt,
        "views" => VideoSort::Views,
        "duration" => VideoSort::Duration,
        "title" => VideoSort::Title,
        other => {
            return Err(AppError::Validation(format!(
                "Invalid sort field '{other}'."
            )));
        }
    };

    let ascending = match sort_type.unwrap_or("desc").to_lowercase().as_str() {
        "asc" => true,
        "desc" => false,
        _ => {
            return Err(AppError::Validation(
                "Invalid sort type, use 'asc' or 'desc'.".into(),
            ));
        }
    };

    Ok((sort, ascending))
}

/// POST /videos/publish — multipart: title, description, videoFile,
/// thumbnail. Duration comes from the uploaded container, never the client.
pub async fn publish_video(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let form = uploads::collect(multipart).await?;

    let (Some(title), Some(description)) = (form.text("title"), form.text("description")) else {
        return Err(AppError::Validation(
            "Title and description are required.".into(),
        ));
    };

    let (Some(video_file), Some(thumbnail)) = (form.file("videoFile"), form.file("thumbnail"))
    else {
        return Err(AppError::Validation(
            "Both video file & thumbnail are required.".into(),
        ));
    };

    let stored_video = uploads::store_video(&state, video_file).await?;
    let stored_thumbnail = uploads::store_image(&state, thumbnail).await?;

    let duration = stored_video
        .duration
        .ok_or_else(|| AppError::Upload("Failed to extract video duration.".into()))?;

    let video_id = Uuid::new_v4().to_string();
    {
        let (id, owner_id) = (video_id.clone(), current.id.to_string());
        let (title, description) = (title.to_string(), description.to_string());
        let (video_url, thumbnail_url) = (stored_video.url.clone(), stored_thumbnail.url.clone());
        blocking_db(&state, move |db| {
            db.insert_video(
                &id,
                &owner_id,
                &title,
                &description,
                &video_url,
                &thumbnail_url,
                duration,
            )
        })
        .await?;
    }

    let created = blocking_db(&state, move |db| db.get_video(&video_id))
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("video missing after insert")))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            201,
            dto::video_response(&created),
            "Video published successfully.",
        )),
    ))
}

/// GET /videos/get-all-videos — owner-scoped listing (the caller's own
/// videos unless userId says otherwise) with pagination and sorting.
pub async fn get_all_videos(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<VideoListQuery>,
) -> Result<impl IntoResponse> {
    let (page, limit) = page_params(query.page, query.limit)?;
    let (sort, ascending) = parse_sort(query.sort_by.as_deref(), query.sort_type.as_deref())?;

    let owner_id = match &query.user_id {
        Some(raw) => raw
            .parse::<Uuid>()
            .map_err(|_| AppError::Validation("Invalid userId provided.".into()))?
            .to_string(),
        None => current.id.to_string(),
    };

    let title_query = query
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string);

    let offset = (page - 1).saturating_mul(limit);
    let (rows, total) = blocking_db(&state, move |db| {
        db.list_videos(&owner_id, title_query.as_deref(), sort, ascending, limit, offset)
    })
    .await?;

    let videos: Vec<_> = rows.iter().map(dto::video_response).collect();
    Ok(Json(ApiResponse::new(
        200,
        Page::new(videos, total, page, limit),
        "Videos retrieved successfully.",
    )))
}

/// GET /videos/get-video/{id} — also bumps the view count and records the
/// video in the caller's watch history.
pub async fn get_video(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let video_id = id.to_string();
    {
        let id = video_id.clone();
        blocking_db(&state, move |db| db.increment_views(&id)).await?;
    }

    let video = {
        let id = video_id.clone();
        blocking_db(&state, move |db| db.get_video(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found.".into()))?
    };

    let caller_id = current.id.to_string();
    blocking_db(&state, move |db| db.record_watch(&caller_id, &video_id)).await?;

    Ok(Json(ApiResponse::new(
        200,
        dto::video_response(&video),
        "Video retrieved successfully.",
    )))
}

/// PATCH /videos/update-video/{id} — multipart; partial title/description
/// plus an optional replacement thumbnail. Owner only.
pub async fn update_video(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let form = uploads::collect(multipart).await?;

    let title = form.text("title").map(str::to_string);
    let description = form.text("description").map(str::to_string);
    let thumbnail_file = form.file("thumbnail");

    if title.is_none() && description.is_none() && thumbnail_file.is_none() {
        return Err(AppError::BadRequest(
            "At least one field (title, description, thumbnail) must be provided.".into(),
        ));
    }

    let video_id = id.to_string();
    let existing = {
        let id = video_id.clone();
        blocking_db(&state, move |db| db.get_video(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found.".into()))?
    };

    if existing.video.owner_id != current.id.to_string() {
        return Err(AppError::Forbidden(
            "You are not authorized to update this video.".into(),
        ));
    }

    let thumbnail = match thumbnail_file {
        Some(file) => Some(uploads::store_image(&state, file).await?.url),
        None => None,
    };

    {
        let id = video_id.clone();
        blocking_db(&state, move |db| {
            db.update_video(&id, title.as_deref(), description.as_deref(), thumbnail.as_deref())
        })
        .await?;
    }

    let updated = blocking_db(&state, move |db| db.get_video(&video_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found.".into()))?;

    Ok(Json(ApiResponse::new(
        200,
        dto::video_response(&updated),
        "Video updated successfully.",
    )))
}

/// DELETE /videos/delete-video/{id} — owner only; permanent.
pub async fn delete_video(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let video_id = id.to_string();
    let existing = {
        let id = video_id.clone();
        blocking_db(&state, move |db| db.get_video(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found.".into()))?
    };

    if existing.video.owner_id != current.id.to_string() {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this video.".into(),
        ));
    }

    blocking_db(&state, move |db| db.delete_video(&video_id)).await?;

    Ok(Json(ApiResponse::new(
        200,
        (),
        "Video deleted successfully.",
    )))
}

/// PATCH /videos/publish/{id} — flip the publish flag. Owner only.
pub async fn toggle_publish_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let video_id = id.to_string();
    let existing = {
        let id = video_id.clone();
        blocking_db(&state, move |db| db.get_video(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found.".into()))?
    };

    if existing.video.owner_id != current.id.to_string() {
        return Err(AppError::Forbidden(
            "You are not authorized to update this video.".into(),
        ));
    }

    let published = blocking_db(&state, move |db| db.toggle_publish(&video_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found.".into()))?;

    let message = if published {
        "Video published."
    } else {
        "Video unpublished."
    };
    Ok(Json(ApiResponse::new(200, published, message)))
}

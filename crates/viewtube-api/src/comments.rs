use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use viewtube_types::api::{ApiResponse, CommentRequest, Page};

use crate::auth::AppState;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::videos::page_params;
use crate::{blocking_db, dto};

#[derive(Debug, Deserialize)]
pub struct CommentListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

fn required_content(content: &str) -> Result<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Content is required.".into()));
    }
    Ok(trimmed)
}

/// POST /comments/create-comment/{videoId}
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(video_id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> Result<impl IntoResponse> {
    let content = required_content(&req.content)?.to_string();

    let video_id = video_id.to_string();
    {
        let id = video_id.clone();
        blocking_db(&state, move |db| db.get_video(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found.".into()))?;
    }

    let comment_id = Uuid::new_v4().to_string();
    {
        let (id, owner_id) = (comment_id.clone(), current.id.to_string());
        blocking_db(&state, move |db| {
            db.insert_comment(&id, &video_id, &owner_id, &content)
        })
        .await?;
    }

    let created = blocking_db(&state, move |db| db.get_comment_with_owner(&comment_id))
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("comment missing after insert")))?;

    Ok(Json(ApiResponse::new(
        200,
        dto::comment_response(&created),
        "Comment added successfully.",
    )))
}

/// GET /comments/get-comments/{videoId} — owner-joined, newest-first page.
pub async fn get_comments(
    State(state): State<AppState>,
    Extension(_current): Extension<CurrentUser>,
    Path(video_id): Path<Uuid>,
    Query(query): Query<CommentListQuery>,
) -> Result<impl IntoResponse> {
    let (page, limit) = page_params(query.page, query.limit)?;

    let video_id = video_id.to_string();
    {
        let id = video_id.clone();
        blocking_db(&state, move |db| db.get_video(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found.".into()))?;
    }

    let offset = (page - 1).saturating_mul(limit);
    let (rows, total) = blocking_db(&state, move |db| {
        db.comments_by_video(&video_id, limit, offset)
    })
    .await?;

    let comments: Vec<_> = rows.iter().map(dto::comment_response).collect();
    Ok(Json(ApiResponse::new(
        200,
        Page::new(comments, total, page, limit),
        "Comments retrieved successfully.",
    )))
}

/// PATCH /comments/update-comment/{commentId} — owner only.
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(comment_id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> Result<impl IntoResponse> {
    let content = required_content(&req.content)?.to_string();

    let comment_id = comment_id.to_string();
    let existing = {
        let id = comment_id.clone();
        blocking_db(&state, move |db| db.get_comment(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found.".into()))?
    };

    if existing.owner_id != current.id.to_string() {
        return Err(AppError::Forbidden(
            "You are not authorized to update this comment.".into(),
        ));
    }

    {
        let id = comment_id.clone();
        blocking_db(&state, move |db| db.update_comment(&id, &content)).await?;
    }

    let updated = blocking_db(&state, move |db| db.get_comment_with_owner(&comment_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found.".into()))?;

    Ok(Json(ApiResponse::new(
        200,
        dto::comment_response(&updated),
        "Comment updated successfully.",
    )))
}

/// DELETE /comments/delete-comment/{commentId} — owner only; permanent.
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(comment_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let comment_id = comment_id.to_string();
    let existing = {
        let id = comment_id.clone();
        blocking_db(&state, move |db| db.get_comment(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found.".into()))?
    };

    if existing.owner_id != current.id.to_string() {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this comment.".into(),
        ));
    }

    blocking_db(&state, move |db| db.delete_comment(&comment_id)).await?;

    Ok(Json(ApiResponse::new(
        200,
        (),
        "Comment deleted successfully.",
    )))
}

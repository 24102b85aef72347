//! Channel dashboard: aggregate statistics and the caller's own uploads.

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use viewtube_db::videos::VideoSort;
use viewtube_types::api::{ApiResponse, Page};

use crate::auth::AppState;
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::videos::page_params;
use crate::{blocking_db, dto};

#[derive(Debug, Deserialize)]
pub struct ChannelVideosQuery {
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

/// GET /dashboard/get-channel-stats — totals over the caller's videos.
pub async fn get_channel_stats(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let owner_id = current.id.to_string();
    let stats = blocking_db(&state, move |db| db.channel_stats(&owner_id)).await?;

    Ok(Json(ApiResponse::new(
        200,
        dto::channel_stats_response(&stats),
        "Channel statistics retrieved successfully.",
    )))
}

/// GET /dashboard/get-channel-videos — the caller's uploads, newest-first.
pub async fn get_channel_videos(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ChannelVideosQuery>,
) -> Result<impl IntoResponse> {
    let (page, limit) = page_params(query.page, query.limit)?;

    let owner_id = current.id.to_string();
    let offset = (page - 1).saturating_mul(limit);
    let (rows, total) = blocking_db(&state, move |db| {
        db.list_videos(&owner_id, None, VideoSort::CreatedAt, false, limit, offset)
    })
    .await?;

    let videos: Vec<_> = rows.iter().map(dto::video_response).collect();
    Ok(Json(ApiResponse::new(
        200,
        Page::new(videos, total, page, limit),
        "Channel videos retrieved successfully.",
    )))
}

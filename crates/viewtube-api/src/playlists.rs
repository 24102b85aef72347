use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use viewtube_db::models::PlaylistRow;
use viewtube_types::api::{ApiResponse, CreatePlaylistRequest, UpdatePlaylistRequest};

use crate::auth::AppState;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::{blocking_db, dto};

/// Fetch a playlist and check the caller owns it.
async fn owned_playlist(
    state: &AppState,
    current: &CurrentUser,
    playlist_id: &str,
    action: &str,
) -> Result<PlaylistRow> {
    let id = playlist_id.to_string();
    let playlist = blocking_db(state, move |db| db.get_playlist(&id))
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found.".into()))?;

    if playlist.owner_id != current.id.to_string() {
        return Err(AppError::Forbidden(format!(
            "You are not authorized to {action} this playlist."
        )));
    }
    Ok(playlist)
}

/// POST /playlists/create-playlist
pub async fn create_playlist(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<impl IntoResponse> {
    let name = req.name.trim().to_string();
    let description = req.description.trim().to_string();
    if name.is_empty() || description.is_empty() {
        return Err(AppError::Validation(
            "Name and description are required.".into(),
        ));
    }

    let playlist_id = Uuid::new_v4().to_string();
    {
        let (id, owner_id) = (playlist_id.clone(), current.id.to_string());
        blocking_db(&state, move |db| {
            db.insert_playlist(&id, &owner_id, &name, &description)
        })
        .await?;
    }

    let created = blocking_db(&state, move |db| db.get_playlist_with_videos(&playlist_id))
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("playlist missing after insert")))?;

    Ok(Json(ApiResponse::new(
        200,
        dto::playlist_response(&created),
        "Playlist created successfully.",
    )))
}

/// GET /playlists/get-all-playlist/{userId}
pub async fn get_user_playlists(
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

    let rows = blocking_db(&state, move |db| db.playlists_by_owner(&user_id)).await?;

    let playlists: Vec<_> = rows.iter().map(dto::playlist_response).collect();
    Ok(Json(ApiResponse::new(
        200,
        playlists,
        "Playlists retrieved successfully.",
    )))
}

/// GET /playlists/get-playlist-by-id/{playlistId}
pub async fn get_playlist_by_id(
    State(state): State<AppState>,
    Extension(_current): Extension<CurrentUser>,
    Path(playlist_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let playlist_id = playlist_id.to_string();
    let playlist = blocking_db(&state, move |db| db.get_playlist_with_videos(&playlist_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found.".into()))?;

    Ok(Json(ApiResponse::new(
        200,
        dto::playlist_response(&playlist),
        "Playlist retrieved successfully.",
    )))
}

/// PATCH /playlists/update-playlist/{playlistId} — owner only; partial.
pub async fn update_playlist(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(playlist_id): Path<Uuid>,
    Json(req): Json<UpdatePlaylistRequest>,
) -> Result<impl IntoResponse> {
    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let description = req
        .description
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    if name.is_none() && description.is_none() {
        return Err(AppError::Validation(
            "At least one field (name, description) must be provided.".into(),
        ));
    }

    let playlist_id = playlist_id.to_string();
    owned_playlist(&state, &current, &playlist_id, "update").await?;

    {
        let id = playlist_id.clone();
        blocking_db(&state, move |db| {
            db.update_playlist(&id, name.as_deref(), description.as_deref())
        })
        .await?;
    }

    let updated = blocking_db(&state, move |db| db.get_playlist_with_videos(&playlist_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found.".into()))?;

    Ok(Json(ApiResponse::new(
        200,
        dto::playlist_response(&updated),
        "Playlist updated successfully.",
    )))
}

/// DELETE /playlists/delete-playlist/{playlistId} — owner only; permanent.
pub async fn delete_playlist(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(playlist_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let playlist_id = playlist_id.to_string();
    owned_playlist(&state, &current, &playlist_id, "delete").await?;

    blocking_db(&state, move |db| db.delete_playlist(&playlist_id)).await?;

    Ok(Json(ApiResponse::new(
        200,
        (),
        "Playlist deleted successfully.",
    )))
}

/// POST /playlists/add-video-to-playlist/{videoId}/{playlistId} — owner
/// only; a video may appear in a playlist at most once.
pub async fn add_video_to_playlist(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((video_id, playlist_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let playlist_id = playlist_id.to_string();
    owned_playlist(&state, &current, &playlist_id, "modify").await?;

    let video_id = video_id.to_string();
    {
        let id = video_id.clone();
        blocking_db(&state, move |db| db.get_video(&id))
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found.".into()))?;
    }

    let added = {
        let playlist_id = playlist_id.clone();
        blocking_db(&state, move |db| {
            db.add_video_to_playlist(&playlist_id, &video_id)
        })
        .await?
    };
    if !added {
        return Err(AppError::Conflict(
            "Video already exists in the playlist.".into(),
        ));
    }

    let updated = blocking_db(&state, move |db| db.get_playlist_with_videos(&playlist_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found.".into()))?;

    Ok(Json(ApiResponse::new(
        200,
        dto::playlist_response(&updated),
        "Video added to playlist successfully.",
    )))
}

/// POST /playlists/remove-video-from-playlist/{videoId}/{playlistId} —
/// owner only.
pub async fn remove_video_from_playlist(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((video_id, playlist_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let playlist_id = playlist_id.to_string();
    owned_playlist(&state, &current, &playlist_id, "modify").await?;

    let removed = {
        let playlist_id = playlist_id.clone();
        let video_id = video_id.to_string();
        blocking_db(&state, move |db| {
            db.remove_video_from_playlist(&playlist_id, &video_id)
        })
        .await?
    };
    if !removed {
        return Err(AppError::NotFound(
            "Video not found in the playlist.".into(),
        ));
    }

    let updated = blocking_db(&state, move |db| db.get_playlist_with_videos(&playlist_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found.".into()))?;

    Ok(Json(ApiResponse::new(
        200,
        dto::playlist_response(&updated),
        "Video removed from playlist successfully.",
    )))
}

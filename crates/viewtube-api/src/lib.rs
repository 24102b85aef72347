pub mod auth;
pub mod comments;
pub mod config;
pub mod dashboard;
mod dto;
pub mod error;
pub mod healthcheck;
pub mod likes;
pub mod middleware;
pub mod password;
pub mod playlists;
pub mod subscriptions;
pub mod tokens;
pub mod tweets;
pub mod uploads;
pub mod users;
pub mod videos;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use auth::AppState;
use error::AppError;

/// 100 MB ceiling for multipart uploads (video files included).
const MAX_UPLOAD_SIZE: usize = 100 * 1024 * 1024;

/// Run a blocking database call off the async runtime.
pub(crate) async fn blocking_db<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&viewtube_db::Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            tracing::error!("spawn_blocking join error: {}", e);
            AppError::Internal(anyhow::anyhow!("blocking task failed: {e}"))
        })?
        .map_err(AppError::from_db)
}

/// Build the full application router. Shared between the server binary and
/// the integration tests.
pub fn app(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/healthcheck", get(healthcheck::healthcheck))
        .route("/users/register", post(auth::register))
        .route("/users/login", post(auth::login))
        .route("/users/refresh-token", post(auth::refresh_access_token))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/users/logout", post(auth::logout))
        .route("/users/change-password", post(auth::change_password))
        .route("/users/get-user", get(users::get_user))
        .route("/users/update-user", patch(users::update_user))
        .route("/users/avatar", patch(users::update_avatar))
        .route("/users/cover-image", patch(users::update_cover_image))
        .route(
            "/users/get-user-channel-profile/{username}",
            get(users::get_channel_profile),
        )
        .route("/users/get-user-watch-history", get(users::get_watch_history))
        .route("/videos/publish", post(videos::publish_video))
        .route("/videos/get-all-videos", get(videos::get_all_videos))
        .route("/videos/get-video/{id}", get(videos::get_video))
        .route("/videos/update-video/{id}", patch(videos::update_video))
        .route("/videos/delete-video/{id}", delete(videos::delete_video))
        .route("/videos/publish/{id}", patch(videos::toggle_publish_status))
        .route("/comments/create-comment/{video_id}", post(comments::add_comment))
        .route("/comments/get-comments/{video_id}", get(comments::get_comments))
        .route(
            "/comments/update-comment/{comment_id}",
            patch(comments::update_comment),
        )
        .route(
            "/comments/delete-comment/{comment_id}",
            delete(comments::delete_comment),
        )
        .route("/tweets/create-tweet", post(tweets::create_tweet))
        .route("/tweets/get-tweets/{user_id}", get(tweets::get_tweets))
        .route("/tweets/update-tweet/{tweet_id}", patch(tweets::update_tweet))
        .route("/tweets/delete-tweet/{tweet_id}", delete(tweets::delete_tweet))
        .route("/likes/toggle-video-like/{video_id}", post(likes::toggle_video_like))
        .route(
            "/likes/toggle-comment-like/{comment_id}",
            post(likes::toggle_comment_like),
        )
        .route("/likes/toggle-tweet-like/{tweet_id}", post(likes::toggle_tweet_like))
        .route("/likes/get-liked-videos", get(likes::get_liked_videos))
        .route(
            "/subscriptions/toggle/{channel_id}",
            post(subscriptions::toggle_subscription),
        )
        .route("/subscriptions/get-subscribers", get(subscriptions::get_subscribers))
        .route(
            "/subscriptions/get-subscribed-channels",
            get(subscriptions::get_subscribed_channels),
        )
        .route("/playlists/create-playlist", post(playlists::create_playlist))
        .route(
            "/playlists/get-all-playlist/{user_id}",
            get(playlists::get_user_playlists),
        )
        .route(
            "/playlists/get-playlist-by-id/{playlist_id}",
            get(playlists::get_playlist_by_id),
        )
        .route(
            "/playlists/update-playlist/{playlist_id}",
            patch(playlists::update_playlist),
        )
        .route(
            "/playlists/delete-playlist/{playlist_id}",
            delete(playlists::delete_playlist),
        )
        .route(
            "/playlists/add-video-to-playlist/{video_id}/{playlist_id}",
            post(playlists::add_video_to_playlist),
        )
        .route(
            "/playlists/remove-video-from-playlist/{video_id}/{playlist_id}",
            post(playlists::remove_video_from_playlist),
        )
        .route("/dashboard/get-channel-stats", get(dashboard::get_channel_stats))
        .route("/dashboard/get-channel-videos", get(dashboard::get_channel_videos))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .with_state(state.clone());

    Router::new()
        .nest("/api/v1", public_routes.merge(protected_routes))
        .nest_service("/media", ServeDir::new(state.media.root().to_path_buf()))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

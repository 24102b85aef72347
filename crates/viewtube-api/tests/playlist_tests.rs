//! Playlist CRUD and membership tests.

use axum::http::StatusCode;
use serde_json::json;

mod common;

async fn create_playlist(app: &axum::Router, token: &str, name: &str) -> String {
    let (status, json) = common::send(
        app,
        common::post_json(
            "/api/v1/playlists/create-playlist",
            Some(token),
            &json!({ "name": name, "description": "test playlist" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create playlist failed: {json}");
    json["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_requires_name_and_description() {
    let (app, _state) = common::create_test_app().await;
    let (access, _) = common::register_and_login(&app, "alice").await;

    let (status, _) = common::send(
        &app,
        common::post_json(
            "/api/v1/playlists/create-playlist",
            Some(&access),
            &json!({ "name": "  ", "description": "no name" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn a_video_cannot_appear_twice_in_a_playlist() {
    let (app, _state) = common::create_test_app().await;
    let (access, _) = common::register_and_login(&app, "alice").await;
    let video_id = common::publish_video(&app, &access, "Playlist fodder").await;
    let playlist_id = create_playlist(&app, &access, "Favorites").await;

    let uri = format!("/api/v1/playlists/add-video-to-playlist/{video_id}/{playlist_id}");
    let (status, json) = common::send(&app, common::post_empty(&uri, Some(&access))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["videos"].as_array().unwrap().len(), 1);

    let (status, _) = common::send(&app, common::post_empty(&uri, Some(&access))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, json) = common::send(
        &app,
        common::get(
            &format!("/api/v1/playlists/get-playlist-by-id/{playlist_id}"),
            Some(&access),
        ),
    )
    .await;
    assert_eq!(json["data"]["videos"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn remove_video_round_trip() {
    let (app, _state) = common::create_test_app().await;
    let (access, _) = common::register_and_login(&app, "alice").await;
    let video_id = common::publish_video(&app, &access, "Here today").await;
    let playlist_id = create_playlist(&app, &access, "Shortlist").await;

    let add = format!("/api/v1/playlists/add-video-to-playlist/{video_id}/{playlist_id}");
    common::send(&app, common::post_empty(&add, Some(&access))).await;

    let remove = format!("/api/v1/playlists/remove-video-from-playlist/{video_id}/{playlist_id}");
    let (status, json) = common::send(&app, common::post_empty(&remove, Some(&access))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["videos"].as_array().unwrap().len(), 0);

    // Removing again reports the video as absent
    let (status, _) = common::send(&app, common::post_empty(&remove, Some(&access))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn playlist_mutations_are_owner_only() {
    let (app, _state) = common::create_test_app().await;
    let (alice, _) = common::register_and_login(&app, "alice").await;
    let (bob, _) = common::register_and_login(&app, "bob").await;
    let video_id = common::publish_video(&app, &alice, "Mine").await;
    let playlist_id = create_playlist(&app, &alice, "Alice's mix").await;

    let (status, _) = common::send(
        &app,
        common::patch_json(
            &format!("/api/v1/playlists/update-playlist/{playlist_id}"),
            Some(&bob),
            &json!({ "name": "Bob's mix now" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = common::send(
        &app,
        common::delete(
            &format!("/api/v1/playlists/delete-playlist/{playlist_id}"),
            Some(&bob),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = common::send(
        &app,
        common::post_empty(
            &format!("/api/v1/playlists/add-video-to-playlist/{video_id}/{playlist_id}"),
            Some(&bob),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Reads are open to any authenticated user
    let (status, _) = common::send(
        &app,
        common::get(
            &format!("/api/v1/playlists/get-playlist-by-id/{playlist_id}"),
            Some(&bob),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn partial_update_keeps_the_other_field() {
    let (app, _state) = common::create_test_app().await;
    let (access, user_id) = common::register_and_login(&app, "alice").await;
    let playlist_id = create_playlist(&app, &access, "Original name").await;

    let (status, json) = common::send(
        &app,
        common::patch_json(
            &format!("/api/v1/playlists/update-playlist/{playlist_id}"),
            Some(&access),
            &json!({ "name": "Renamed" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Renamed");
    assert_eq!(json["data"]["description"], "test playlist");

    // Listing by user includes it
    let (_, json) = common::send(
        &app,
        common::get(
            &format!("/api/v1/playlists/get-all-playlist/{user_id}"),
            Some(&access),
        ),
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["owner"]["username"], "alice");
}

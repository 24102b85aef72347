//! Comment/tweet CRUD, like toggles, and subscription tests.

use axum::http::StatusCode;
use serde_json::json;

mod common;

async fn setup_video() -> (axum::Router, String, String, String) {
    let (app, _state) = common::create_test_app().await;
    let (alice, _) = common::register_and_login(&app, "alice").await;
    let (bob, _) = common::register_and_login(&app, "bob").await;
    let video_id = common::publish_video(&app, &alice, "Discussion piece").await;
    (app, alice, bob, video_id)
}

#[tokio::test]
async fn comment_lifecycle_with_ownership_checks() {
    let (app, alice, bob, video_id) = setup_video().await;

    // Bob comments on Alice's video
    let (status, json) = common::send(
        &app,
        common::post_json(
            &format!("/api/v1/comments/create-comment/{video_id}"),
            Some(&bob),
            &json!({ "content": "  great video!  " }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let comment_id = json["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(json["data"]["content"], "great video!");
    assert_eq!(json["data"]["owner"]["username"], "bob");
    assert!(json["data"]["owner"].get("password").is_none());

    // Alice does not own Bob's comment
    let (status, _) = common::send(
        &app,
        common::patch_json(
            &format!("/api/v1/comments/update-comment/{comment_id}"),
            Some(&alice),
            &json!({ "content": "edited by the channel" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = common::send(
        &app,
        common::delete(
            &format!("/api/v1/comments/delete-comment/{comment_id}"),
            Some(&alice),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Bob edits and deletes his own comment
    let (status, json) = common::send(
        &app,
        common::patch_json(
            &format!("/api/v1/comments/update-comment/{comment_id}"),
            Some(&bob),
            &json!({ "content": "even better on rewatch" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["content"], "even better on rewatch");

    let (status, _) = common::send(
        &app,
        common::delete(
            &format!("/api/v1/comments/delete-comment/{comment_id}"),
            Some(&bob),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::send(
        &app,
        common::patch_json(
            &format!("/api/v1/comments/update-comment/{comment_id}"),
            Some(&bob),
            &json!({ "content": "too late" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_comment_content_is_rejected() {
    let (app, _alice, bob, video_id) = setup_video().await;

    let (status, _) = common::send(
        &app,
        common::post_json(
            &format!("/api/v1/comments/create-comment/{video_id}"),
            Some(&bob),
            &json!({ "content": "   " }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn comments_paginate_newest_first() {
    let (app, _alice, bob, video_id) = setup_video().await;

    for i in 0..15 {
        let (status, _) = common::send(
            &app,
            common::post_json(
                &format!("/api/v1/comments/create-comment/{video_id}"),
                Some(&bob),
                &json!({ "content": format!("comment {i}") }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, json) = common::send(
        &app,
        common::get(
            &format!("/api/v1/comments/get-comments/{video_id}?page=2&limit=10"),
            Some(&bob),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 5);
    assert_eq!(json["data"]["total"], 15);

    // Listing for a nonexistent video is NotFound, not an empty page
    let (status, _) = common::send(
        &app,
        common::get(
            "/api/v1/comments/get-comments/00000000-0000-0000-0000-000000000042",
            Some(&bob),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tweet_lifecycle_with_ownership_checks() {
    let (app, _state) = common::create_test_app().await;
    let (alice, alice_id) = common::register_and_login(&app, "alice").await;
    let (bob, _) = common::register_and_login(&app, "bob").await;

    let (status, json) = common::send(
        &app,
        common::post_json(
            "/api/v1/tweets/create-tweet",
            Some(&alice),
            &json!({ "content": "first tweet" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let tweet_id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = common::send(
        &app,
        common::patch_json(
            &format!("/api/v1/tweets/update-tweet/{tweet_id}"),
            Some(&bob),
            &json!({ "content": "hijacked" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = common::send(
        &app,
        common::delete(&format!("/api/v1/tweets/delete-tweet/{tweet_id}"), Some(&bob)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = common::send(
        &app,
        common::get(&format!("/api/v1/tweets/get-tweets/{alice_id}"), Some(&bob)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["owner"]["username"], "alice");

    let (status, _) = common::send(
        &app,
        common::delete(
            &format!("/api/v1/tweets/delete-tweet/{tweet_id}"),
            Some(&alice),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn double_toggle_returns_a_like_to_its_original_state() {
    let (app, _alice, bob, video_id) = setup_video().await;

    let (status, json) = common::send(
        &app,
        common::post_empty(
            &format!("/api/v1/likes/toggle-video-like/{video_id}"),
            Some(&bob),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Video liked successfully.");

    let (_, json) = common::send(
        &app,
        common::post_empty(
            &format!("/api/v1/likes/toggle-video-like/{video_id}"),
            Some(&bob),
        ),
    )
    .await;
    assert_eq!(json["message"], "Video disliked successfully.");

    // Back to the original state: liked-videos is empty
    let (_, json) = common::send(
        &app,
        common::get("/api/v1/likes/get-liked-videos", Some(&bob)),
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn liked_videos_lists_what_the_user_currently_likes() {
    let (app, _alice, bob, video_id) = setup_video().await;

    common::send(
        &app,
        common::post_empty(
            &format!("/api/v1/likes/toggle-video-like/{video_id}"),
            Some(&bob),
        ),
    )
    .await;

    let (status, json) = common::send(
        &app,
        common::get("/api/v1/likes/get-liked-videos", Some(&bob)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let liked = json["data"].as_array().unwrap();
    assert_eq!(liked.len(), 1);
    assert_eq!(liked[0]["id"].as_str().unwrap(), video_id);
    assert_eq!(liked[0]["owner"]["username"], "alice");
}

#[tokio::test]
async fn liking_a_missing_target_is_not_found() {
    let (app, _state) = common::create_test_app().await;
    let (access, _) = common::register_and_login(&app, "alice").await;

    for uri in [
        "/api/v1/likes/toggle-video-like/00000000-0000-0000-0000-000000000042",
        "/api/v1/likes/toggle-comment-like/00000000-0000-0000-0000-000000000042",
        "/api/v1/likes/toggle-tweet-like/00000000-0000-0000-0000-000000000042",
    ] {
        let (status, _) = common::send(&app, common::post_empty(uri, Some(&access))).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "uri: {uri}");
    }
}

#[tokio::test]
async fn comment_likes_toggle_independently_of_video_likes() {
    let (app, alice, bob, video_id) = setup_video().await;

    let (_, json) = common::send(
        &app,
        common::post_json(
            &format!("/api/v1/comments/create-comment/{video_id}"),
            Some(&alice),
            &json!({ "content": "pinned comment" }),
        ),
    )
    .await;
    let comment_id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = common::send(
        &app,
        common::post_empty(
            &format!("/api/v1/likes/toggle-comment-like/{comment_id}"),
            Some(&bob),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Comment liked successfully.");

    // The comment like does not surface in liked videos
    let (_, json) = common::send(
        &app,
        common::get("/api/v1/likes/get-liked-videos", Some(&bob)),
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn self_subscription_is_rejected_before_the_toggle() {
    let (app, _state) = common::create_test_app().await;
    let (alice, alice_id) = common::register_and_login(&app, "alice").await;

    let (status, _) = common::send(
        &app,
        common::post_empty(
            &format!("/api/v1/subscriptions/toggle/{alice_id}"),
            Some(&alice),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // No subscription row was created
    let (_, json) = common::send(
        &app,
        common::get("/api/v1/subscriptions/get-subscribers", Some(&alice)),
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn subscription_toggle_updates_both_directions() {
    let (app, _state) = common::create_test_app().await;
    let (alice, alice_id) = common::register_and_login(&app, "alice").await;
    let (bob, _) = common::register_and_login(&app, "bob").await;

    let (status, json) = common::send(
        &app,
        common::post_empty(
            &format!("/api/v1/subscriptions/toggle/{alice_id}"),
            Some(&bob),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Channel subscribed successfully.");

    let (_, json) = common::send(
        &app,
        common::get("/api/v1/subscriptions/get-subscribers", Some(&alice)),
    )
    .await;
    let subscribers = json["data"].as_array().unwrap();
    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0]["username"], "bob");

    let (_, json) = common::send(
        &app,
        common::get("/api/v1/subscriptions/get-subscribed-channels", Some(&bob)),
    )
    .await;
    let channels = json["data"].as_array().unwrap();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0]["username"], "alice");

    // Unsubscribe
    let (_, json) = common::send(
        &app,
        common::post_empty(
            &format!("/api/v1/subscriptions/toggle/{alice_id}"),
            Some(&bob),
        ),
    )
    .await;
    assert_eq!(json["message"], "Channel unsubscribed successfully.");

    let (_, json) = common::send(
        &app,
        common::get("/api/v1/subscriptions/get-subscribers", Some(&alice)),
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn subscribing_to_a_missing_channel_is_not_found() {
    let (app, _state) = common::create_test_app().await;
    let (access, _) = common::register_and_login(&app, "alice").await;

    let (status, _) = common::send(
        &app,
        common::post_empty(
            "/api/v1/subscriptions/toggle/00000000-0000-0000-0000-000000000042",
            Some(&access),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

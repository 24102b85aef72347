//! Profile update tests: partial field updates and image replacement.

use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn update_user_applies_only_supplied_fields() {
    let (app, _state) = common::create_test_app().await;
    let (access, _) = common::register_and_login(&app, "alice").await;

    let (status, json) = common::send(
        &app,
        common::patch_json(
            "/api/v1/users/update-user",
            Some(&access),
            &json!({ "fullName": "Alice Renamed" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["fullName"], "Alice Renamed");
    assert_eq!(json["data"]["email"], "alice@example.com");
}

#[tokio::test]
async fn update_user_rejects_an_empty_patch() {
    let (app, _state) = common::create_test_app().await;
    let (access, _) = common::register_and_login(&app, "alice").await;

    let (status, _) = common::send(
        &app,
        common::patch_json(
            "/api/v1/users/update-user",
            Some(&access),
            &json!({ "fullName": "   " }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn update_user_cannot_steal_anothers_email() {
    let (app, _state) = common::create_test_app().await;
    common::register(&app, "bob").await;
    let (access, _) = common::register_and_login(&app, "alice").await;

    let (status, _) = common::send(
        &app,
        common::patch_json(
            "/api/v1/users/update-user",
            Some(&access),
            &json!({ "email": "bob@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn avatar_replacement_changes_the_stored_url() {
    let (app, _state) = common::create_test_app().await;
    let (access, _) = common::register_and_login(&app, "alice").await;

    let (_, before) = common::send(&app, common::get("/api/v1/users/get-user", Some(&access))).await;
    let old_avatar = before["data"]["avatar"].as_str().unwrap().to_string();

    let req = common::multipart_request(
        "PATCH",
        "/api/v1/users/avatar",
        Some(&access),
        &[],
        &[("avatar", "new-avatar.png", b"fresh avatar bytes")],
    );
    let (status, json) = common::send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    let new_avatar = json["data"]["avatar"].as_str().unwrap();
    assert_ne!(new_avatar, old_avatar);
    assert!(new_avatar.starts_with("http://localhost:3000/media/"));
}

#[tokio::test]
async fn avatar_update_without_a_file_is_rejected() {
    let (app, _state) = common::create_test_app().await;
    let (access, _) = common::register_and_login(&app, "alice").await;

    let req = common::multipart_request("PATCH", "/api/v1/users/avatar", Some(&access), &[], &[]);
    let (status, _) = common::send(&app, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn cover_image_starts_absent_and_can_be_set() {
    let (app, _state) = common::create_test_app().await;
    let (access, _) = common::register_and_login(&app, "alice").await;

    let (_, json) = common::send(&app, common::get("/api/v1/users/get-user", Some(&access))).await;
    assert!(json["data"]["coverImage"].is_null());

    let req = common::multipart_request(
        "PATCH",
        "/api/v1/users/cover-image",
        Some(&access),
        &[],
        &[("coverImage", "cover.png", b"cover image bytes")],
    );
    let (status, json) = common::send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        json["data"]["coverImage"]
            .as_str()
            .unwrap()
            .starts_with("http://localhost:3000/media/")
    );
}

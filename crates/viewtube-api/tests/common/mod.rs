//! Shared harness for router-level tests: in-memory database, throwaway
//! media directory, and request/multipart builders.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use viewtube_api::auth::{AppState, AppStateInner};
use viewtube_api::config::Config;
use viewtube_db::Database;
use viewtube_media::MediaStore;

pub const BOUNDARY: &str = "viewtube-test-boundary";

/// Arbitrary bytes standing in for an image upload.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-a-png-but-good-enough";

pub async fn create_test_app() -> (Router, AppState) {
    let db = Database::open_in_memory().expect("in-memory database");
    let media_root = std::env::temp_dir().join(format!("viewtube-test-{}", Uuid::new_v4()));
    let media = MediaStore::new(media_root, "http://localhost:3000/media")
        .await
        .expect("media store");

    let state: AppState = Arc::new(AppStateInner {
        db,
        media,
        config: Config::for_tests(),
    });

    (viewtube_api::app(state.clone()), state)
}

/// A minimal MP4: a `moov` box holding an `mvhd` with the given duration.
pub fn fake_mp4(duration_secs: f64) -> Vec<u8> {
    let timescale: u32 = 1000;
    let duration = (duration_secs * f64::from(timescale)) as u32;

    let mut mvhd_payload = vec![0u8; 100];
    mvhd_payload[12..16].copy_from_slice(&timescale.to_be_bytes());
    mvhd_payload[16..20].copy_from_slice(&duration.to_be_bytes());

    let mut mvhd = ((mvhd_payload.len() as u32 + 8).to_be_bytes()).to_vec();
    mvhd.extend_from_slice(b"mvhd");
    mvhd.extend_from_slice(&mvhd_payload);

    let mut moov = ((mvhd.len() as u32 + 8).to_be_bytes()).to_vec();
    moov.extend_from_slice(b"moov");
    moov.extend_from_slice(&mvhd);
    moov
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, filename, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn with_auth(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(t) => builder.header(header::AUTHORIZATION, format!("Bearer {t}")),
        None => builder,
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    with_auth(Request::builder().method("GET").uri(uri), token)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    with_auth(Request::builder().method("POST").uri(uri), token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn patch_json(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    with_auth(Request::builder().method("PATCH").uri(uri), token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    with_auth(Request::builder().method("DELETE").uri(uri), token)
        .body(Body::empty())
        .unwrap()
}

pub fn post_empty(uri: &str, token: Option<&str>) -> Request<Body> {
    with_auth(Request::builder().method("POST").uri(uri), token)
        .body(Body::empty())
        .unwrap()
}

pub fn multipart_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    fields: &[(&str, &str)],
    files: &[(&str, &str, &[u8])],
) -> Request<Body> {
    with_auth(Request::builder().method(method).uri(uri), token)
        .header(header::CONTENT_TYPE, multipart_content_type())
        .body(Body::from(multipart_body(fields, files)))
        .unwrap()
}

/// Fire a request and decode the JSON envelope.
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Fire a request and return the raw response (for cookie assertions).
pub async fn send_raw(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// Register a user through the real multipart endpoint. Returns the
/// sanitized user object from the response envelope.
pub async fn register(app: &Router, username: &str) -> Value {
    let full_name = format!("{username} Smith");
    let email = format!("{username}@example.com");
    let fields: Vec<(&str, &str)> = vec![
        ("fullName", full_name.as_str()),
        ("email", email.as_str()),
        ("username", username),
        ("password", "password123"),
    ];
    let req = multipart_request(
        "POST",
        "/api/v1/users/register",
        None,
        &fields,
        &[("avatar", "avatar.png", PNG_BYTES)],
    );

    let (status, json) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {json}");
    json["data"].clone()
}

/// Login and return (accessToken, refreshToken).
pub async fn login(app: &Router, username: &str, password: &str) -> (String, String) {
    let (status, json) = send(
        app,
        post_json(
            "/api/v1/users/login",
            None,
            &serde_json::json!({ "username": username, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {json}");

    (
        json["data"]["accessToken"].as_str().unwrap().to_string(),
        json["data"]["refreshToken"].as_str().unwrap().to_string(),
    )
}

/// Register + login in one step. Returns (access token, user id).
pub async fn register_and_login(app: &Router, username: &str) -> (String, String) {
    let user = register(app, username).await;
    let user_id = user["id"].as_str().unwrap().to_string();
    let (access, _) = login(app, username, "password123").await;
    (access, user_id)
}

/// Publish a video as the given user; returns the video id.
pub async fn publish_video(app: &Router, token: &str, title: &str) -> String {
    let req = multipart_request(
        "POST",
        "/api/v1/videos/publish",
        Some(token),
        &[("title", title), ("description", "a test upload")],
        &[
            ("videoFile", "clip.mp4", &fake_mp4(12.5)),
            ("thumbnail", "thumb.png", PNG_BYTES),
        ],
    );

    let (status, json) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "publish failed: {json}");
    json["data"]["id"].as_str().unwrap().to_string()
}

use std::sync::Arc;

use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use viewtube_db::Database;
use viewtube_db::models::UserRow;
use viewtube_media::MediaStore;
use viewtube_types::api::{
    ApiResponse, ChangePasswordRequest, LoginRequest, LoginResponse, RefreshRequest,
    TokenPairResponse,
};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::{blocking_db, dto, password, tokens, uploads};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub media: MediaStore,
    pub config: Config,
}

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

fn auth_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

fn expired_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

/// Sign a fresh access+refresh pair and persist the refresh token on the
/// user record, overwriting any prior value. The overwrite is what
/// invalidates the previous session's refresh token.
async fn issue_token_pair(state: &AppState, user: &UserRow) -> Result<(String, String)> {
    let access = tokens::sign_access_token(user, &state.config)?;

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("corrupt user id '{}': {e}", user.id)))?;
    let refresh = tokens::sign_refresh_token(user_id, &state.config)?;

    let id = user.id.clone();
    let persisted = refresh.clone();
    blocking_db(state, move |db| db.set_refresh_token(&id, Some(&persisted))).await?;

    Ok((access, refresh))
}

/// POST /users/register — multipart: text fields plus a required avatar and
/// an optional cover image.
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let form = uploads::collect(multipart).await?;

    let (Some(full_name), Some(email), Some(username), Some(plain_password)) = (
        form.text("fullName"),
        form.text("email"),
        form.text("username"),
        form.text("password"),
    ) else {
        return Err(AppError::Validation("All the fields are required.".into()));
    };

    if username.len() < 3 || username.len() > 32 {
        return Err(AppError::Validation(
            "Username must be between 3 and 32 characters.".into(),
        ));
    }
    if plain_password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters.".into(),
        ));
    }

    let username = username.to_lowercase();
    let email = email.to_lowercase();

    let avatar_file = form
        .file("avatar")
        .ok_or_else(|| AppError::Validation("Avatar is required.".into()))?;

    // Duplicate check before any media is written.
    let (u, e) = (username.clone(), email.clone());
    if blocking_db(&state, move |db| db.user_exists(&u, &e)).await? {
        return Err(AppError::Conflict(
            "User with given username or email already exists.".into(),
        ));
    }

    let avatar = uploads::store_image(&state, avatar_file).await?;
    let cover_image = match form.file("coverImage") {
        Some(file) => Some(uploads::store_image(&state, file).await?.url),
        None => None,
    };

    let password_hash = password::hash_password(plain_password)?;
    let user_id = Uuid::new_v4().to_string();

    {
        let (id, username, email, full_name) = (
            user_id.clone(),
            username.clone(),
            email.clone(),
            full_name.to_string(),
        );
        let avatar_url = avatar.url.clone();
        blocking_db(&state, move |db| {
            db.create_user(
                &id,
                &username,
                &email,
                &full_name,
                &password_hash,
                &avatar_url,
                cover_image.as_deref(),
            )
        })
        .await?;
    }

    let created = blocking_db(&state, move |db| db.get_user_by_id(&user_id))
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("user missing after insert")))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            201,
            dto::user_public(&created),
            "User registered successfully.",
        )),
    ))
}

/// POST /users/login — username or email plus password.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let handle = req
        .username
        .as_deref()
        .or(req.email.as_deref())
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_lowercase)
        .ok_or_else(|| AppError::Validation("Username or email is required.".into()))?;

    if req.password.is_empty() {
        return Err(AppError::Validation("Password is required.".into()));
    }

    let user = blocking_db(&state, move |db| db.get_user_by_username_or_email(&handle))
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".into()))?;

    if !password::verify_password(&req.password, &user.password)? {
        return Err(AppError::Unauthorized);
    }

    let (access_token, refresh_token) = issue_token_pair(&state, &user).await?;

    let jar = jar
        .add(auth_cookie(ACCESS_COOKIE, access_token.clone()))
        .add(auth_cookie(REFRESH_COOKIE, refresh_token.clone()));

    Ok((
        jar,
        Json(ApiResponse::new(
            200,
            LoginResponse {
                user: dto::user_public(&user),
                access_token,
                refresh_token,
            },
            "User logged in successfully.",
        )),
    ))
}

/// POST /users/refresh-token — rotate the refresh token. The incoming token
/// must match the stored one byte-for-byte; anything else is treated as a
/// stale or reused credential.
pub async fn refresh_access_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<impl IntoResponse> {
    // The token may arrive as a cookie or in the (optional) JSON body.
    let from_body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice::<RefreshRequest>(&body)
            .ok()
            .and_then(|b| b.refresh_token)
    };

    let incoming = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .or(from_body)
        .ok_or(AppError::Unauthorized)?;

    let claims = tokens::verify_refresh_token(&incoming, &state.config)?;

    let id = claims.sub.to_string();
    let user = blocking_db(&state, move |db| db.get_user_by_id(&id))
        .await?
        .ok_or(AppError::InvalidToken)?;

    if user.refresh_token.as_deref() != Some(incoming.as_str()) {
        return Err(AppError::TokenExpiredOrReused);
    }

    let (access_token, refresh_token) = issue_token_pair(&state, &user).await?;

    let jar = jar
        .add(auth_cookie(ACCESS_COOKIE, access_token.clone()))
        .add(auth_cookie(REFRESH_COOKIE, refresh_token.clone()));

    Ok((
        jar,
        Json(ApiResponse::new(
            200,
            TokenPairResponse {
                access_token,
                refresh_token,
            },
            "Access token refreshed successfully.",
        )),
    ))
}

/// POST /users/logout — clear the stored refresh token and both cookies.
/// Safe to call repeatedly.
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let id = current.id.to_string();
    blocking_db(&state, move |db| db.set_refresh_token(&id, None)).await?;

    let jar = jar
        .remove(expired_cookie(ACCESS_COOKIE))
        .remove(expired_cookie(REFRESH_COOKIE));

    Ok((
        jar,
        Json(ApiResponse::new(200, (), "User logged out successfully.")),
    ))
}

/// POST /users/change-password — requires the current password; stores the
/// new hash directly, no other fields touched.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse> {
    if req.old_password.is_empty() || req.new_password.is_empty() {
        return Err(AppError::Validation(
            "Both current and new passwords are required.".into(),
        ));
    }
    if req.new_password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters.".into(),
        ));
    }

    let id = current.id.to_string();
    let user = blocking_db(&state, move |db| db.get_user_by_id(&id))
        .await?
        .ok_or(AppError::InvalidToken)?;

    if !password::verify_password(&req.old_password, &user.password)? {
        return Err(AppError::Unauthorized);
    }

    let hash = password::hash_password(&req.new_password)?;
    let id = user.id.clone();
    blocking_db(&state, move |db| db.set_password(&id, &hash)).await?;

    Ok(Json(ApiResponse::new(
        200,
        (),
        "Password changed successfully.",
    )))
}

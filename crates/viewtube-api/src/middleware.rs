//! Auth guard: verifies the access token and loads the calling user before
//! any protected handler runs. Never auto-refreshes — a stale access token
//! is simply rejected.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use viewtube_db::models::UserRow;
use viewtube_types::api::UserPublic;

use crate::auth::{ACCESS_COOKIE, AppState};
use crate::error::AppError;
use crate::{blocking_db, tokens};

/// Authenticated user attached to the request. Carries no password hash or
/// refresh token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl CurrentUser {
    fn from_row(row: &UserRow) -> Result<Self, AppError> {
        Ok(Self {
            id: row.id.parse().map_err(|_| AppError::InvalidToken)?,
            username: row.username.clone(),
            email: row.email.clone(),
            full_name: row.full_name.clone(),
            avatar: row.avatar.clone(),
            cover_image: row.cover_image.clone(),
            created_at: row.created_at.clone(),
            updated_at: row.updated_at.clone(),
        })
    }

    pub fn public(&self) -> UserPublic {
        UserPublic {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            avatar: self.avatar.clone(),
            cover_image: self.cover_image.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}

/// Middleware that requires a valid access token.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Try cookie first, then header
    let token = if let Some(cookie) = jar.get(ACCESS_COOKIE) {
        cookie.value().to_string()
    } else {
        request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::to_string)
            .ok_or(AppError::Unauthorized)?
    };

    let claims = tokens::verify_access_token(&token, &state.config)?;

    let id = claims.sub.to_string();
    let user = blocking_db(&state, move |db| db.get_user_by_id(&id))
        .await?
        .ok_or(AppError::InvalidToken)?;

    let current = CurrentUser::from_row(&user)?;
    request.extensions_mut().insert(current);

    Ok(next.run(request).await)
}

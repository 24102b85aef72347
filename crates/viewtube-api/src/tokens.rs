//! Access/refresh token signing and verification. The two token kinds use
//! distinct secrets: a refresh token can never pass the access-token check
//! or vice versa.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use viewtube_db::models::UserRow;
use viewtube_types::api::{AccessClaims, RefreshClaims};

use crate::config::Config;
use crate::error::{AppError, Result};

/// Short-lived token embedding the identity claims downstream handlers need.
pub fn sign_access_token(user: &UserRow, config: &Config) -> Result<String> {
    let sub = parse_user_id(&user.id)?;
    let now = chrono::Utc::now();

    let claims = AccessClaims {
        sub,
        username: user.username.clone(),
        full_name: user.full_name.clone(),
        email: user.email.clone(),
        iat: now.timestamp() as usize,
        exp: (now + chrono::Duration::seconds(config.access_token_ttl_secs)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.access_token_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.into()))
}

/// Long-lived token carrying only the user id.
pub fn sign_refresh_token(user_id: Uuid, config: &Config) -> Result<String> {
    let now = chrono::Utc::now();

    let claims = RefreshClaims {
        sub: user_id,
        iat: now.timestamp() as usize,
        exp: (now + chrono::Duration::seconds(config.refresh_token_ttl_secs)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.refresh_token_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.into()))
}

pub fn verify_access_token(token: &str, config: &Config) -> Result<AccessClaims> {
    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.access_token_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidToken)
}

pub fn verify_refresh_token(token: &str, config: &Config) -> Result<RefreshClaims> {
    decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(config.refresh_token_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidToken)
}

fn parse_user_id(raw: &str) -> Result<Uuid> {
    raw.parse::<Uuid>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("corrupt user id '{raw}': {e}")))
}

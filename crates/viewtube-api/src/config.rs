//! Application configuration, loaded once at startup and passed through
//! state. Nothing in the handlers reads the environment directly.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: String,
    /// Directory published media is written to and served from.
    pub media_root: String,
    /// Origin prefix baked into stored media URLs.
    pub public_base_url: String,

    /// Secret for short-lived access tokens.
    pub access_token_secret: String,
    /// Distinct secret for long-lived refresh tokens.
    pub refresh_token_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    Invalid(&'static str),
}

const DAY_SECS: i64 = 24 * 60 * 60;

impl Config {
    /// Load configuration from environment variables, with dev-friendly
    /// defaults for everything.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("VIEWTUBE_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("VIEWTUBE_PORT")
                .unwrap_or_else(|_| "3000".into())
                .parse()
                .map_err(|_| ConfigError::Invalid("VIEWTUBE_PORT"))?,
            db_path: env::var("VIEWTUBE_DB_PATH").unwrap_or_else(|_| "viewtube.db".into()),
            media_root: env::var("VIEWTUBE_MEDIA_ROOT").unwrap_or_else(|_| "media".into()),
            public_base_url: env::var("VIEWTUBE_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            access_token_secret: env::var("VIEWTUBE_ACCESS_TOKEN_SECRET")
                .unwrap_or_else(|_| "dev-access-secret-change-me".into()),
            refresh_token_secret: env::var("VIEWTUBE_REFRESH_TOKEN_SECRET")
                .unwrap_or_else(|_| "dev-refresh-secret-change-me".into()),
            access_token_ttl_secs: env::var("VIEWTUBE_ACCESS_TOKEN_TTL_SECS")
                .unwrap_or_else(|_| DAY_SECS.to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("VIEWTUBE_ACCESS_TOKEN_TTL_SECS"))?,
            refresh_token_ttl_secs: env::var("VIEWTUBE_REFRESH_TOKEN_TTL_SECS")
                .unwrap_or_else(|_| (10 * DAY_SECS).to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("VIEWTUBE_REFRESH_TOKEN_TTL_SECS"))?,
        })
    }

    /// Fixed config for tests only.
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            db_path: ":memory:".into(),
            media_root: "media".into(),
            public_base_url: "http://localhost:3000".into(),
            access_token_secret: "test-access-secret".into(),
            refresh_token_secret: "test-refresh-secret".into(),
            access_token_ttl_secs: DAY_SECS,
            refresh_token_ttl_secs: 10 * DAY_SECS,
        }
    }
}

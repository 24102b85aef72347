use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use viewtube_api::auth::{AppState, AppStateInner};
use viewtube_api::config::Config;
use viewtube_media::MediaStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "viewtube=debug,tower_http=debug".into()),
        )
        .init();

    // Config is built once here and travels through state from now on.
    let config = Config::from_env()?;

    // Init database
    let db = viewtube_db::Database::open(&PathBuf::from(&config.db_path))?;

    // Init media storage
    let media = MediaStore::new(
        &config.media_root,
        format!("{}/media", config.public_base_url),
    )
    .await?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner { db, media, config });

    let app = viewtube_api::app(state);

    info!("ViewTube server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

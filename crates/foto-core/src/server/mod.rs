//! Photo server.
//!
//! Exposes the storage root under `/photos/` (JSON listings for directory
//! paths, raw files otherwise), scaled photos under `/thumbnail/` and the
//! static web UI under `/`.

mod error;
mod listing;
mod photo;
mod safe_path;
mod thumbnail;

pub use error::ServerError;
pub use listing::read_listing;
pub use photo::{read_header, thumbnail_jpeg};
pub use safe_path::RelPath;

use anyhow::{Context, Result};
use axum::{middleware, Router};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Shared handler state.
#[derive(Debug)]
pub(crate) struct AppState {
    pub(crate) storage_root: PathBuf,
    pub(crate) thumbnail_height: u32,
}

/// Builds the full application router for `cfg`.
pub fn router(cfg: &ServerConfig) -> Router {
    let state = Arc::new(AppState {
        storage_root: cfg.storage_root.clone(),
        thumbnail_height: cfg.thumbnail_height,
    });

    let photos = Router::new()
        .fallback_service(ServeDir::new(&cfg.storage_root))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            listing::directory_listing,
        ));

    let thumbnails = Router::new()
        .fallback(thumbnail::thumbnail)
        .with_state(state);

    Router::new()
        .nest_service("/photos", photos)
        .nest_service("/thumbnail", thumbnails)
        .fallback_service(ServeDir::new(&cfg.static_dir))
        .layer(TraceLayer::new_for_http())
}

/// Serves on an already bound listener until ctrl-c.
pub async fn serve_on(listener: TcpListener, cfg: &ServerConfig) -> Result<()> {
    let addr = listener.local_addr().context("listener address")?;
    tracing::info!(
        "serving {} on http://{} (static: {})",
        cfg.storage_root.display(),
        addr,
        cfg.static_dir.display()
    );
    axum::serve(listener, router(cfg))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    tracing::info!("server stopped");
    Ok(())
}

/// Binds `cfg.listen_addr` and serves until ctrl-c.
pub async fn serve(cfg: &ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("bind {}", cfg.listen_addr))?;
    serve_on(listener, cfg).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("ctrl-c handler failed: {}", e);
        std::future::pending::<()>().await;
    }
}

//! `GET /thumbnail/<file>?height=N`.

use axum::extract::{Query, State};
use axum::http::{header, Uri};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;

use super::error::ServerError;
use super::photo;
use super::safe_path::RelPath;
use super::AppState;

/// Upper bound on requested thumbnail height.
const MAX_HEIGHT: u32 = 4096;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ThumbnailParams {
    height: Option<String>,
}

/// Requested height, or `default` when missing, unparsable, zero or too large.
fn effective_height(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|h| h.trim().parse::<u32>().ok())
        .filter(|h| (1..=MAX_HEIGHT).contains(h))
        .unwrap_or(default)
}

pub(crate) async fn thumbnail(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    Query(params): Query<ThumbnailParams>,
) -> Result<Response, ServerError> {
    let rel = RelPath::parse(uri.path())?;
    if rel.segments().is_empty() {
        return Err(ServerError::BadRequest("thumbnail needs a file path".to_string()));
    }
    let path = rel.under(&state.storage_root);
    let height = effective_height(params.height.as_deref(), state.thumbnail_height);

    let meta = tokio::fs::metadata(&path)
        .await
        .map_err(|e| ServerError::from_io(e, uri.path()))?;
    if meta.is_dir() {
        return Err(ServerError::BadRequest(format!("{} is a directory", uri.path())));
    }

    tracing::debug!(path = %path.display(), height, "thumbnail");
    let jpeg = tokio::task::spawn_blocking(move || photo::thumbnail_jpeg(&path, height)).await??;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], jpeg).into_response())
}

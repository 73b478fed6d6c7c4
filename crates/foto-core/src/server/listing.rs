//! JSON directory listings for paths ending in `/`.

use axum::extract::{OriginalUri, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::error::ServerError;
use super::photo;
use super::safe_path::RelPath;
use super::AppState;
use crate::listing::{is_photo_name, FileInfo};

/// Location for a request path lacking its trailing `/`: the original URI
/// with `/` appended. The path seen here has the mount prefix stripped.
fn slash_location(req: &Request, path: &str) -> String {
    let mut location = match req.extensions().get::<OriginalUri>() {
        Some(OriginalUri(uri)) => uri.path().to_owned(),
        None => format!("/photos{}", path),
    };
    location.push('/');
    if let Some(query) = req.uri().query() {
        location.push('?');
        location.push_str(query);
    }
    location
}

async fn is_directory(root: &Path, path: &str) -> bool {
    let Ok(rel) = RelPath::parse(path) else {
        return false;
    };
    tokio::fs::metadata(rel.under(root))
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

/// Middleware in front of the file service: directory paths get a JSON
/// listing, everything else falls through to the raw file.
pub(crate) async fn directory_listing(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    if !(path.is_empty() || path.ends_with('/')) {
        let location = slash_location(&req, &path);
        if is_directory(&state.storage_root, &path).await {
            return Redirect::temporary(&location).into_response();
        }
        return next.run(req).await;
    }
    let rel = match RelPath::parse(&path) {
        Ok(rel) => rel,
        Err(e) => return e.into_response(),
    };
    let root = state.storage_root.clone();
    let result = tokio::task::spawn_blocking(move || read_listing(&root, &rel)).await;
    match result {
        Ok(Ok(list)) => Json(list).into_response(),
        Ok(Err(e)) => e.into_response(),
        Err(e) => ServerError::Task(e).into_response(),
    }
}

#[cfg(unix)]
fn mode_bits(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    meta.mode()
}

#[cfg(not(unix))]
fn mode_bits(_meta: &fs::Metadata) -> u32 {
    0
}

/// Lists `rel` under `root`, sorted by name.
pub fn read_listing(root: &Path, rel: &RelPath) -> Result<Vec<FileInfo>, ServerError> {
    let dir = rel.under(root);
    let entries = fs::read_dir(&dir).map_err(|e| ServerError::from_io(e, &rel.link("/photos", "")))?;

    let mut list = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        let meta = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let is_dir = meta.is_dir();
        let is_photo = is_photo_name(&name, is_dir);
        let exif = if is_photo {
            match photo::read_header(&path) {
                Ok(h) => Some(h),
                Err(e) => {
                    tracing::debug!("no photo header for {}: {}", path.display(), e);
                    None
                }
            }
        } else {
            None
        };
        let mut url = rel.link("/photos", &name);
        if is_dir {
            url.push('/');
        }
        list.push(FileInfo {
            size: meta.len(),
            mode: mode_bits(&meta),
            mod_time: meta
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_default(),
            is_dir,
            is_photo,
            exif,
            url,
            thumb_url: rel.link("/thumbnail", &name),
            name,
        });
    }
    list.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(list)
}

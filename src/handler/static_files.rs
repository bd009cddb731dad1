//! Static file serving module
//!
//! Loads files below the configured root and annotates them with caching
//! headers. Conditional requests are answered with `304 Not Modified`.

use crate::cache_util::{generate_etag, CacheUtil};
use crate::config::{CacheConfig, StaticFilesConfig};
use crate::error::ArgumentError;
use crate::logger;
use crate::message::ConditionalRequest;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

/// A file loaded from disk
#[derive(Debug, Clone)]
pub struct StaticFile {
    pub content: Bytes,
    pub content_type: &'static str,
    pub modified: Option<SystemTime>,
}

/// Content-Type from file extension
pub fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("wasm") => "application/wasm",
        _ => "application/octet-stream",
    }
}

/// Map a request path onto the root, rejecting anything that escapes it
fn resolve_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }
    Some(root.join(relative))
}

/// Load a file for `request_path`, falling back to the index file for directories
pub async fn load_file(config: &StaticFilesConfig, request_path: &str) -> Option<StaticFile> {
    let root = Path::new(&config.root);
    let Some(mut path) = resolve_path(root, request_path) else {
        logger::log_warning(&format!("Path traversal attempt blocked: {request_path}"));
        return None;
    };

    if fs::metadata(&path).await.ok()?.is_dir() {
        path = path.join(&config.index_file);
    }

    let metadata = fs::metadata(&path).await.ok()?;
    let content = match fs::read(&path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            return None;
        }
    };

    Some(StaticFile {
        content: Bytes::from(content),
        content_type: content_type(&path),
        modified: metadata.modified().ok(),
    })
}

/// Build the full 200 response with caching headers
pub fn build_file_response(
    file: &StaticFile,
    config: &CacheConfig,
    util: &CacheUtil,
) -> Result<Response<Full<Bytes>>, ArgumentError> {
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, file.content_type)
        .header(CONTENT_LENGTH, file.content.len())
        .body(Full::new(file.content.clone()))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build file response: {e}"));
            Response::new(Full::new(Bytes::new()))
        });

    let mut response = if config.max_age == 0 {
        util.with_cache_prevention(response)
    } else {
        util.with_cache(response, config.public, config.max_age)
    };

    if config.etag {
        response = util.with_etag(response, &generate_etag(&file.content), config.weak_etag);
    }
    if config.last_modified {
        if let Some(modified) = file.modified {
            response = util.with_last_modified(response, modified)?;
        }
    }

    Ok(response)
}

/// Turn a full response into its 304 counterpart
///
/// Keeps the validators and caching headers, drops the body and entity headers.
pub fn not_modified(response: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
    let (mut parts, _) = response.into_parts();
    parts.status = StatusCode::NOT_MODIFIED;
    parts.headers.remove(CONTENT_TYPE);
    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, Full::new(Bytes::new()))
}

/// Serve a static file for a GET or HEAD request
pub async fn serve<Q: ConditionalRequest>(
    request: &Q,
    path: &str,
    is_head: bool,
    files: &StaticFilesConfig,
    cache: &CacheConfig,
    util: &CacheUtil,
) -> Response<Full<Bytes>> {
    let Some(file) = load_file(files, path).await else {
        return super::build_status_response(StatusCode::NOT_FOUND);
    };

    let response = match build_file_response(&file, cache, util) {
        Ok(r) => r,
        Err(e) => {
            logger::log_error(&format!("Failed to annotate {path}: {e}"));
            return super::build_status_response(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    if util.is_not_modified(request, &response) {
        return not_modified(response);
    }

    if is_head {
        let (parts, _) = response.into_parts();
        return Response::from_parts(parts, Full::new(Bytes::new()));
    }
    response
}

//! Request handler module
//!
//! Entry point for HTTP request processing in the demo server: method
//! validation, static file dispatch and access logging.

pub mod static_files;

use crate::cache_util::CacheUtil;
use crate::config::Config;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::ALLOW;
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared state of the demo server
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub cache: CacheUtil,
}

impl AppState {
    pub const fn new(config: Config) -> Self {
        Self {
            config,
            cache: CacheUtil::new(),
        }
    }
}

/// Build a plain-text response carrying the status reason as body
pub fn build_status_response(status: StatusCode) -> Response<Full<Bytes>> {
    let body = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    );
    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "text/plain");
    if status == StatusCode::METHOD_NOT_ALLOWED {
        builder = builder.header(ALLOW, "GET, HEAD");
    }
    builder
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build {status} response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    // Only the head is needed; the body is never read
    let (parts, _) = req.into_parts();
    let req = Request::from_parts(parts, ());
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match method {
        Method::GET | Method::HEAD => {
            static_files::serve(
                &req,
                &path,
                method == Method::HEAD,
                &state.config.static_files,
                &state.config.cache,
                &state.cache,
            )
            .await
        }
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            build_status_response(StatusCode::METHOD_NOT_ALLOWED)
        }
    };

    if state.config.logging.access_log {
        logger::log_access(&peer_addr, method.as_str(), &path, response.status().as_u16());
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::HttpMessage;

    fn test_state() -> Arc<AppState> {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 0
            request_timeout = 5

            [static_files]
            root = "does-not-exist"

            [cache]
            public = false
            max_age = 600
            etag = true
            last_modified = true

            [logging]
            level = "error"
            access_log = false
            "#,
        )
        .unwrap();
        Arc::new(AppState::new(config))
    }

    #[test]
    fn test_build_status_response() {
        let response = build_status_response(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.header_line("Allow"), "GET, HEAD");
    }

    #[tokio::test]
    async fn test_rejects_unsafe_methods() {
        let req = Request::post("/index.html").body(()).unwrap();
        let peer: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        let response = handle_request(req, peer, test_state()).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let req = Request::get("/index.html").body(()).unwrap();
        let peer: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        let response = handle_request(req, peer, test_state()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

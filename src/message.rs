//! HTTP message adapters
//!
//! The cache utilities only need a small view of a message: combined header
//! lines, header presence, the status code or request method, and an
//! immutable "with header" update on responses. These traits describe that
//! view; implementations are provided for hyper's `Request` and `Response`.

use crate::logger;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, Request, Response};

/// Read access to message headers
pub trait HttpMessage {
    /// All values of a header joined with `", "`; empty string when absent
    fn header_line(&self, name: &str) -> String;

    fn has_header(&self, name: &str) -> bool;
}

/// Response view used by the cache utilities
pub trait CacheableResponse: HttpMessage + Sized {
    fn status_code(&self) -> u16;

    /// Return the message with `name` set to `value`, replacing existing values
    #[must_use]
    fn with_header(self, name: &str, value: &str) -> Self;
}

/// Request view used for conditional request evaluation
pub trait ConditionalRequest: HttpMessage {
    fn request_method(&self) -> &str;
}

/// Join all values of a header the way a single header line would read
fn combined_header(headers: &HeaderMap, name: &str) -> String {
    headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join(", ")
}

impl<B> HttpMessage for Response<B> {
    fn header_line(&self, name: &str) -> String {
        combined_header(self.headers(), name)
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers().contains_key(name)
    }
}

impl<B> CacheableResponse for Response<B> {
    fn status_code(&self) -> u16 {
        self.status().as_u16()
    }

    fn with_header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(header), Ok(value)) => {
                self.headers_mut().insert(header, value);
            }
            _ => logger::log_warning(&format!("Ignoring invalid header {name}: {value:?}")),
        }
        self
    }
}

impl<B> HttpMessage for Request<B> {
    fn header_line(&self, name: &str) -> String {
        combined_header(self.headers(), name)
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers().contains_key(name)
    }
}

impl<B> ConditionalRequest for Request<B> {
    fn request_method(&self) -> &str {
        self.method().as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_line_combines_values() {
        let response = Response::builder()
            .header("Cache-Control", "public")
            .header("Cache-Control", "max-age=60")
            .body(())
            .unwrap();
        assert_eq!(response.header_line("cache-control"), "public, max-age=60");
        assert!(response.has_header("Cache-Control"));
        assert_eq!(response.header_line("ETag"), "");
        assert!(!response.has_header("ETag"));
    }

    #[test]
    fn test_with_header_replaces() {
        let response = Response::builder()
            .header("ETag", "\"a\"")
            .header("ETag", "\"b\"")
            .body(())
            .unwrap()
            .with_header("ETag", "\"c\"");
        assert_eq!(response.header_line("ETag"), "\"c\"");
    }

    #[test]
    fn test_with_header_invalid_value_is_ignored() {
        let response = Response::new(()).with_header("ETag", "bad\nvalue");
        assert!(!response.has_header("ETag"));
    }

    #[test]
    fn test_request_view() {
        let request = Request::builder()
            .method("HEAD")
            .header("If-None-Match", "\"foo\"")
            .body(())
            .unwrap();
        assert_eq!(request.request_method(), "HEAD");
        assert_eq!(request.header_line("if-none-match"), "\"foo\"");
    }
}

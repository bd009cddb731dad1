//! HTTP caching helpers (RFC 7232/7234)
//!
//! - [`header`]: typed, immutable Cache-Control directive sets for requests
//!   and responses, with round-trip parsing and serialization.
//! - [`cache_util`]: builds `Cache-Control`, `Expires`, `ETag` and
//!   `Last-Modified` headers, and evaluates cacheability, freshness, age and
//!   conditional requests.
//!
//! Messages are accessed through the traits in [`message`], implemented for
//! hyper's `Request` and `Response`.
//!
//! ```
//! use http_cache_util::{CacheUtil, ResponseCacheControl};
//! use http_cache_util::message::HttpMessage;
//!
//! let util = CacheUtil::new();
//! let control = ResponseCacheControl::new().with_public(true).with_max_age(600);
//! let response = util.with_cache_control(hyper::Response::new(()), control);
//! assert_eq!(response.header_line("Cache-Control"), "public, max-age=600");
//! assert_eq!(util.lifetime(&response), Some(600));
//! ```

pub mod cache_util;
pub mod config;
pub mod error;
pub mod handler;
pub mod header;
pub mod logger;
pub mod message;
pub mod server;
pub mod time;

pub use cache_util::{CacheUtil, DEFAULT_LIFETIME};
pub use error::ArgumentError;
pub use header::{RequestCacheControl, ResponseCacheControl};
pub use time::{Clock, FixedClock, SystemClock, TimeValue};

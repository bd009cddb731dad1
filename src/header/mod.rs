//! Cache-Control header model
//!
//! Generic directive set plus request and response specializations.

pub mod cache_control;
pub mod request;
pub mod response;

pub use cache_control::{
    CacheControl, DirectiveAction, DirectiveHandler, DirectiveKind, DirectiveRegistry,
    DirectiveValue, IntoDirectiveValue, Parsed,
};
pub use request::{RequestCacheControl, RequestDirectives};
pub use response::{ResponseCacheControl, ResponseDirectives};

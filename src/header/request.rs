//! Request Cache-Control directives (RFC 7234 §5.2.1)

use super::cache_control::{CacheControl, DirectiveKind, DirectiveRegistry, DirectiveValue};
use std::sync::OnceLock;

/// Directive kind for request headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestDirectives;

impl DirectiveKind for RequestDirectives {
    fn registry() -> &'static DirectiveRegistry {
        static REGISTRY: OnceLock<DirectiveRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            DirectiveRegistry::new()
                .with_flags(&["no-cache", "no-store", "no-transform", "only-if-cached"])
                .with_seconds(&["max-age", "min-fresh", "max-stale"])
        })
    }
}

/// Cache-Control header of a request
pub type RequestCacheControl = CacheControl<RequestDirectives>;

impl CacheControl<RequestDirectives> {
    #[must_use]
    pub fn with_max_stale(&self, seconds: u64) -> Self {
        self.with_directive("max-stale", seconds)
    }

    /// Accepted staleness; `Some(u64::MAX)` for a bare `max-stale`
    pub fn max_stale(&self) -> Option<u64> {
        match self.directive("max-stale")? {
            DirectiveValue::Flag => Some(u64::MAX),
            _ => self.seconds("max-stale"),
        }
    }

    #[must_use]
    pub fn with_min_fresh(&self, seconds: u64) -> Self {
        self.with_directive("min-fresh", seconds)
    }

    pub fn min_fresh(&self) -> Option<u64> {
        self.seconds("min-fresh")
    }

    #[must_use]
    pub fn with_only_if_cached(&self, flag: bool) -> Self {
        self.with_flag("only-if-cached", flag)
    }

    pub fn has_only_if_cached(&self) -> bool {
        self.has_flag("only-if-cached")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_header() {
        let control =
            RequestCacheControl::parse_or_empty("no-cache, max-stale=30, min-fresh=5, only-if-cached");
        assert!(control.has_no_cache());
        assert_eq!(control.max_stale(), Some(30));
        assert_eq!(control.min_fresh(), Some(5));
        assert!(control.has_only_if_cached());
    }

    #[test]
    fn test_bare_max_stale() {
        let control = RequestCacheControl::parse_or_empty("max-stale");
        assert_eq!(control.max_stale(), Some(u64::MAX));
        assert_eq!(control.to_string(), "max-stale");
    }

    #[test]
    fn test_invalid_max_stale_is_kept_as_text() {
        let control = RequestCacheControl::parse_or_empty("max-stale=later");
        assert_eq!(control.max_stale(), None);
        assert_eq!(control.to_string(), "max-stale=later");
    }

    #[test]
    fn test_builder_output() {
        let control = RequestCacheControl::new()
            .with_max_age(0)
            .with_min_fresh(10)
            .with_max_stale(20)
            .with_only_if_cached(true)
            .with_no_transform(true);
        assert_eq!(
            control.to_string(),
            "max-age=0, min-fresh=10, max-stale=20, only-if-cached, no-transform"
        );
    }
}

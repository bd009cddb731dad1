//! Response Cache-Control directives (RFC 7234 §5.2.2)

use super::cache_control::{CacheControl, DirectiveKind, DirectiveRegistry};
use std::sync::OnceLock;

/// Directive kind for response headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResponseDirectives;

impl DirectiveKind for ResponseDirectives {
    fn registry() -> &'static DirectiveRegistry {
        static REGISTRY: OnceLock<DirectiveRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            DirectiveRegistry::new()
                .with_flags(&[
                    "public",
                    "private",
                    "no-cache",
                    "no-store",
                    "no-transform",
                    "must-revalidate",
                    "proxy-revalidate",
                ])
                .with_seconds(&["max-age", "s-maxage"])
        })
    }
}

/// Cache-Control header of a response
pub type ResponseCacheControl = CacheControl<ResponseDirectives>;

impl CacheControl<ResponseDirectives> {
    /// Mark as `public`; clears `private`
    #[must_use]
    pub fn with_public(&self, flag: bool) -> Self {
        let control = self.with_flag("public", flag);
        if flag {
            control.without_directive("private")
        } else {
            control
        }
    }

    pub fn is_public(&self) -> bool {
        self.has_flag("public")
    }

    /// Mark as `private`; clears `public`
    #[must_use]
    pub fn with_private(&self, flag: bool) -> Self {
        let control = self.with_flag("private", flag);
        if flag {
            control.without_directive("public")
        } else {
            control
        }
    }

    /// `private`, either bare or restricted to a field-name list
    pub fn is_private(&self) -> bool {
        self.directive("private").is_some()
    }

    #[must_use]
    pub fn with_shared_max_age(&self, seconds: u64) -> Self {
        self.with_directive("s-maxage", seconds)
    }

    pub fn shared_max_age(&self) -> Option<u64> {
        self.seconds("s-maxage")
    }

    #[must_use]
    pub fn with_must_revalidate(&self, flag: bool) -> Self {
        self.with_flag("must-revalidate", flag)
    }

    pub fn has_must_revalidate(&self) -> bool {
        self.has_flag("must-revalidate")
    }

    #[must_use]
    pub fn with_proxy_revalidate(&self, flag: bool) -> Self {
        self.with_flag("proxy-revalidate", flag)
    }

    pub fn has_proxy_revalidate(&self) -> bool {
        self.has_flag("proxy-revalidate")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_private_exclusive() {
        let control = ResponseCacheControl::new().with_private(true).with_public(true);
        assert!(control.is_public());
        assert!(!control.is_private());

        let control = control.with_private(true);
        assert!(control.is_private());
        assert!(!control.is_public());
        assert_eq!(control.to_string(), "private");
    }

    #[test]
    fn test_builder_output() {
        let control = ResponseCacheControl::new()
            .with_public(true)
            .with_max_age(600)
            .with_shared_max_age(60)
            .with_must_revalidate(true)
            .with_proxy_revalidate(true);
        assert_eq!(
            control.to_string(),
            "public, max-age=600, s-maxage=60, must-revalidate, proxy-revalidate"
        );
    }

    #[test]
    fn test_parse_response_header() {
        let control = ResponseCacheControl::parse_or_empty(
            "Public, max-age=60, s-maxage=200, must-revalidate, private=\"set-cookie\"",
        );
        assert!(control.is_public());
        assert!(control.is_private());
        assert_eq!(control.max_age(), Some(60));
        assert_eq!(control.shared_max_age(), Some(200));
        assert!(control.has_must_revalidate());
        assert!(!control.has_proxy_revalidate());
    }

    #[test]
    fn test_parse_zero_shared_max_age() {
        let control = ResponseCacheControl::parse_or_empty("s-maxage=0");
        assert_eq!(control.shared_max_age(), Some(0));
        assert_eq!(control.max_age(), None);
    }

    #[test]
    fn test_round_trip_through_registered_handlers() {
        let control = ResponseCacheControl::new()
            .with_directive("max-age", "abc")
            .with_flag("s-maxage", true)
            .with_directive("private", "set-cookie")
            .with_must_revalidate(true);
        assert_eq!(
            control.to_string(),
            "max-age=abc, s-maxage, private=set-cookie, must-revalidate"
        );
        let parsed = ResponseCacheControl::parse_or_empty(&control.to_string());
        assert_eq!(parsed, control);
        assert_eq!(parsed.max_age(), None);
        assert_eq!(parsed.shared_max_age(), None);
    }

    #[test]
    fn test_registry_names() {
        let registry = ResponseDirectives::registry();
        assert!(registry.contains("s-maxage"));
        assert!(!registry.contains("min-fresh"));
    }
}

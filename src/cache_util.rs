//! HTTP cache utilities
//!
//! Stateless helpers that write caching headers onto responses and evaluate
//! cacheability, freshness, age and conditional requests (RFC 7232/7234).

use crate::error::ArgumentError;
use crate::header::ResponseCacheControl;
use crate::logger;
use crate::message::{CacheableResponse, ConditionalRequest, HttpMessage};
use crate::time::{format_http_date, parse_http_timestamp, Clock, SystemClock, TimeValue};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Default `max-age` used by [`CacheUtil::with_default_cache`]
pub const DEFAULT_LIFETIME: u64 = 600;

/// Status codes cacheable by default (RFC 7231 §6.1)
const CACHEABLE_STATUS_CODES: [u16; 11] = [200, 203, 204, 206, 300, 301, 404, 405, 410, 414, 501];

/// Generate a strong `ETag` from content
///
/// # Returns
/// Quoted `ETag` string, e.g., `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Strip whitespace, the weak prefix and surrounding quotes
fn opaque_tag(tag: &str) -> &str {
    let tag = tag.trim();
    tag.strip_prefix("W/").unwrap_or(tag).trim_matches('"')
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Uses weak comparison (RFC 7232 §3.2). Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Wildcard: `*`
///
/// Empty list entries are skipped, and a response without an `ETag` only
/// matches the wildcard. The empty entity-tag `""` is a valid tag.
///
/// # Arguments
/// * `if_none_match` - Client-sent If-None-Match header
/// * `etag` - `ETag` of the response, empty when it has none
///
/// # Returns
/// Returns true if matched (should return 304), false otherwise
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    let etag = etag.trim();
    if_none_match.is_some_and(|client_etags| {
        client_etags
            .split(',')
            .map(str::trim)
            .filter(|candidate| !candidate.is_empty())
            .any(|candidate| {
                candidate == "*" || (!etag.is_empty() && opaque_tag(candidate) == opaque_tag(etag))
            })
    })
}

/// Cache header builder and validator
///
/// Holds nothing but its clock; every method is a pure function of its
/// arguments and the current time.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheUtil<C = SystemClock> {
    clock: C,
}

impl CacheUtil<SystemClock> {
    pub const fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> CacheUtil<C> {
    pub const fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Allow caching for `lifetime` seconds, publicly or in private caches only
    ///
    /// # Arguments
    /// * `response` - Response to annotate
    /// * `is_public` - `public` when true, `private` otherwise
    /// * `lifetime` - `max-age` in seconds
    pub fn with_cache<R: CacheableResponse>(&self, response: R, is_public: bool, lifetime: u64) -> R {
        let control = if is_public {
            ResponseCacheControl::new().with_public(true)
        } else {
            ResponseCacheControl::new().with_private(true)
        };
        self.with_cache_control(response, control.with_max_age(lifetime))
    }

    /// Private caching for [`DEFAULT_LIFETIME`] seconds
    pub fn with_default_cache<R: CacheableResponse>(&self, response: R) -> R {
        self.with_cache(response, false, DEFAULT_LIFETIME)
    }

    /// Forbid caching: `no-cache, no-store, must-revalidate`
    pub fn with_cache_prevention<R: CacheableResponse>(&self, response: R) -> R {
        let control = ResponseCacheControl::new()
            .with_no_cache(true)
            .with_no_store(true)
            .with_must_revalidate(true);
        self.with_cache_control(response, control)
    }

    /// Set Cache-Control from a raw string or a directive set
    pub fn with_cache_control<R: CacheableResponse>(
        &self,
        response: R,
        control: impl fmt::Display,
    ) -> R {
        response.with_header("Cache-Control", &control.to_string())
    }

    /// Set `Expires` to an absolute point in time
    ///
    /// # Arguments
    /// * `response` - Response to annotate
    /// * `time` - Unix timestamp, date string, `chrono::DateTime` or `SystemTime`
    ///
    /// # Returns
    /// The response with `Expires` as an HTTP-date, or
    /// `ArgumentError::InvalidDate` when `time` cannot be read as a date
    pub fn with_expires<R: CacheableResponse>(
        &self,
        response: R,
        time: impl Into<TimeValue>,
    ) -> Result<R, ArgumentError> {
        let expires = time.into().to_datetime()?;
        Ok(response.with_header("Expires", &format_http_date(&expires)))
    }

    /// Expire `seconds` from now
    ///
    /// # Returns
    /// `ArgumentError::InvalidSeconds` for a negative offset
    pub fn with_relative_expires<R: CacheableResponse>(
        &self,
        response: R,
        seconds: i64,
    ) -> Result<R, ArgumentError> {
        if seconds < 0 {
            return Err(ArgumentError::InvalidSeconds {
                received: format!("negative integer {seconds}"),
            });
        }
        self.with_expires(response, self.clock.timestamp().saturating_add(seconds))
    }

    /// Set the `ETag`, quoting it when needed and marking it weak on request
    pub fn with_etag<R: CacheableResponse>(&self, response: R, etag: &str, weak: bool) -> R {
        let (etag, weak) = match etag.strip_prefix("W/") {
            Some(tag) => (tag, true),
            None => (etag, weak),
        };
        let quoted = if etag.len() >= 2 && etag.starts_with('"') && etag.ends_with('"') {
            etag.to_string()
        } else {
            format!("\"{etag}\"")
        };
        let value = if weak { format!("W/{quoted}") } else { quoted };
        response.with_header("ETag", &value)
    }

    /// Set `Last-Modified`
    ///
    /// # Arguments
    /// * `response` - Response to annotate
    /// * `time` - Unix timestamp, date string, `chrono::DateTime` or `SystemTime`
    ///
    /// # Returns
    /// The response with `Last-Modified` as an HTTP-date, or
    /// `ArgumentError::InvalidDate` when `time` cannot be read as a date
    pub fn with_last_modified<R: CacheableResponse>(
        &self,
        response: R,
        time: impl Into<TimeValue>,
    ) -> Result<R, ArgumentError> {
        let modified = time.into().to_datetime()?;
        Ok(response.with_header("Last-Modified", &format_http_date(&modified)))
    }

    /// Whether the client's cached copy is still valid (answer with 304)
    ///
    /// `If-None-Match` takes precedence over `If-Modified-Since`; the date
    /// check only applies to safe methods.
    pub fn is_not_modified<Q, R>(&self, request: &Q, response: &R) -> bool
    where
        Q: ConditionalRequest,
        R: HttpMessage,
    {
        let if_none_match = request.header_line("If-None-Match");
        if !if_none_match.trim().is_empty() {
            let etag = response.header_line("ETag");
            let matched = check_etag_match(Some(if_none_match.as_str()), &etag);
            logger::log_debug(&format!(
                "If-None-Match {if_none_match} against ETag {etag}: {}",
                if matched { "match" } else { "no match" }
            ));
            return matched;
        }

        let method = request.request_method();
        if !method.eq_ignore_ascii_case("GET") && !method.eq_ignore_ascii_case("HEAD") {
            return false;
        }

        let since = parse_http_timestamp(&request.header_line("If-Modified-Since"));
        let modified = parse_http_timestamp(&response.header_line("Last-Modified"));
        match (since, modified) {
            (Some(since), Some(modified)) => {
                logger::log_debug(&format!(
                    "If-Modified-Since {since} against Last-Modified {modified}"
                ));
                since >= modified
            }
            _ => false,
        }
    }

    /// Whether a shared cache may store the response
    pub fn is_cacheable<R: CacheableResponse>(&self, response: &R) -> bool {
        if !CACHEABLE_STATUS_CODES.contains(&response.status_code()) {
            return false;
        }
        if !response.has_header("Cache-Control") {
            return true;
        }

        let control = self.cache_control(response);
        !control.is_private() && !control.has_no_store()
    }

    /// Whether the response is still within its lifetime
    ///
    /// `None` when no lifetime can be determined.
    pub fn is_fresh<R: HttpMessage>(&self, response: &R) -> Option<bool> {
        let lifetime = self.lifetime(response)?;
        let age = self.age(response).unwrap_or(0);
        Some(lifetime > 0 && age < lifetime)
    }

    /// Freshness lifetime in seconds
    ///
    /// `s-maxage` wins over `max-age`. A Cache-Control header without either
    /// yields `None` without consulting `Expires`.
    pub fn lifetime<R: HttpMessage>(&self, response: &R) -> Option<u64> {
        if response.has_header("Cache-Control") {
            let control = self.cache_control(response);
            return control.shared_max_age().or_else(|| control.max_age());
        }

        if !response.has_header("Expires") {
            return None;
        }
        let expires = response.header_line("Expires");
        // An invalid date means already expired (RFC 7234 §5.3)
        let Some(expires_at) = parse_http_timestamp(&expires) else {
            logger::log_debug(&format!("Unparsable Expires header: {expires}"));
            return Some(0);
        };
        Some(u64::try_from(expires_at.saturating_sub(self.clock.timestamp())).unwrap_or(0))
    }

    /// Age in seconds from the `Age` header, or derived from `Date`
    pub fn age<R: HttpMessage>(&self, response: &R) -> Option<u64> {
        let age = response.header_line("Age");
        if let Ok(age) = age.trim().parse::<u64>() {
            return Some(age);
        }

        let date = parse_http_timestamp(&response.header_line("Date"))?;
        Some(u64::try_from(self.clock.timestamp().saturating_sub(date)).unwrap_or(0))
    }

    /// Parsed Cache-Control header; empty when absent
    pub fn cache_control<R: HttpMessage>(&self, response: &R) -> ResponseCacheControl {
        ResponseCacheControl::parse_or_empty(&response.header_line("Cache-Control"))
    }

    /// Whether the response carries a validator for conditional requests
    pub fn has_state_validator<R: HttpMessage>(&self, response: &R) -> bool {
        response.has_header("ETag") || response.has_header("Last-Modified")
    }

    /// Normalize a time value to a unix timestamp
    ///
    /// # Arguments
    /// * `value` - Unix timestamp, date string, `chrono::DateTime` or `SystemTime`
    ///
    /// # Returns
    /// Seconds since the epoch, or `ArgumentError::InvalidDate` for an
    /// unreadable string
    pub fn time_from_value(&self, value: impl Into<TimeValue>) -> Result<i64, ArgumentError> {
        Ok(value.into().to_datetime()?.timestamp())
    }
}

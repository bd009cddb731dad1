//! Cache-Control directive set
//!
//! An ordered, immutable collection of Cache-Control directives
//! (RFC 7234 §5.2). Parsing consults a per-kind [`DirectiveRegistry`] before
//! falling back to the generic token rules, so request and response headers
//! can give the same name different semantics.

use crate::error::ArgumentError;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Value stored for one directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveValue {
    /// Directive present without argument, e.g. `no-store`
    Flag,
    /// Delta-seconds argument, e.g. `max-age=600`
    Seconds(u64),
    /// Token or quoted-string argument
    Text(String),
}

impl DirectiveValue {
    pub const fn as_seconds(&self) -> Option<u64> {
        match self {
            Self::Seconds(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Conversion into an optional directive value
///
/// `None` (and `false`) means "remove the directive". Negative integers are
/// clamped to zero.
pub trait IntoDirectiveValue {
    fn into_directive_value(self) -> Option<DirectiveValue>;
}

impl IntoDirectiveValue for DirectiveValue {
    fn into_directive_value(self) -> Option<DirectiveValue> {
        Some(self)
    }
}

impl IntoDirectiveValue for bool {
    fn into_directive_value(self) -> Option<DirectiveValue> {
        self.then_some(DirectiveValue::Flag)
    }
}

impl IntoDirectiveValue for u64 {
    fn into_directive_value(self) -> Option<DirectiveValue> {
        Some(DirectiveValue::Seconds(self))
    }
}

impl IntoDirectiveValue for u32 {
    fn into_directive_value(self) -> Option<DirectiveValue> {
        Some(DirectiveValue::Seconds(u64::from(self)))
    }
}

impl IntoDirectiveValue for i64 {
    fn into_directive_value(self) -> Option<DirectiveValue> {
        Some(DirectiveValue::Seconds(u64::try_from(self).unwrap_or(0)))
    }
}

impl IntoDirectiveValue for i32 {
    fn into_directive_value(self) -> Option<DirectiveValue> {
        i64::from(self).into_directive_value()
    }
}

impl IntoDirectiveValue for &str {
    fn into_directive_value(self) -> Option<DirectiveValue> {
        Some(DirectiveValue::Text(self.to_string()))
    }
}

impl IntoDirectiveValue for String {
    fn into_directive_value(self) -> Option<DirectiveValue> {
        Some(DirectiveValue::Text(self))
    }
}

impl<T: IntoDirectiveValue> IntoDirectiveValue for Option<T> {
    fn into_directive_value(self) -> Option<DirectiveValue> {
        self.and_then(IntoDirectiveValue::into_directive_value)
    }
}

/// What a registered handler decided for one parsed directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveAction {
    /// Store the value under the directive name
    Store(DirectiveValue),
    /// Drop the directive
    Skip,
    /// Stop parsing; the string becomes the overall parse result
    Halt(String),
}

/// Handler invoked with the raw argument (`None` for a bare directive)
pub type DirectiveHandler = Box<dyn Fn(Option<&str>) -> DirectiveAction + Send + Sync>;

/// Mapping from directive name to its parse handler
#[derive(Default)]
pub struct DirectiveRegistry {
    handlers: HashMap<String, DirectiveHandler>,
}

impl DirectiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `name` (case-insensitive)
    #[must_use]
    pub fn with_handler<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(Option<&str>) -> DirectiveAction + Send + Sync + 'static,
    {
        self.handlers
            .insert(name.to_ascii_lowercase(), Box::new(handler));
        self
    }

    /// Register boolean directives
    #[must_use]
    pub fn with_flags(self, names: &[&str]) -> Self {
        names
            .iter()
            .fold(self, |registry, name| registry.with_handler(name, parse_flag))
    }

    /// Register delta-seconds directives
    #[must_use]
    pub fn with_seconds(self, names: &[&str]) -> Self {
        names
            .iter()
            .fold(self, |registry, name| registry.with_handler(name, parse_seconds))
    }

    pub fn get(&self, name: &str) -> Option<&DirectiveHandler> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

impl fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("DirectiveRegistry")
            .field("directives", &names)
            .finish()
    }
}

/// Flag handler: bare directive is a flag, an argument keeps the generic rule
///
/// Response `no-cache`/`private` may carry a quoted field-name list.
pub fn parse_flag(value: Option<&str>) -> DirectiveAction {
    DirectiveAction::Store(value.map_or(DirectiveValue::Flag, default_value))
}

/// Delta-seconds handler
///
/// An unquoted integer becomes `Seconds`. Anything else is kept under the
/// generic rule so the header survives a round trip; the typed accessors
/// then report no value.
pub fn parse_seconds(value: Option<&str>) -> DirectiveAction {
    match value {
        None => DirectiveAction::Store(DirectiveValue::Flag),
        Some(raw) => DirectiveAction::Store(default_value(raw)),
    }
}

/// Message direction a directive set belongs to
///
/// Each kind owns the registry consulted while parsing.
pub trait DirectiveKind {
    fn registry() -> &'static DirectiveRegistry;
}

/// Result of parsing a header value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed<C> {
    Directives(C),
    /// A registered handler short-circuited parsing
    Halted(String),
}

impl<C> Parsed<C> {
    pub fn into_directives(self) -> Option<C> {
        match self {
            Self::Directives(c) => Some(c),
            Self::Halted(_) => None,
        }
    }
}

/// Immutable ordered set of Cache-Control directives
///
/// Every `with_*` method returns a new set and leaves the receiver untouched.
pub struct CacheControl<K> {
    directives: Vec<(String, DirectiveValue)>,
    kind: PhantomData<fn() -> K>,
}

impl<K> CacheControl<K> {
    pub const fn new() -> Self {
        Self {
            directives: Vec::new(),
            kind: PhantomData,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Directives in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DirectiveValue)> {
        self.directives.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set or remove a boolean directive
    #[must_use]
    pub fn with_flag(&self, name: &str, present: bool) -> Self {
        self.with_directive(name, present)
    }

    pub fn has_flag(&self, name: &str) -> bool {
        matches!(self.directive(name), Some(DirectiveValue::Flag))
    }

    /// Set a directive; `None`/`false` removes it, negative integers become 0
    #[must_use]
    pub fn with_directive(&self, name: &str, value: impl IntoDirectiveValue) -> Self {
        let name = name.trim().to_ascii_lowercase();
        let mut directives = self.directives.clone();
        match value.into_directive_value() {
            Some(value) => match directives.iter_mut().find(|(k, _)| *k == name) {
                Some(entry) => entry.1 = value,
                None => directives.push((name, value)),
            },
            None => directives.retain(|(k, _)| *k != name),
        }
        Self {
            directives,
            kind: PhantomData,
        }
    }

    #[must_use]
    pub fn without_directive(&self, name: &str) -> Self {
        self.with_directive(name, None::<DirectiveValue>)
    }

    pub fn directive(&self, name: &str) -> Option<&DirectiveValue> {
        let name = name.trim().to_ascii_lowercase();
        self.directives
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    /// Delta-seconds value of a directive
    ///
    /// Accepts the quoted form (`max-age="60"`) as well; flags and
    /// non-numeric arguments yield `None`.
    pub fn seconds(&self, name: &str) -> Option<u64> {
        match self.directive(name)? {
            DirectiveValue::Seconds(s) => Some(*s),
            DirectiveValue::Text(t) => parse_integer(t),
            DirectiveValue::Flag => None,
        }
    }

    #[must_use]
    pub fn with_max_age(&self, seconds: u64) -> Self {
        self.with_directive("max-age", seconds)
    }

    pub fn max_age(&self) -> Option<u64> {
        self.seconds("max-age")
    }

    #[must_use]
    pub fn with_no_cache(&self, flag: bool) -> Self {
        self.with_flag("no-cache", flag)
    }

    pub fn has_no_cache(&self) -> bool {
        self.has_flag("no-cache")
    }

    #[must_use]
    pub fn with_no_store(&self, flag: bool) -> Self {
        self.with_flag("no-store", flag)
    }

    pub fn has_no_store(&self) -> bool {
        self.has_flag("no-store")
    }

    #[must_use]
    pub fn with_no_transform(&self, flag: bool) -> Self {
        self.with_flag("no-transform", flag)
    }

    pub fn has_no_transform(&self) -> bool {
        self.has_flag("no-transform")
    }

    /// Add a cache extension directive (RFC 7234 §5.2.3)
    ///
    /// Quotes around the value are dropped; they are re-added on output when
    /// the value is not a plain token.
    pub fn with_extension(&self, name: &str, value: &str) -> Result<Self, ArgumentError> {
        if !is_token(name) || value.chars().any(|c| c.is_control() && c != '\t') {
            return Err(ArgumentError::InvalidExtension {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
        Ok(self.with_directive(name, strip_quotes(value)))
    }

    pub fn extension(&self, name: &str) -> Option<&str> {
        self.directive(name).and_then(DirectiveValue::as_text)
    }
}

impl<K: DirectiveKind> CacheControl<K> {
    /// Parse a raw Cache-Control header value
    pub fn parse(raw: &str) -> Parsed<Self> {
        let registry = K::registry();
        let mut control = Self::new();

        for segment in split_directives(raw) {
            let (name, value) = match segment.split_once('=') {
                Some((name, value)) => (name.trim(), Some(value.trim())),
                None => (segment, None),
            };
            if name.is_empty() {
                continue;
            }
            let name = name.to_ascii_lowercase();

            let action = match registry.get(&name) {
                Some(handler) => handler(value),
                None => DirectiveAction::Store(value.map_or(DirectiveValue::Flag, default_value)),
            };

            match action {
                DirectiveAction::Store(value) => control = control.with_directive(&name, value),
                DirectiveAction::Skip => {}
                DirectiveAction::Halt(result) => return Parsed::Halted(result),
            }
        }

        Parsed::Directives(control)
    }

    /// Parse, treating a short-circuited parse as an empty set
    pub fn parse_or_empty(raw: &str) -> Self {
        Self::parse(raw).into_directives().unwrap_or_default()
    }
}

impl<K> Default for CacheControl<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for CacheControl<K> {
    fn clone(&self) -> Self {
        Self {
            directives: self.directives.clone(),
            kind: PhantomData,
        }
    }
}

impl<K> PartialEq for CacheControl<K> {
    fn eq(&self, other: &Self) -> bool {
        self.directives == other.directives
    }
}

impl<K> Eq for CacheControl<K> {}

impl<K> fmt::Debug for CacheControl<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K> fmt::Display for CacheControl<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.directives.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                DirectiveValue::Flag => f.write_str(name)?,
                DirectiveValue::Seconds(s) => write!(f, "{name}={s}")?,
                DirectiveValue::Text(t) if is_token(t) && parse_integer(t).is_none() => {
                    write!(f, "{name}={t}")?;
                }
                DirectiveValue::Text(t) => write!(f, "{name}=\"{}\"", escape_quoted(t))?,
            }
        }
        Ok(())
    }
}

/// Generic rule for an argument without a registered handler
fn default_value(raw: &str) -> DirectiveValue {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return DirectiveValue::Text(unescape_quoted(&raw[1..raw.len() - 1]));
    }
    parse_integer(raw).map_or_else(
        || DirectiveValue::Text(raw.to_string()),
        DirectiveValue::Seconds,
    )
}

/// Optionally-signed decimal integer, negatives clamped to 0
fn parse_integer(raw: &str) -> Option<u64> {
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if negative {
        return Some(0);
    }
    // Overlong values saturate (RFC 7234 §1.2.1)
    Some(digits.parse::<u64>().unwrap_or(u64::MAX))
}

/// Split on commas outside quoted strings, trimming each segment
fn split_directives(raw: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in raw.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                segments.push(raw[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(raw[start..].trim());
    segments.retain(|s| !s.is_empty());
    segments
}

/// RFC 7230 §3.2.6 token
fn is_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn unescape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

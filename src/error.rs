//! Error types
//!
//! Everything that is a normal absence of data on the wire (missing headers,
//! unknown directives, unparsable tokens) degrades to `None`/`false` instead.
//! Only caller mistakes are reported through [`ArgumentError`].

use thiserror::Error;

/// Invalid argument passed to a cache header builder
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// Relative expiry given something other than a non-negative number of seconds
    #[error("expected an integer with the number of seconds, received {received}")]
    InvalidSeconds { received: String },

    /// Date string that no supported HTTP-date or ISO format accepts
    #[error("could not create a valid date from string")]
    InvalidDate { input: String },

    /// Extension directive name is not a token, or the value is not representable
    #[error("name and value of the extension must be strings")]
    InvalidExtension { name: String, value: String },
}

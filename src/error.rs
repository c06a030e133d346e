use std::time::Duration;

use thiserror::Error;

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for validation and request failures.
///
/// HTTP-level failures (a response with a non-200 status) are *not*
/// represented here; they are reported exclusively through the error
/// callback of [`crate::JsonParser::parse`].
#[derive(Error, Debug)]
pub enum Error {
    /// A value had the wrong runtime type or shape. The message is already
    /// rendered from the caller's template.
    #[error("{0}")]
    TypeMismatch(String),

    /// A numeric value fell outside its inclusive bounds.
    #[error("{0}")]
    RangeViolation(String),

    /// The fixed request deadline elapsed before a response arrived.
    #[error("Request timed out after {} ms.", .0.as_millis())]
    Timeout(Duration),

    /// Connection-level failure (DNS, refused connection, TLS).
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

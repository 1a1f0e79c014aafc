//! Error types for the Telegraph client core.
//!
//! # Design
//! `InvalidArgument` is raised by the endpoint builder before any URL
//! exists and names the offending field plus the rule it broke. The two
//! `Malformed*` variants separate a bad content tree from a bad envelope or
//! record. `HttpError` is the transport's failure kind: the core reports it
//! and never interprets it further.

use std::fmt;

use thiserror::Error;

/// Errors returned by the endpoint builder, the codec and the envelope decoder.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A call parameter broke a validation rule.
    #[error("invalid argument `{field}`: {violation}")]
    InvalidArgument {
        field: &'static str,
        violation: Violation,
    },

    /// JSON did not match the content-node shape.
    #[error("malformed content: {0}")]
    MalformedContent(String),

    /// JSON did not match the envelope or the expected result record.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The transport returned a non-200 status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// A value could not be serialized to JSON text.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    pub(crate) fn invalid(field: &'static str, violation: Violation) -> Self {
        ApiError::InvalidArgument { field, violation }
    }
}

/// The validation rule a parameter failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Empty or whitespace-only where a value is required.
    Blank,
    /// More than `max` characters.
    TooLong { max: usize },
    /// More than `max_bytes` bytes once UTF-8 encoded.
    TooLarge { max_bytes: usize },
    /// Outside the inclusive range.
    OutOfRange { min: i64, max: i64 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Blank => write!(f, "must not be blank"),
            Violation::TooLong { max } => write!(f, "must be at most {max} characters"),
            Violation::TooLarge { max_bytes } => write!(f, "must be at most {max_bytes} bytes"),
            Violation::OutOfRange { min, max } => write!(f, "must be between {min} and {max}"),
        }
    }
}

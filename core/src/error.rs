//! Error types for the catalog client.
//!
//! # Design
//! Four failure kinds reach callers: a required input was missing (nothing
//! was sent), the transport produced no response, the server answered with
//! a non-2xx status, or a 2xx body did not have the expected shape. Each is
//! returned unchanged; clients only log context before handing it back.
//!
//! `Remote` displays as the bare server message so callers can show it
//! as-is. The status code stays on the variant for programmatic checks.

use std::fmt;

use thiserror::Error;

/// Input that must be present before a request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Credential,
    Title,
    Content,
    BookId,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputField::Credential => "API key",
            InputField::Title => "title",
            InputField::Content => "content",
            InputField::BookId => "book id",
        };
        f.write_str(name)
    }
}

/// Errors returned by every client operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required input was empty. Raised before any network call.
    #[error("{0} is required")]
    MissingInput(InputField),

    /// No response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server returned a non-2xx status.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// A 2xx response whose body is not what the operation expects.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// True when the server reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Remote { status: 404, .. })
    }

    /// HTTP status of a `Remote` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

//! Error types for the Canvas course client.
//!
//! # Design
//! Non-200 responses are not errors here: course operations fold them into
//! `None` or `false`. `ApiError` covers what cannot be folded: the transport
//! failing outright, Canvas rejecting the bearer token, a success body that
//! does not match the expected shape, and bad configuration.

use thiserror::Error;

/// Errors returned by `CourseResource` and the messenger layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP exchange could not be completed (connection refused, DNS,
    /// truncated body, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// Canvas answered 401 with a `WWW-Authenticate` challenge.
    #[error("oauth token was rejected by canvas")]
    InvalidOauthToken,

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// A required setting is missing or malformed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "transport failed: connection refused");

        let err = ApiError::Config("CANVAS_BASE_URL is not set".to_string());
        assert_eq!(err.to_string(), "invalid configuration: CANVAS_BASE_URL is not set");
    }
}

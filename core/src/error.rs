//! Error types for the cinema API pipeline.
//!
//! # Design
//! Every failure a caller can branch on is a variant of `ApiError`:
//! authentication is checked client-side (`UserNotAuthenticated`), the HTTP
//! contract is checked per call (`UnexpectedStatusCode`) and the payload
//! shape is checked on decode and validation (`UnexpectedResponseContent`).
//! Transport failures pass through as the engine reported them.

use crate::http::TransportError;

/// Errors returned by the request pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An authenticated call was attempted while no user token is stored.
    /// Raised before any network call.
    #[error("user is not authenticated")]
    UserNotAuthenticated,

    /// The response status is outside the set accepted for the call.
    #[error("unexpected status code {status} from {path}")]
    UnexpectedStatusCode { status: u16, path: String },

    /// The body is not JSON, lacks `data`, or a required field is missing or
    /// of the wrong kind. `field` is the request path for decode failures and
    /// the field name for validation failures.
    #[error("unexpected response content at {field}: {detail}")]
    UnexpectedResponseContent { field: String, detail: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    pub(crate) fn content(field: impl Into<String>, detail: impl Into<String>) -> Self {
        ApiError::UnexpectedResponseContent {
            field: field.into(),
            detail: detail.into(),
        }
    }
}

/// Construction-time configuration failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cache lifetime window is empty: min {min}s > max {max}s")]
    InvalidLifetimeWindow { min: u64, max: u64 },

    #[error("missing setting: {0}")]
    Missing(&'static str),

    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_path() {
        let err = ApiError::UnexpectedStatusCode {
            status: 503,
            path: "chains".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected status code 503 from chains");
    }

    #[test]
    fn content_error_names_field() {
        let err = ApiError::content("name", "expected string");
        assert_eq!(err.to_string(), "unexpected response content at name: expected string");
    }

    #[test]
    fn transport_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = ApiError::from(TransportError::new(io));
        assert_eq!(err.to_string(), "transport failure: timed out");
    }
}

//! Error handling and custom error types
//!
//! Every failure a caller can observe is a variant of [`Error`], so callers can
//! branch on the kind of failure with `matches!` instead of inspecting messages.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Call deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("Envelope decode error: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("Schema validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Request encoding error: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl Error {
    /// Whether retrying the same call could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_transient(),
            _ => false,
        }
    }
}

/// Failures of a single HTTP exchange with the service.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Status { status: StatusCode, body: String },
}

impl TransportError {
    /// Network-level failures and overload/timeout statuses are worth retrying;
    /// other client errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Network(e) => {
                e.is_connect() || e.is_timeout() || e.is_request() || e.is_body()
            }
            TransportError::Status { status, .. } => is_transient_status(*status),
        }
    }
}

pub(crate) fn is_transient_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 429 | 500 | 502 | 503 | 504)
}

/// The outer body did not have the candidate/part shape.
#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("malformed response body: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("expected exactly 1 candidate, got {0}")]
    CandidateCount(usize),

    #[error("expected exactly 1 content part, got {0}")]
    PartCount(usize),
}

/// The inner `text` payload did not satisfy the caller's schema.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("response text is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("at `{path}`: {message}")]
    Schema { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_statuses() {
        for code in [408, 429, 500, 502, 503, 504] {
            let err = TransportError::Status {
                status: StatusCode::from_u16(code).unwrap(),
                body: String::new(),
            };
            assert!(err.is_transient(), "{} should be transient", code);
        }
    }

    #[test]
    fn test_client_errors_are_not_transient() {
        for code in [400, 401, 403, 404, 422, 501] {
            let err = TransportError::Status {
                status: StatusCode::from_u16(code).unwrap(),
                body: String::new(),
            };
            assert!(!err.is_transient(), "{} should not be transient", code);
        }
    }

    #[test]
    fn test_decode_failures_are_not_transient() {
        let err = Error::Envelope(EnvelopeError::CandidateCount(0));
        assert!(!err.is_transient());

        let err = Error::Validation(ValidationError::Schema {
            path: "age".to_string(),
            message: "invalid type".to_string(),
        });
        assert!(!err.is_transient());
    }

    #[test]
    fn test_schema_error_names_path() {
        let err = Error::Validation(ValidationError::Schema {
            path: "person.age".to_string(),
            message: "invalid type: string \"x\", expected f64".to_string(),
        });
        let msg = err.to_string();
        assert!(msg.contains("person.age"));
        assert!(msg.contains("expected f64"));
    }
}

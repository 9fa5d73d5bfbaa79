//! Error types for the OneSignal client.
//!
//! # Design
//! Every failure the client itself detects is an `ApiError`: a message, the
//! HTTP status when one was received, and a coarse `ApiErrorKind` so callers
//! can branch without string matching. Failures below HTTP (connection
//! refused, timeouts, TLS) are never rewritten into an `ApiError`; they are
//! carried untouched in `Error::Transport`.

use crate::transport::TransportError;

/// Message used when a response body cannot be decoded as JSON.
pub const DECODE_ERROR_MESSAGE: &str = "response was not valid JSON";

/// What went wrong, independent of the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The response body was empty or not JSON.
    Decode,

    /// The request payload could not be serialized to JSON.
    Encode,

    /// The server answered with a status other than 200.
    Status,

    /// A local precondition failed; no request was sent.
    InvalidArgument,
}

/// The single error raised for API-level failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    status_code: Option<u16>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code,
        }
    }

    pub fn decode(status_code: u16) -> Self {
        Self::new(ApiErrorKind::Decode, DECODE_ERROR_MESSAGE, Some(status_code))
    }

    pub fn encode(source: serde_json::Error) -> Self {
        Self::new(
            ApiErrorKind::Encode,
            format!("request payload could not be serialized: {source}"),
            None,
        )
    }

    pub fn status(status_code: u16, message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Status, message, Some(status_code))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::InvalidArgument, message, None)
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }
}

/// Errors returned by `OneSignal` operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API call failed, or was rejected locally before being sent.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The transport could not complete the HTTP exchange.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),
}

impl Error {
    /// The `ApiError` behind this error, if it is not a transport failure.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            Error::Transport(_) => None,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Error taxonomy for the resume gate and the content feed.
//!
//! Validation failures are raised locally before any network call. Gateway
//! failures carry the provider's message so it can be shown verbatim in the
//! status line. Nothing here is retried automatically.

use crate::gate::GateState;
use thiserror::Error;

/// Maximum number of provider message characters surfaced to the user.
pub const MAX_ERROR_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your email address.")]
    EmptyEmail,
    #[error("Enter the 6-digit code from your email.")]
    MalformedCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("{message}")]
    Provider { status: u16, message: String },
    #[error("Unable to reach the server: {0}")]
    Network(String),
    #[error("Request timed out. Please try again.")]
    Timeout,
    #[error("Response error: {0}")]
    Parse(String),
    #[error("No verified session")]
    NotAuthenticated,
    #[error("Config error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Builds a provider error from a raw response body.
    #[must_use]
    pub fn provider(status: u16, body: &str) -> Self {
        Self::Provider {
            status,
            message: sanitize_body(body),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("Could not open resume: {0}")]
    LinkUnavailable(GatewayError),
    #[error("Could not open resume: the download link expired")]
    LinkExpired,
    #[error("Could not open resume: {0}")]
    OpenFailed(String),
    #[error("Please wait, a request is already in progress.")]
    Busy,
    #[error("Action not available while {0}")]
    OutOfOrder(GateState),
    #[error("Request abandoned")]
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentLoadError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("invalid feed payload: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ContentLoadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Trims and truncates an error body for display.
#[must_use]
pub fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::auth::CredentialError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - session credential missing, invalid or expired")]
    Unauthorized { body: String },

    #[error("HTTP {status}: {}", truncate_body(.body))]
    Http { status: StatusCode, body: String },

    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Not authenticated - no session credential stored")]
    NotAuthenticated,

    #[error("Credential store error: {0}")]
    Credential(#[from] CredentialError),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

impl ApiError {
    /// Classify a non-success response. Only 401 gets its own variant.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            ApiError::Unauthorized {
                body: body.to_string(),
            }
        } else {
            ApiError::Http {
                status,
                body: body.to_string(),
            }
        }
    }

    /// Map a transport failure, keeping timeouts distinguishable from other
    /// network errors.
    pub fn from_transport(err: reqwest::Error, timeout: Option<Duration>) -> Self {
        match timeout {
            Some(timeout) if err.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(err),
        }
    }

    /// HTTP status carried by the failure, if it came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(err) => err.status(),
            _ => None,
        }
    }

    /// Response body carried by the failure, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { body } | ApiError::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    /// True when the server rejected the session credential (HTTP 401).
    pub fn is_auth_failure(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

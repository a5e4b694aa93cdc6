//! # Client Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Domain              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Http           │  │  Validation (report)    │ │
//! │  │  ConfigLoad     │  │  Api (status)   │  │  Core (draft ops)       │ │
//! │  │  InvalidUrl     │  │  PathSegment    │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockbook_core::{CoreError, ValidationReport};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors from configuration, the backend, or the form service.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to load config: {0}")]
    ConfigLoad(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Api { status: u16, message: String },

    /// An id cannot be placed in a request path.
    #[error("Invalid id in request path: '{0}'")]
    InvalidPathSegment(String),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// The pre-submission validation pass found problems.
    #[error("{0}")]
    Validation(#[from] ValidationReport),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    /// True when the user can fix the problem by editing the form.
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            ClientError::Validation(_) | ClientError::Api { status: 400..=422, .. }
        )
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoad(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoad(err.to_string())
    }
}

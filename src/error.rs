//! Error types for the dashboard
//!
//! Uses thiserror for ergonomic error definitions.
//! Every failure ends the current user action; nothing is retried.

use thiserror::Error;

/// Custom Result type using our Error
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Dashboard errors
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Form input rejected before contacting the backend
    #[error("{0}")]
    Validation(String),

    /// Backend answered with a non-2xx status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Transport or body parse failure
    #[error("Network error")]
    Network,

    /// Backend answered 2xx but the body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed endpoint URL
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Worker runtime errors
    #[error("Worker error: {0}")]
    Worker(String),
}

impl DashboardError {
    /// HTTP status associated with the error, 0 when none was received
    pub fn status(&self) -> u16 {
        match self {
            DashboardError::Api { status, .. } => *status,
            _ => 0,
        }
    }
}

impl From<worker::Error> for DashboardError {
    fn from(err: worker::Error) -> Self {
        DashboardError::Worker(err.to_string())
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(_: reqwest::Error) -> Self {
        DashboardError::Network
    }
}

impl From<DashboardError> for worker::Error {
    fn from(err: DashboardError) -> Self {
        worker::Error::RustError(err.to_string())
    }
}

//! Pedia error types

/// Pedia error types
#[derive(Debug, thiserror::Error)]
pub enum PediaError {
    // Upstream/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Every fetch attempt failed. Carries the cause of the final attempt.
    #[error("upstream fetch error after {attempts} attempts: {last}")]
    UpstreamUnavailable {
        attempts: u32,
        #[source]
        last: Box<PediaError>,
    },

    // Caller input errors (reported to tool callers as envelopes)
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("missing credential: {0}")]
    MissingCredential(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PediaError {
    /// Whether this error was caused by the caller's input rather than the
    /// environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PediaError::InvalidParameter(_) | PediaError::MissingCredential(_)
        )
    }
}

impl From<reqwest::Error> for PediaError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => PediaError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => PediaError::Http(err.to_string()),
        }
    }
}

/// Result type alias for Pedia operations
pub type Result<T> = std::result::Result<T, PediaError>;

//! Error types for the recommendation provider

use thiserror::Error;

/// Errors that can occur when asking a provider for recommendations.
///
/// Callers on the assessment path never surface these: every variant is
/// treated the same way and replaced by the fallback list.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// Provider answered with a non-success status.
    #[error("provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Response had no candidate text to parse.
    #[error("response has no candidate text")]
    MissingContent,

    /// Candidate text (or the envelope) was not the expected JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP/network error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error (missing API key, etc.).
    #[error("configuration error: {0}")]
    Config(String),
}

impl RecommendError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Status { .. } => "status",
            Self::MissingContent => "missing_content",
            Self::Json(_) => "invalid_json",
            Self::Http(_) => "http_error",
            Self::Config(_) => "config_error",
        }
    }
}

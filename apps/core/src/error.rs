use std::fmt;
use std::io;
use thiserror::Error;

/// External model-backed capabilities the analysis pipeline depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ZeroShot,
    Sentiment,
    Generation,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::ZeroShot => "zero-shot classification",
            Capability::Sentiment => "sentiment analysis",
            Capability::Generation => "text generation",
        };
        write!(f, "{}", name)
    }
}

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// The complaint text was rejected before any analysis stage ran.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A model-backed capability could not be reached or failed internally.
    #[error("{capability} capability unavailable: {reason}")]
    CapabilityUnavailable { capability: Capability, reason: String },

    /// Represents errors originating from the ticket store, typically from `sqlx`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents data validation errors (e.g., invalid configuration values).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., malformed environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl AppError {
    pub fn unavailable(capability: Capability, reason: impl Into<String>) -> Self {
        AppError::CapabilityUnavailable {
            capability,
            reason: reason.into(),
        }
    }

    /// Whether the caller can fix this error by changing the submitted text.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, AppError::InvalidInput(_))
    }

    /// Process exit status for the CLI: 2 for rejected input, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_user_correctable() {
            2
        } else {
            1
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Operation timed out: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

// Error types for album-check

use thiserror::Error;

/// Result type alias for album-check operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can stop a case or a whole run.
///
/// Verification mismatches are not errors: they are the expected output of a
/// suite and live in [`crate::verify::Mismatch`].
#[derive(Debug, Error)]
pub enum Error {
    /// Setup failed before any test case ran
    ///
    /// Fixture file missing or malformed, reference data unavailable, or the
    /// browser could not be started. Aborts the run.
    #[error("Setup failed: {0}")]
    Setup(String),

    /// A browser interaction failed while running a test case
    ///
    /// Abandons the current case; the run continues with the next one.
    #[error("Interaction '{action}' failed: {detail}")]
    Interaction { action: String, detail: String },

    /// Browser automation error
    #[error("Browser error: {0}")]
    Browser(#[from] playwright_rs::Error),

    /// Selector file or fixture file could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (fixture or log file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Creates an interaction error for the named action
    pub fn interaction(action: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Error::Interaction {
            action: action.into(),
            detail: detail.to_string(),
        }
    }

    /// Returns true if the error (or the error it wraps) came from writing the test log.
    pub fn is_log_write(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::Context(_, inner) => inner.is_log_write(),
            _ => false,
        }
    }
}

//! Error types for the diagnostics pipeline.

use thiserror::Error;

/// Errors produced by the diagnostics pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// A checked invariant did not hold and the caller cannot continue.
    #[error("ensure failed: {expr}")]
    EnsureFailed {
        /// Source text of the failed expression.
        expr: String,
    },

    /// I/O error while opening the log sinks.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A diagnostics service was already installed for this process.
    #[error("diagnostics service already installed")]
    AlreadyInstalled,
}

impl Error {
    /// Build the failure value for a violated ensure invariant.
    pub fn ensure_failed(expr: impl Into<String>) -> Self {
        Error::EnsureFailed { expr: expr.into() }
    }
}

/// Result type alias using the diagnostics [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

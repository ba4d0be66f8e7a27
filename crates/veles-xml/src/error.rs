//! Error types for XML loading.

use thiserror::Error;

/// Errors that can occur while loading info or text XML.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// The document contained no root element.
    #[error("no root element found in XML")]
    NoRoot,
}

/// Result type alias for XML operations.
pub type Result<T> = std::result::Result<T, Error>;

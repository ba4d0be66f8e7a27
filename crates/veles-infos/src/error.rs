//! Error types for info records.

use thiserror::Error;

/// Errors that can occur while reading info records.
#[derive(Debug, Error)]
pub enum Error {
    /// A record kind required a field its source did not declare.
    #[error("info record {info_type} is missing required field {field}")]
    MissingField {
        /// Identity key of the record being read (may be empty).
        info_type: String,
        /// Name of the missing field.
        field: String,
    },

    /// Invariant failure propagated out of a record read.
    #[error("{0}")]
    Diag(#[from] veles_diag::Error),
}

impl Error {
    /// Build the failure for a required field missing from a source.
    pub fn missing_field(info_type: impl Into<String>, field: impl Into<String>) -> Self {
        Error::MissingField {
            info_type: info_type.into(),
            field: field.into(),
        }
    }
}

/// Result type alias for info record operations.
pub type Result<T> = std::result::Result<T, Error>;

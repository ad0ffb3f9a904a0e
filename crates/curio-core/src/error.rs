//! Error types and result aliases for curio.
//!
//! This module defines the shared error types used across all curio crates.
//! Validation errors name the offending field so callers can surface a
//! precise message. Structural anomalies in metadata documents are not
//! errors at all: they degrade to most-restrictive defaults and are
//! recorded in the derived facets instead.

/// The result type used throughout curio.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in curio operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An invalid object identifier was provided.
    #[error("invalid identifier: {message}")]
    InvalidId {
        /// Description of what made the identifier invalid.
        message: String,
    },

    /// Caller-supplied input failed validation.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The field that failed validation.
        field: &'static str,
        /// What was expected of it.
        message: String,
    },

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A precondition for the operation was not met.
    #[error("precondition failed: {message}")]
    PreconditionFailed {
        /// Description of the failed precondition.
        message: String,
    },

    /// A metadata fetch from the backing store failed.
    #[error("fetch error: {message}")]
    Fetch {
        /// Description of the fetch failure.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Creates a validation error for the given field.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Creates a precondition-failed error with the given message.
    #[must_use]
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionFailed {
            message: message.into(),
        }
    }

    /// Creates a fetch error with the given message.
    #[must_use]
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a fetch error with a source cause.
    #[must_use]
    pub fn fetch_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Fetch {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

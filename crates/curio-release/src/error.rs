//! Error types for curio-release operations.

use thiserror::Error;

/// Result type alias for release operations.
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Errors that can occur during release-tag handling and resolution.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// A release-tag attribute failed validation.
    #[error("invalid release tag attribute '{field}': {message}")]
    Validation {
        /// The attribute that failed validation.
        field: &'static str,
        /// What was expected of it.
        message: String,
    },

    /// A collection-membership lookup failed.
    ///
    /// Whether this aborts a resolution or degrades to "no tags from that
    /// collection" is governed by the resolver's fetch policy.
    #[error("collection lookup failed for {druid}: {message}")]
    Lookup {
        /// The object whose collections could not be fetched.
        druid: String,
        /// Description of the failure.
        message: String,
    },

    /// A published-state listing could not be fetched.
    #[error("published-state lookup failed for {druid}: {message}")]
    Published {
        /// The object whose published state could not be fetched.
        druid: String,
        /// Description of the failure.
        message: String,
    },
}

impl ReleaseError {
    /// Creates a validation error for the given attribute.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

//! Error types for curio-rights operations.

use thiserror::Error;

/// Result type alias for rights operations.
pub type Result<T> = std::result::Result<T, RightsError>;

/// Errors that can occur during rights operations.
///
/// Only explicit mutation APIs raise errors. Malformed rights documents
/// degrade to a most-restrictive classification and record anomalies in the
/// derived facets instead of failing.
#[derive(Debug, Error)]
pub enum RightsError {
    /// A rights-type code outside the canonical set was supplied.
    #[error("'{code}' is not a recognized rights type")]
    UnknownRightsType {
        /// The offending code.
        code: String,
    },

    /// The document has no read-access section to rewrite.
    ///
    /// Rights assignment rewrites the existing read section; a document
    /// without one must be seeded from the template first.
    #[error("rights document has no read access section; seed it from the template first")]
    MissingReadAccess,

    /// An embargo release was requested but no post-embargo access policy
    /// was declared.
    #[error("embargo carries no release access policy")]
    MissingReleasePolicy,

    /// Serialization/deserialization of a rights document failed.
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },
}

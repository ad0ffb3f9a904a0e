//! Error types for curio-metadata operations.

use thiserror::Error;

/// Result type alias for metadata operations.
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Errors that can occur while working with an object's metadata.
///
/// The object model sits above the core, rights, and release layers, so
/// their errors pass through unchanged.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// A core-layer error (identifier or input validation).
    #[error(transparent)]
    Core(#[from] curio_core::Error),

    /// A rights-layer error.
    #[error(transparent)]
    Rights(#[from] curio_rights::RightsError),

    /// A release-layer error.
    #[error(transparent)]
    Release(#[from] curio_release::ReleaseError),
}

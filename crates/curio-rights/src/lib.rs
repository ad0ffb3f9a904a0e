//! # curio-rights
//!
//! The rights layer of the curio digital repository: the typed rights
//! document, its classification into coarse access buckets, canonical
//! rights-type assignment, embargo release, and the derived facets the
//! search index consumes.
//!
//! ## Design
//!
//! - **Tolerant reads, strict writes.** Parsing keeps whatever access nodes
//!   a document declares, conflicts included; classification resolves them
//!   through an explicit ordered predicate list and defaults to the most
//!   restrictive bucket. Mutation APIs ([`RightsDocument::set_read_rights`],
//!   [`embargo::release_embargo`]) validate preconditions and fail loudly.
//! - **Closed vocabularies.** Rights-type codes and access rules are enum
//!   types parsed at the boundary; no scattered string comparisons.
//! - **Value semantics.** Documents are plain values; callers that cache a
//!   derived [`RightsFacets`] must invalidate it on every mutation.
//!
//! ## Example
//!
//! ```rust
//! use curio_rights::{RightsBucket, RightsDocument};
//!
//! let mut doc = RightsDocument::template();
//! assert_eq!(doc.classify(), RightsBucket::Dark);
//!
//! doc.set_read_rights("world".parse().unwrap()).unwrap();
//! assert_eq!(doc.classify(), RightsBucket::World);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod auth;
pub mod document;
pub mod embargo;
pub mod error;
pub mod types;

// Re-export main types at crate root
pub use auth::{QualifiedAccess, RightsFacets, project_rights, use_licenses};
pub use document::{
    AccessNode, AccessSection, FileAccess, License, RightsBucket, RightsDocument, Rule,
};
pub use embargo::{EmbargoMetadata, EmbargoStatus, release_embargo};
pub use error::{Result, RightsError};
pub use types::{Location, RightsType};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::auth::{RightsFacets, project_rights};
    pub use crate::document::{AccessNode, AccessSection, RightsBucket, RightsDocument, Rule};
    pub use crate::embargo::{EmbargoMetadata, EmbargoStatus, release_embargo};
    pub use crate::error::{Result, RightsError};
    pub use crate::types::{Location, RightsType};
}

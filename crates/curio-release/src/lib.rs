//! # curio-release
//!
//! Release-tag handling for the curio digital repository: the release-tag
//! model and its boundary validation, and the resolver that computes which
//! targets consider an object released.
//!
//! ## Resolution in brief
//!
//! An object's release state per target is decided by the single most
//! recent applicable tag: the latest *self* tag when one exists (self tags
//! always trump collection tags, even older ones), otherwise the latest
//! *collection* tag whose administrative-tag gate the object satisfies.
//! Collection tags are gathered transitively across the membership graph
//! with a visited set, so self-referencing collections terminate.
//!
//! ## Example
//!
//! ```rust
//! use curio_core::Druid;
//! use curio_release::{
//!     CollectionLookup, ReleaseMember, ReleaseResolver, ReleaseSubject, Result,
//! };
//!
//! struct NoCollections;
//! impl CollectionLookup for NoCollections {
//!     fn collections_of(&self, _id: &Druid) -> Result<Vec<ReleaseMember>> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! let id = Druid::new("druid:bb123cd4567").unwrap();
//! let subject = ReleaseSubject {
//!     id: &id,
//!     release_tags: &[],
//!     administrative_tags: &[],
//! };
//! let resolved = ReleaseResolver::new(&NoCollections).released_for(&subject).unwrap();
//! assert!(resolved.is_empty());
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod resolver;
pub mod tag;

// Re-export main types at crate root
pub use error::{ReleaseError, Result};
pub use resolver::{
    CollectionLookup, FetchPolicy, PublishedTargets, ReleaseMember, ReleaseResolver, ReleaseState,
    ReleaseSubject, ReleasedFor, project_release, reconcile_published,
};
pub use tag::{ReleaseTag, ReleaseTagRequest, TagScope, parse_wire_bool};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ReleaseError, Result};
    pub use crate::resolver::{
        CollectionLookup, FetchPolicy, PublishedTargets, ReleaseMember, ReleaseResolver,
        ReleaseState, ReleaseSubject, ReleasedFor,
    };
    pub use crate::tag::{ReleaseTag, ReleaseTagRequest, TagScope};
}

//! # curio-metadata
//!
//! The object model of the curio digital repository: identity metadata and
//! its bookkeeping rules, the repository object that bundles an object's
//! documents, and the projections that flatten everything into
//! search-index documents.
//!
//! ## Example
//!
//! ```rust
//! use curio_core::{Druid, IndexDocument};
//! use curio_metadata::{IdentityMetadata, RepositoryObject, index_object};
//! use curio_release::ReleasedFor;
//!
//! let mut identity = IdentityMetadata::new(Druid::new("druid:bb123cd4567").unwrap());
//! identity.set_source_id(Some("sul:M0437")).unwrap();
//! let mut object = RepositoryObject::new(identity);
//! object.set_read_rights("world".parse().unwrap()).unwrap();
//!
//! let mut doc = IndexDocument::new();
//! index_object(&mut object, &ReleasedFor::new(), &mut doc);
//! assert_eq!(doc.values("rights_primary"), vec!["world"]);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod identity;
pub mod indexing;
pub mod object;

// Re-export main types at crate root
pub use error::{MetadataError, Result};
pub use identity::{
    CATKEY_ID, IdentityMetadata, ObjectType, OtherId, PREVIOUS_CATKEY_ID, SourceId,
};
pub use indexing::{index_object, project_identity};
pub use object::RepositoryObject;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MetadataError, Result};
    pub use crate::identity::{IdentityMetadata, ObjectType, OtherId, SourceId};
    pub use crate::indexing::{index_object, project_identity};
    pub use crate::object::RepositoryObject;
}

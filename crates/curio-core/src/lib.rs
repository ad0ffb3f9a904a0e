//! # curio-core
//!
//! Core primitives for the curio digital repository layer.
//!
//! This crate provides the foundational types shared by all curio components:
//!
//! - **Identifiers**: Strongly-typed druids for repository objects
//! - **Index Documents**: The flat field → value mapping handed to the search index
//! - **Event History**: Append-only audit trail for object mutations
//! - **Error Types**: Shared error definitions and result types
//! - **Observability**: Logging initialization and span helpers
//!
//! ## Crate Boundary
//!
//! `curio-core` is the only crate allowed to define shared primitives. The
//! rights, release, and metadata crates build on these types and never
//! redefine them.
//!
//! ## Example
//!
//! ```rust
//! use curio_core::prelude::*;
//!
//! let druid = Druid::new("druid:bb123cd4567").unwrap();
//! let mut doc = IndexDocument::new();
//! doc.set("id", druid.to_string());
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod events;
pub mod id;
pub mod index;
pub mod observability;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use curio_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::events::{Event, EventLog};
    pub use crate::id::Druid;
    pub use crate::index::{FieldValue, IndexDocument};
}

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use events::{Event, EventLog};
pub use id::Druid;
pub use index::{FieldValue, IndexDocument};
pub use observability::{LogFormat, init_logging};

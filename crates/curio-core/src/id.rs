//! Strongly-typed object identifiers (druids).
//!
//! Every object in the repository is addressed by a druid: a fixed-format
//! identifier such as `druid:bb123cd4567`. Druids are:
//! - **Strongly typed**: distinct from arbitrary strings at compile time
//! - **Canonical**: always stored with the `druid:` prefix, regardless of
//!   whether the input carried one
//! - **Identity**: equality and hashing drive the resolver's visited set
//!
//! # Example
//!
//! ```rust
//! use curio_core::id::Druid;
//!
//! let id: Druid = "druid:bb123cd4567".parse().unwrap();
//! assert_eq!(id.to_string(), "druid:bb123cd4567");
//! assert_eq!(id.bare(), "bb123cd4567");
//!
//! // The prefix is optional on input
//! let same: Druid = "bb123cd4567".parse().unwrap();
//! assert_eq!(id, same);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

const PREFIX: &str = "druid:";

/// A canonical repository object identifier.
///
/// Format: `druid:` followed by two lowercase letters, three digits, two
/// lowercase letters, and four digits (e.g. `druid:bb123cd4567`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Druid(String);

impl Druid {
    /// Creates a druid after validating the format.
    ///
    /// Accepts either the prefixed (`druid:bb123cd4567`) or bare
    /// (`bb123cd4567`) form; the prefixed form is stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidId`] if the identifier does not match the
    /// druid format.
    pub fn new(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref();
        let bare = id.strip_prefix(PREFIX).unwrap_or(id);
        if !Self::valid_bare(bare) {
            return Err(Error::InvalidId {
                message: format!("'{id}' is not a druid (expected form druid:bb123cd4567)"),
            });
        }
        Ok(Self(format!("{PREFIX}{bare}")))
    }

    /// Returns the identifier without the `druid:` prefix.
    #[must_use]
    pub fn bare(&self) -> &str {
        &self.0[PREFIX.len()..]
    }

    /// Returns the full prefixed identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn valid_bare(bare: &str) -> bool {
        let bytes = bare.as_bytes();
        if bytes.len() != 11 {
            return false;
        }
        let segments: [(usize, usize, fn(u8) -> bool); 4] = [
            (0, 2, |b: u8| b.is_ascii_lowercase()),
            (2, 5, |b: u8| b.is_ascii_digit()),
            (5, 7, |b: u8| b.is_ascii_lowercase()),
            (7, 11, |b: u8| b.is_ascii_digit()),
        ];
        segments
            .iter()
            .all(|(start, end, test)| bytes[*start..*end].iter().all(|b| test(*b)))
    }
}

impl fmt::Display for Druid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Druid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for Druid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

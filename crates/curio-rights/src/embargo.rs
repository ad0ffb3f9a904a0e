//! Embargo metadata and the embargo-release transition.
//!
//! An embargoed object keeps its read access restricted until a scheduled
//! release date. The post-embargo read policy is declared up front on the
//! embargo record; releasing the embargo swaps that policy into the rights
//! document, removes the release date, and writes an audit event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use curio_core::EventLog;

use crate::document::{AccessSection, RightsDocument};
use crate::error::{Result, RightsError};

/// The embargo lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbargoStatus {
    /// Read access is restricted pending the release date.
    Embargoed,
    /// The embargo has been lifted.
    Released,
}

/// An object's embargo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbargoMetadata {
    /// Current lifecycle state.
    pub status: EmbargoStatus,
    /// When the embargo is scheduled to lift.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<DateTime<Utc>>,
    /// The read access to apply once the embargo lifts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_access: Option<AccessSection>,
}

impl EmbargoMetadata {
    /// Creates an embargo record in the embargoed state.
    #[must_use]
    pub fn new(release_date: DateTime<Utc>, release_access: AccessSection) -> Self {
        Self {
            status: EmbargoStatus::Embargoed,
            release_date: Some(release_date),
            release_access: Some(release_access),
        }
    }

    /// Returns true while the embargo is in force.
    #[must_use]
    pub fn is_embargoed(&self) -> bool {
        self.status == EmbargoStatus::Embargoed
    }
}

/// Lifts an embargo: applies the pre-declared read policy to the rights
/// document, removes the embargo release date, marks the embargo released,
/// and records an `embargo` audit event attributed to `who`.
///
/// Returns `true` when the embargo was released by this call. Calling again
/// once released is a no-op returning `false`: nothing changes and no
/// second event is recorded.
///
/// # Errors
///
/// Returns [`RightsError::MissingReleasePolicy`] when the embargo record
/// declares no post-embargo read access.
pub fn release_embargo(
    rights: &mut RightsDocument,
    embargo: &mut EmbargoMetadata,
    events: &mut EventLog,
    who: &str,
) -> Result<bool> {
    if !embargo.is_embargoed() {
        return Ok(false);
    }
    let release_access = embargo
        .release_access
        .clone()
        .ok_or(RightsError::MissingReleasePolicy)?;

    rights.read = Some(release_access);
    rights.embargo_release_date = None;
    embargo.status = EmbargoStatus::Released;
    events.add_event("embargo", who, "Embargo released");
    Ok(true)
}

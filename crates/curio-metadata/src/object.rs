//! The repository object: the documents that together describe one object.
//!
//! A [`RepositoryObject`] bundles identity metadata, the rights document,
//! an optional embargo record, and the event history, and wires the
//! cross-document operations through: rights assignment, embargo release,
//! and release resolution. The derived rights facets are cached here and
//! invalidated on every rights mutation, so readers never see stale
//! derivations.

use serde::{Deserialize, Serialize};

use curio_core::{Druid, EventLog};
use curio_release::{
    CollectionLookup, ReleaseResolver, ReleaseSubject, ReleaseTag, ReleaseTagRequest, ReleasedFor,
};
use curio_rights::{
    EmbargoMetadata, RightsDocument, RightsFacets, RightsType, release_embargo,
};

use crate::error::Result;
use crate::identity::IdentityMetadata;

/// One repository object and its metadata documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryObject {
    /// Identity metadata.
    pub identity: IdentityMetadata,
    /// The event history.
    #[serde(default, skip_serializing_if = "EventLog::is_empty")]
    pub events: EventLog,
    /// The embargo record, when the object is or was embargoed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embargo: Option<EmbargoMetadata>,
    rights: RightsDocument,
    #[serde(skip)]
    facets: Option<RightsFacets>,
}

impl RepositoryObject {
    /// Creates an object with the given identity and the seeded (dark)
    /// rights template.
    #[must_use]
    pub fn new(identity: IdentityMetadata) -> Self {
        Self {
            identity,
            events: EventLog::new(),
            embargo: None,
            rights: RightsDocument::template(),
            facets: None,
        }
    }

    /// The object's druid.
    #[must_use]
    pub fn id(&self) -> &Druid {
        &self.identity.object_id
    }

    /// The object's rights document.
    #[must_use]
    pub fn rights(&self) -> &RightsDocument {
        &self.rights
    }

    /// Replaces the rights document wholesale, invalidating the facet
    /// cache.
    pub fn replace_rights(&mut self, rights: RightsDocument) {
        self.rights = rights;
        self.facets = None;
    }

    /// The derived rights facets, computed on first use and cached until
    /// the next rights mutation.
    pub fn rights_facets(&mut self) -> &RightsFacets {
        self.facets
            .get_or_insert_with(|| RightsFacets::derive(&self.rights))
    }

    /// The rights document together with its derived facets.
    pub fn rights_and_facets(&mut self) -> (&RightsDocument, &RightsFacets) {
        let facets = self
            .facets
            .get_or_insert_with(|| RightsFacets::derive(&self.rights));
        (&self.rights, facets)
    }

    /// Assigns a canonical rights type, rewriting discover and read access.
    ///
    /// # Errors
    ///
    /// Propagates rights-layer failures (unknown read section).
    pub fn set_read_rights(&mut self, rights: RightsType) -> Result<()> {
        self.rights.set_read_rights(rights)?;
        self.facets = None;
        Ok(())
    }

    /// Lifts the object's embargo, if one is in force.
    ///
    /// Returns `true` when this call released the embargo; an object with
    /// no embargo record, or one already released, is left untouched and
    /// returns `false`.
    ///
    /// # Errors
    ///
    /// Propagates rights-layer failures (missing release policy).
    pub fn release_embargo(&mut self, who: &str) -> Result<bool> {
        let Some(embargo) = self.embargo.as_mut() else {
            return Ok(false);
        };
        let released = release_embargo(&mut self.rights, embargo, &mut self.events, who)?;
        if released {
            self.facets = None;
        }
        Ok(released)
    }

    /// Validates and records a release tag on the object.
    ///
    /// # Errors
    ///
    /// Propagates release-tag attribute validation failures.
    pub fn add_release_tag(&mut self, request: ReleaseTagRequest) -> Result<ReleaseTag> {
        self.identity.add_release_tag(request)
    }

    /// The resolver's view of this object.
    #[must_use]
    pub fn release_subject(&self) -> ReleaseSubject<'_> {
        ReleaseSubject {
            id: &self.identity.object_id,
            release_tags: self.identity.release_tags(),
            administrative_tags: &self.identity.tags,
        }
    }

    /// Resolves which targets consider this object released.
    ///
    /// # Errors
    ///
    /// Propagates resolver failures under a strict fetch policy.
    pub fn released_for<L>(&self, resolver: &ReleaseResolver<'_, L>) -> Result<ReleasedFor>
    where
        L: CollectionLookup + ?Sized,
    {
        Ok(resolver.released_for(&self.release_subject())?)
    }
}

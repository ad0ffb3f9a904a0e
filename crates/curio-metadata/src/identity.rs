//! Identity metadata: who an object is and how the outside world refers to
//! it.
//!
//! Beyond the druid, an object carries a source identifier (the
//! `namespace:value` pair it was registered under), any number of named
//! other identifiers (barcodes, catalog keys), free-text administrative
//! tags, and its release-tag history. Catalog-key bookkeeping is the one
//! stateful rule here: changing a catkey preserves the old value under
//! `previous_catkey`.

use serde::{Deserialize, Serialize};
use std::fmt;

use curio_core::{Druid, Error};
use curio_release::{ReleaseTag, ReleaseTagRequest};

use crate::error::Result;

/// The other-id name under which the current catalog key is stored.
pub const CATKEY_ID: &str = "catkey";
/// The other-id name under which superseded catalog keys are kept.
pub const PREVIOUS_CATKEY_ID: &str = "previous_catkey";

const CONTENT_TYPE_TAG_PREFIX: &str = "Process : Content Type";

/// The kind of repository object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectType {
    /// A digital item.
    Item,
    /// A collection of items.
    Collection,
    /// An administrative policy object.
    AdminPolicy,
    /// A deposit agreement.
    Agreement,
    /// A set grouping objects outside collection membership.
    Set,
}

impl ObjectType {
    /// The wire name for this object type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Collection => "collection",
            Self::AdminPolicy => "adminPolicy",
            Self::Agreement => "agreement",
            Self::Set => "set",
        }
    }
}

/// A source identifier: the `namespace:value` pair an object was registered
/// under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceId {
    /// The registering namespace.
    pub namespace: String,
    /// The identifier within that namespace.
    pub value: String,
}

impl SourceId {
    /// Parses a `namespace:value` pair, stripping surrounding whitespace
    /// from both halves.
    ///
    /// # Errors
    ///
    /// Returns a validation error unless both halves are present and
    /// non-empty.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || {
            Error::validation(
                "source_id",
                format!("must follow the format 'namespace:value', not '{raw}'"),
            )
        };
        let (namespace, value) = raw.split_once(':').ok_or_else(invalid)?;
        let namespace = namespace.trim();
        let value = value.trim();
        if namespace.is_empty() || value.is_empty() {
            return Err(invalid().into());
        }
        Ok(Self {
            namespace: namespace.to_string(),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.value)
    }
}

/// A named secondary identifier (barcode, catalog key, legacy id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherId {
    /// The identifier kind (e.g. `barcode`, `catkey`).
    pub name: String,
    /// The identifier value.
    pub value: String,
}

impl fmt::Display for OtherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.value)
    }
}

/// An object's identity metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityMetadata {
    /// The object's druid.
    pub object_id: Druid,
    /// The kind of object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<ObjectType>,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_label: Option<String>,
    /// Administrative tags, free text (e.g. `Project : Revs`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_id: Option<SourceId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    other_ids: Vec<OtherId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    release_tags: Vec<ReleaseTag>,
}

impl IdentityMetadata {
    /// Creates identity metadata for an object.
    #[must_use]
    pub fn new(object_id: Druid) -> Self {
        Self {
            object_id,
            object_type: None,
            object_label: None,
            tags: Vec::new(),
            source_id: None,
            other_ids: Vec::new(),
            release_tags: Vec::new(),
        }
    }

    /// The source identifier, if set.
    #[must_use]
    pub fn source_id(&self) -> Option<&SourceId> {
        self.source_id.as_ref()
    }

    /// Sets or clears the source identifier.
    ///
    /// `None` or a blank string removes the value; anything else must parse
    /// as `namespace:value` (whitespace around either half is stripped).
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the expected format.
    pub fn set_source_id(&mut self, value: Option<&str>) -> Result<()> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => {
                self.source_id = None;
                Ok(())
            }
            Some(raw) => {
                self.source_id = Some(SourceId::parse(raw)?);
                Ok(())
            }
        }
    }

    /// All secondary identifiers.
    #[must_use]
    pub fn other_ids(&self) -> &[OtherId] {
        &self.other_ids
    }

    /// The values of secondary identifiers with the given name.
    #[must_use]
    pub fn other_id_values(&self, name: &str) -> Vec<&str> {
        self.other_ids
            .iter()
            .filter(|id| id.name == name)
            .map(|id| id.value.as_str())
            .collect()
    }

    /// Adds a secondary identifier.
    ///
    /// # Errors
    ///
    /// Returns a precondition error when an identifier with that name
    /// already exists; use [`IdentityMetadata::update_other_id`] instead.
    pub fn add_other_id(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        if !self.other_id_values(&name).is_empty() {
            return Err(Error::precondition(format!(
                "an identifier named '{name}' already exists; update it instead"
            ))
            .into());
        }
        self.other_ids.push(OtherId {
            name,
            value: value.into(),
        });
        Ok(())
    }

    /// Rewrites the value of matching identifiers; when `old_value` is
    /// given, only entries with that exact value change. Returns true when
    /// anything changed.
    pub fn update_other_id(
        &mut self,
        name: &str,
        new_value: &str,
        old_value: Option<&str>,
    ) -> bool {
        let mut changed = false;
        for id in &mut self.other_ids {
            if id.name == name && old_value.map_or(true, |old| id.value == old) {
                id.value = new_value.to_string();
                changed = true;
            }
        }
        changed
    }

    /// Removes matching identifiers; when `value` is given, only entries
    /// with that exact value go. Returns true when anything was removed.
    pub fn remove_other_id(&mut self, name: &str, value: Option<&str>) -> bool {
        let before = self.other_ids.len();
        self.other_ids
            .retain(|id| !(id.name == name && value.map_or(true, |v| id.value == v)));
        self.other_ids.len() != before
    }

    /// The current catalog key, if any.
    #[must_use]
    pub fn catkey(&self) -> Option<&str> {
        self.other_ids
            .iter()
            .find(|id| id.name == CATKEY_ID)
            .map(|id| id.value.as_str())
    }

    /// Superseded catalog keys, oldest first.
    #[must_use]
    pub fn previous_catkeys(&self) -> Vec<&str> {
        self.other_id_values(PREVIOUS_CATKEY_ID)
    }

    /// Sets, replaces, or clears the catalog key.
    ///
    /// A changed key moves the old value to [`PREVIOUS_CATKEY_ID`] first.
    /// A blank or absent value removes the current key. Assigning the
    /// current value again is a no-op.
    pub fn set_catkey(&mut self, value: Option<&str>) {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let current = self.catkey().map(ToString::to_string);

        if let Some(current_key) = &current {
            if value != Some(current_key.as_str()) {
                // previous keys accumulate; append directly
                self.other_ids.push(OtherId {
                    name: PREVIOUS_CATKEY_ID.to_string(),
                    value: current_key.clone(),
                });
            }
        }

        match (value, current) {
            (None, _) => {
                self.remove_other_id(CATKEY_ID, None);
            }
            (Some(new_key), None) => {
                self.other_ids.push(OtherId {
                    name: CATKEY_ID.to_string(),
                    value: new_key.to_string(),
                });
            }
            (Some(new_key), Some(_)) => {
                self.update_other_id(CATKEY_ID, new_key, None);
            }
        }
    }

    /// The content-type tag value, when the object carries exactly one
    /// `Process : Content Type : X` tag.
    #[must_use]
    pub fn content_type_tag(&self) -> Option<String> {
        let content_tags: Vec<&String> = self
            .tags
            .iter()
            .filter(|tag| tag.contains(CONTENT_TYPE_TAG_PREFIX))
            .collect();
        if content_tags.len() != 1 {
            return None;
        }
        content_tags[0]
            .rsplit(':')
            .next()
            .map(|value| value.trim().to_string())
    }

    /// The object's release-tag history.
    #[must_use]
    pub fn release_tags(&self) -> &[ReleaseTag] {
        &self.release_tags
    }

    /// Validates and appends a release tag, returning the normalized tag.
    ///
    /// # Errors
    ///
    /// Propagates release-tag attribute validation failures.
    pub fn add_release_tag(&mut self, request: ReleaseTagRequest) -> Result<ReleaseTag> {
        let tag = request.into_tag()?;
        self.release_tags.push(tag.clone());
        Ok(tag)
    }
}

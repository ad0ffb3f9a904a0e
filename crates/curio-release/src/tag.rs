//! Release tags: assertions about whether an object is released to a
//! target.
//!
//! A release tag names a target (a downstream project such as a discovery
//! site), a scope (the tagged object itself, or every member of a
//! collection), who made the assertion and when, and whether the assertion
//! is "released" or an explicit retraction. An optional administrative-tag
//! gate narrows a collection tag to objects carrying that exact tag.
//!
//! Only the most recent applicable tag for a given (object, target) pair
//! determines the outcome; older tags are superseded, never merged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ReleaseError, Result};

/// The scope of a release tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagScope {
    /// The tag applies to the tagged object itself.
    #[serde(rename = "self")]
    SelfTag,
    /// The tag applies to every member of the tagging collection.
    #[serde(rename = "collection")]
    Collection,
}

impl TagScope {
    /// The wire value for this scope.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SelfTag => "self",
            Self::Collection => "collection",
        }
    }
}

impl fmt::Display for TagScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TagScope {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "self" => Ok(Self::SelfTag),
            "collection" => Ok(Self::Collection),
            other => Err(ReleaseError::validation(
                "what",
                format!("must be 'self' or 'collection', not '{other}'"),
            )),
        }
    }
}

/// One release assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseTag {
    /// The release target (project name). Case is preserved.
    pub to: String,
    /// Whether this applies to the object itself or to collection members.
    pub what: TagScope,
    /// Attribution.
    pub who: String,
    /// When the assertion was made.
    pub when: DateTime<Utc>,
    /// `true` for released, `false` for an explicit retraction.
    pub release: bool,
    /// Administrative-tag gate: when present, the assertion applies only to
    /// objects carrying this exact administrative tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl ReleaseTag {
    /// Returns true when this tag applies to an object with the given
    /// administrative tags.
    ///
    /// A tag with no gate applies unconditionally; a gated tag applies only
    /// when the gate string matches one of the administrative tags exactly.
    #[must_use]
    pub fn applies_to(&self, administrative_tags: &[String]) -> bool {
        match &self.tag {
            None => true,
            Some(gate) => administrative_tags.iter().any(|t| t == gate),
        }
    }
}

/// Parses the wire boolean text of a release element.
///
/// The comparison is case-insensitive; any text other than `true` reads as
/// an explicit retraction.
#[must_use]
pub fn parse_wire_bool(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("true")
}

/// The boundary shape for adding a release tag.
///
/// Fields arrive untyped from callers (API payloads, migration scripts);
/// [`ReleaseTagRequest::into_tag`] validates the required attributes and
/// silently drops anything unrecognized. `when` defaults to the current UTC
/// time when unspecified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseTagRequest {
    /// The release target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// The scope string (`self` or `collection`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what: Option<String>,
    /// Attribution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub who: Option<String>,
    /// Assertion time; defaults to now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<DateTime<Utc>>,
    /// Released or retracted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<bool>,
    /// Optional administrative-tag gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Unrecognized attributes; accepted and dropped without error.
    #[serde(flatten, skip_serializing)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ReleaseTagRequest {
    /// Validates the request and produces a normalized tag.
    ///
    /// # Errors
    ///
    /// Returns a [`ReleaseError::Validation`] naming the offending
    /// attribute when `who` or `to` is missing or blank, `what` is not
    /// exactly `self` or `collection`, or `release` is absent.
    pub fn into_tag(self) -> Result<ReleaseTag> {
        let to = require_string("to", self.to)?;
        let who = require_string("who", self.who)?;
        let what: TagScope = self
            .what
            .ok_or_else(|| ReleaseError::validation("what", "must be 'self' or 'collection'"))?
            .parse()?;
        let release = self
            .release
            .ok_or_else(|| ReleaseError::validation("release", "must be true or false"))?;

        Ok(ReleaseTag {
            to,
            what,
            who,
            when: self.when.unwrap_or_else(Utc::now),
            release,
            tag: self.tag,
        })
    }
}

fn require_string(field: &'static str, value: Option<String>) -> Result<String> {
    let value =
        value.ok_or_else(|| ReleaseError::validation(field, "must be a non-empty string"))?;
    if value.trim().is_empty() {
        return Err(ReleaseError::validation(field, "must be a non-empty string"));
    }
    Ok(value)
}

//! The rights document model.
//!
//! A [`RightsDocument`] is the typed form of an object's persisted rights
//! record: a discover section, a read section, optional embargo date, use
//! and copyright statements, license references, and any per-file read
//! rules. Parsing is tolerant by design. A malformed record keeps every
//! access node it declares, including conflicting ones, and classification
//! resolves the conflict through a fixed predicate order rather than
//! failing.
//!
//! # Classification
//!
//! [`RightsDocument::classify`] buckets a document into one of four coarse
//! access classes. The checks are an ordered list and the first match wins,
//! which makes the precedence between conflicting assertions explicit:
//!
//! 1. exactly one `group` node under read ⇒ [`RightsBucket::Stanford`]
//! 2. exactly one `world` node under read ⇒ [`RightsBucket::World`]
//! 3. exactly one `none` node under discover ⇒ [`RightsBucket::Dark`]
//! 4. otherwise ⇒ [`RightsBucket::None`], the most restrictive default

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, RightsError};
use crate::types::RightsType;

/// The no-download access rule.
///
/// An independent modifier on an access node; it narrows an access grant to
/// viewing only and never changes which rights class is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// Viewing only, no download.
    #[serde(rename = "no-download")]
    NoDownload,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no-download")
    }
}

/// One machine-readable access assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "access", rename_all = "lowercase")]
pub enum AccessNode {
    /// Open to the world.
    World {
        /// Optional no-download rule.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rule: Option<Rule>,
    },
    /// Restricted to a named group.
    Group {
        /// The group name (e.g. `stanford`).
        name: String,
        /// Optional no-download rule.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rule: Option<Rule>,
    },
    /// Restricted to a named reading-room location.
    Location {
        /// The location name.
        name: String,
        /// Optional no-download rule.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rule: Option<Rule>,
    },
    /// Restricted to a named agent (an application, not a person).
    Agent {
        /// The agent name.
        name: String,
        /// Optional no-download rule.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rule: Option<Rule>,
    },
    /// No access.
    None,
}

/// An ordered list of access assertions for one scope.
///
/// Well-formed documents carry exactly one node per section; malformed ones
/// may carry several. Order is preserved so classification and facet
/// derivation see the document as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessSection {
    /// The access nodes, in document order.
    pub nodes: Vec<AccessNode>,
}

impl AccessSection {
    /// A section holding a single node.
    #[must_use]
    pub fn single(node: AccessNode) -> Self {
        Self { nodes: vec![node] }
    }

    /// Counts `world` nodes.
    #[must_use]
    pub fn world_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, AccessNode::World { .. }))
            .count()
    }

    /// Counts `group` nodes.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, AccessNode::Group { .. }))
            .count()
    }

    /// Counts `none` nodes.
    #[must_use]
    pub fn none_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, AccessNode::None))
            .count()
    }

    /// Returns true if any node is a `none`.
    #[must_use]
    pub fn has_none(&self) -> bool {
        self.none_count() > 0
    }

    /// Returns true if any node is a `world`.
    #[must_use]
    pub fn has_world(&self) -> bool {
        self.world_count() > 0
    }
}

/// A machine license reference with its human rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// The machine license code (e.g. `by-nc`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// The license URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// The human-readable license text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human: Option<String>,
}

impl License {
    /// The machine code, if present and non-blank.
    #[must_use]
    pub fn machine_code(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Read rules scoped to specific files within the object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAccess {
    /// The file names these rules govern.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    /// The read access for those files.
    #[serde(default)]
    pub read: AccessSection,
}

/// The coarse access classification of a rights document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RightsBucket {
    /// Read access restricted to the stanford group.
    Stanford,
    /// World-readable.
    World,
    /// Not even discoverable.
    Dark,
    /// No assertion matched; treated as most restrictive.
    None,
}

impl fmt::Display for RightsBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stanford => "Stanford",
            Self::World => "World",
            Self::Dark => "Dark",
            Self::None => "None",
        };
        write!(f, "{s}")
    }
}

/// An object's rights record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightsDocument {
    /// Discover access (machine). Absent in partial documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discover: Option<AccessSection>,
    /// Read access (machine). Absent in partial documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<AccessSection>,
    /// Embargo release date; only meaningful while read access is restricted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embargo_release_date: Option<DateTime<Utc>>,
    /// The use-and-reproduction statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_statement: Option<String>,
    /// The copyright statement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    /// Creative Commons license reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creative_commons: Option<License>,
    /// Open Data Commons license reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_data_commons: Option<License>,
    /// Per-file read rules.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_access: Vec<FileAccess>,
}

/// One classification check: a predicate and the bucket it selects.
type Classifier = (fn(&RightsDocument) -> bool, RightsBucket);

/// The ordered classification checks. First match wins.
const CLASSIFIERS: [Classifier; 3] = [
    (
        |doc| doc.read.as_ref().is_some_and(|r| r.group_count() == 1),
        RightsBucket::Stanford,
    ),
    (
        |doc| doc.read.as_ref().is_some_and(|r| r.world_count() == 1),
        RightsBucket::World,
    ),
    (
        |doc| doc.discover.as_ref().is_some_and(|d| d.none_count() == 1),
        RightsBucket::Dark,
    ),
];

impl RightsDocument {
    /// The seeded default document: dark (discover none, read none), with no
    /// statements or licenses.
    #[must_use]
    pub fn template() -> Self {
        Self {
            discover: Some(AccessSection::single(AccessNode::None)),
            read: Some(AccessSection::single(AccessNode::None)),
            ..Self::default()
        }
    }

    /// Parses a document from its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`RightsError::Serialization`] when the input is not valid
    /// JSON for this schema. Structurally incomplete documents (missing
    /// sections) parse fine and classify most-restrictively.
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RightsError::Serialization {
            message: format!("failed to parse rights document: {e}"),
        })
    }

    /// Serializes the document to its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`RightsError::Serialization`] on encoding failure.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| RightsError::Serialization {
            message: format!("failed to serialize rights document: {e}"),
        })
    }

    /// Classifies the document into its coarse rights bucket.
    ///
    /// Applies the ordered predicate list; the first matching check wins.
    /// Idempotent and infallible: documents that match nothing are
    /// [`RightsBucket::None`].
    #[must_use]
    pub fn classify(&self) -> RightsBucket {
        CLASSIFIERS
            .iter()
            .find(|(applies, _)| applies(self))
            .map_or(RightsBucket::None, |(_, bucket)| *bucket)
    }

    /// Rewrites discover and read access for the given canonical rights
    /// type.
    ///
    /// `dark` turns discover access off entirely; every other type makes the
    /// object world-discoverable. Read access follows the type code: world
    /// and stanford variants carry the no-download rule when requested,
    /// `loc:` types restrict to the named location, and `dark`/`none` close
    /// read access.
    ///
    /// # Errors
    ///
    /// Returns [`RightsError::MissingReadAccess`] when the document has no
    /// read section to rewrite; callers must seed such documents from
    /// [`RightsDocument::template`] first.
    pub fn set_read_rights(&mut self, rights: RightsType) -> Result<()> {
        if self.read.is_none() {
            return Err(RightsError::MissingReadAccess);
        }

        let discover_node = match rights {
            RightsType::Dark => AccessNode::None,
            _ => AccessNode::World { rule: None },
        };
        self.discover = Some(AccessSection::single(discover_node));

        let rule = |no_download: bool| no_download.then_some(Rule::NoDownload);
        let read_node = match rights {
            RightsType::World { no_download } => AccessNode::World {
                rule: rule(no_download),
            },
            RightsType::Stanford { no_download } => AccessNode::Group {
                name: "stanford".to_string(),
                rule: rule(no_download),
            },
            RightsType::Location(loc) => AccessNode::Location {
                name: loc.code().to_string(),
                rule: None,
            },
            RightsType::Dark | RightsType::Citation => AccessNode::None,
        };
        self.read = Some(AccessSection::single(read_node));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;

    fn doc_with_read(nodes: Vec<AccessNode>) -> RightsDocument {
        RightsDocument {
            discover: Some(AccessSection::single(AccessNode::World { rule: None })),
            read: Some(AccessSection { nodes }),
            ..RightsDocument::default()
        }
    }

    #[test]
    fn single_group_classifies_stanford() {
        let doc = doc_with_read(vec![AccessNode::Group {
            name: "stanford".into(),
            rule: None,
        }]);
        assert_eq!(doc.classify(), RightsBucket::Stanford);
    }

    #[test]
    fn single_world_classifies_world() {
        let doc = doc_with_read(vec![AccessNode::World { rule: None }]);
        assert_eq!(doc.classify(), RightsBucket::World);
    }

    #[test]
    fn discover_none_classifies_dark() {
        let doc = RightsDocument::template();
        assert_eq!(doc.classify(), RightsBucket::Dark);
    }

    #[test]
    fn empty_document_classifies_none() {
        assert_eq!(RightsDocument::default().classify(), RightsBucket::None);
    }

    #[test]
    fn classification_order_resolves_conflicts() {
        // group and world both present once: group check runs first
        let doc = doc_with_read(vec![
            AccessNode::World { rule: None },
            AccessNode::Group {
                name: "stanford".into(),
                rule: None,
            },
        ]);
        assert_eq!(doc.classify(), RightsBucket::Stanford);

        // two world nodes fail the exactly-one check and fall through
        let mut doc = doc_with_read(vec![
            AccessNode::World { rule: None },
            AccessNode::World { rule: None },
        ]);
        doc.discover = Some(AccessSection::single(AccessNode::None));
        assert_eq!(doc.classify(), RightsBucket::Dark);
    }

    #[test]
    fn classify_is_idempotent() {
        let doc = doc_with_read(vec![AccessNode::World { rule: None }]);
        assert_eq!(doc.classify(), doc.classify());
    }

    #[test]
    fn set_read_rights_world_then_classify() {
        let mut doc = RightsDocument::template();
        doc.set_read_rights("world".parse().unwrap()).unwrap();
        assert_eq!(doc.classify(), RightsBucket::World);
        assert_eq!(
            doc.discover,
            Some(AccessSection::single(AccessNode::World { rule: None }))
        );
    }

    #[test]
    fn set_read_rights_dark_then_classify() {
        let mut doc = RightsDocument::template();
        doc.set_read_rights("world".parse().unwrap()).unwrap();
        doc.set_read_rights("dark".parse().unwrap()).unwrap();
        assert_eq!(doc.classify(), RightsBucket::Dark);
    }

    #[test]
    fn set_read_rights_stanford_nd_carries_rule() {
        let mut doc = RightsDocument::template();
        doc.set_read_rights("stanford-nd".parse().unwrap()).unwrap();
        let read = doc.read.unwrap();
        assert_eq!(
            read.nodes,
            vec![AccessNode::Group {
                name: "stanford".into(),
                rule: Some(Rule::NoDownload),
            }]
        );
    }

    #[test]
    fn set_read_rights_location() {
        let mut doc = RightsDocument::template();
        doc.set_read_rights(RightsType::Location(Location::Music))
            .unwrap();
        let read = doc.read.unwrap();
        assert_eq!(
            read.nodes,
            vec![AccessNode::Location {
                name: "music".into(),
                rule: None,
            }]
        );
        assert_eq!(doc.discover.unwrap().nodes, vec![AccessNode::World { rule: None }]);
    }

    #[test]
    fn set_read_rights_requires_read_section() {
        let mut doc = RightsDocument::default();
        let err = doc.set_read_rights("world".parse().unwrap()).unwrap_err();
        assert!(matches!(err, RightsError::MissingReadAccess));
    }

    #[test]
    fn json_roundtrip_preserves_classification() {
        let mut doc = RightsDocument::template();
        doc.set_read_rights("stanford".parse().unwrap()).unwrap();
        doc.use_statement = Some("for scholarly use".into());
        doc.creative_commons = Some(License {
            code: Some("by-nc".into()),
            uri: Some("https://creativecommons.org/licenses/by-nc/3.0/".into()),
            human: Some("CC BY-NC".into()),
        });

        let json = doc.to_json().unwrap();
        let reparsed = RightsDocument::parse(&json).unwrap();
        assert_eq!(reparsed, doc);
        assert_eq!(reparsed.classify(), doc.classify());
    }

    #[test]
    fn partial_documents_parse_and_degrade() {
        let doc = RightsDocument::parse("{}").unwrap();
        assert_eq!(doc.classify(), RightsBucket::None);

        let err = RightsDocument::parse("not json").unwrap_err();
        assert!(matches!(err, RightsError::Serialization { .. }));
    }
}

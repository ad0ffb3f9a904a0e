//! Derived rights facets for indexing.
//!
//! [`RightsFacets`] is the flattened view of a rights document that the
//! search index consumes: the primary access bucket, any structural
//! anomalies found while reading the document, characteristic flags, and
//! the qualified access grants per scope (object vs. file). Deriving facets
//! never fails; anomalies land in [`RightsFacets::errors`] so downstream
//! auditing can find them.

use serde::{Deserialize, Serialize};

use curio_core::IndexDocument;

use crate::document::{AccessNode, AccessSection, RightsBucket, RightsDocument, Rule};

/// One qualified access grant: who or where, plus the optional rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualifiedAccess {
    /// The grant value: a group, agent, or location name, or `world`.
    pub value: String,
    /// The no-download rule, when the grant carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<Rule>,
}

impl QualifiedAccess {
    fn new(value: impl Into<String>, rule: Option<Rule>) -> Self {
        Self {
            value: value.into(),
            rule,
        }
    }

    fn rule_suffix(&self) -> String {
        self.rule
            .map(|r| format!(" ({r})"))
            .unwrap_or_default()
    }
}

/// The flattened rights view used for indexing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightsFacets {
    /// The primary rights bucket string (`world`, `world_qualified`,
    /// `access_restricted`, `access_restricted_qualified`, `dark`,
    /// `citation`).
    pub primary: String,
    /// Structural anomalies found while reading the document.
    pub errors: Vec<String>,
    /// Characteristic flags (e.g. `world_discover`, `none_read_file`).
    pub terms: Vec<String>,
    /// Object-scope location grants.
    pub obj_locations: Vec<QualifiedAccess>,
    /// File-scope location grants.
    pub file_locations: Vec<QualifiedAccess>,
    /// Object-scope agent grants.
    pub obj_agents: Vec<QualifiedAccess>,
    /// File-scope agent grants.
    pub file_agents: Vec<QualifiedAccess>,
    /// Object-scope group grants.
    pub obj_groups: Vec<QualifiedAccess>,
    /// File-scope group grants.
    pub file_groups: Vec<QualifiedAccess>,
    /// Object-scope world grants.
    pub obj_world: Vec<QualifiedAccess>,
    /// File-scope world grants.
    pub file_world: Vec<QualifiedAccess>,
}

/// Entries in the description list that restate the primary bucket less
/// precisely than the per-grant entries do.
const REDUNDANT_DESCRIPTIONS: [&str; 3] = [
    "access_restricted",
    "access_restricted_qualified",
    "world_qualified",
];

impl RightsFacets {
    /// Derives the facet view of a rights document. Never fails.
    #[must_use]
    pub fn derive(doc: &RightsDocument) -> Self {
        let mut facets = Self::default();

        if let Some(read) = &doc.read {
            collect_grants(
                read,
                &mut facets.obj_locations,
                &mut facets.obj_agents,
                &mut facets.obj_groups,
                &mut facets.obj_world,
            );
        }
        for file in &doc.file_access {
            collect_grants(
                &file.read,
                &mut facets.file_locations,
                &mut facets.file_agents,
                &mut facets.file_groups,
                &mut facets.file_world,
            );
        }

        facets.errors = derive_errors(doc);
        facets.terms = derive_terms(doc);
        facets.primary = derive_primary(doc).to_string();
        facets
    }

    /// Builds the de-duplicated human-readable description list.
    ///
    /// Each qualified grant renders with its rule suffix and, for file
    /// scope, a `(file)` marker. Entries that merely restate the primary
    /// bucket are suppressed, and file-level dark access surfaces as
    /// `dark (file)`.
    #[must_use]
    pub fn descriptions(&self) -> Vec<String> {
        let mut all = vec![self.primary.clone()];
        let render = |prefix: &str, file_scope: bool, grant: &QualifiedAccess| {
            let marker = if file_scope { " (file)" } else { "" };
            format!("{prefix}{marker}{}", grant.rule_suffix())
        };

        for grant in &self.obj_locations {
            all.push(render(&format!("location: {}", grant.value), false, grant));
        }
        for grant in &self.file_locations {
            all.push(render(&format!("location: {}", grant.value), true, grant));
        }
        for grant in &self.obj_agents {
            all.push(render(&format!("agent: {}", grant.value), false, grant));
        }
        for grant in &self.file_agents {
            all.push(render(&format!("agent: {}", grant.value), true, grant));
        }
        for grant in &self.obj_groups {
            all.push(render(&grant.value, false, grant));
        }
        for grant in &self.file_groups {
            all.push(render(&grant.value, true, grant));
        }
        for grant in &self.obj_world {
            all.push(render("world", false, grant));
        }
        for grant in &self.file_world {
            all.push(render("world", true, grant));
        }

        let mut seen = std::collections::BTreeSet::new();
        let mut descriptions: Vec<String> = all
            .into_iter()
            .filter(|d| !REDUNDANT_DESCRIPTIONS.contains(&d.as_str()))
            .filter(|d| seen.insert(d.clone()))
            .collect();

        if self.terms.iter().any(|t| t == "none_read_file") {
            descriptions.push("dark (file)".to_string());
        }
        descriptions
    }
}

fn collect_grants(
    section: &AccessSection,
    locations: &mut Vec<QualifiedAccess>,
    agents: &mut Vec<QualifiedAccess>,
    groups: &mut Vec<QualifiedAccess>,
    world: &mut Vec<QualifiedAccess>,
) {
    for node in &section.nodes {
        match node {
            AccessNode::Location { name, rule } => {
                locations.push(QualifiedAccess::new(name.clone(), *rule));
            }
            AccessNode::Agent { name, rule } => {
                agents.push(QualifiedAccess::new(name.clone(), *rule));
            }
            AccessNode::Group { name, rule } => {
                groups.push(QualifiedAccess::new(name.clone(), *rule));
            }
            AccessNode::World { rule } => {
                world.push(QualifiedAccess::new("world", *rule));
            }
            AccessNode::None => {}
        }
    }
}

fn derive_errors(doc: &RightsDocument) -> Vec<String> {
    let mut errors = Vec::new();
    match &doc.discover {
        None => errors.push("missing_discover_access".to_string()),
        Some(discover) => {
            if discover.nodes.len() > 1 {
                errors.push("conflicting_discover_access".to_string());
            }
        }
    }
    match &doc.read {
        None => errors.push("missing_read_access".to_string()),
        Some(read) => {
            if read.nodes.len() > 1 {
                errors.push("conflicting_read_access".to_string());
            }
        }
    }
    errors
}

fn derive_terms(doc: &RightsDocument) -> Vec<String> {
    let mut terms = Vec::new();
    if doc.discover.as_ref().is_some_and(AccessSection::has_world) {
        terms.push("world_discover".to_string());
    }
    if let Some(read) = &doc.read {
        if read.has_world() {
            terms.push("world_read".to_string());
        }
        if read.group_count() > 0 {
            terms.push("group_read".to_string());
        }
        if read
            .nodes
            .iter()
            .any(|n| matches!(n, AccessNode::Location { .. }))
        {
            terms.push("location_read".to_string());
        }
        if read
            .nodes
            .iter()
            .any(|n| matches!(n, AccessNode::Agent { .. }))
        {
            terms.push("agent_read".to_string());
        }
        if read.has_none() {
            terms.push("none_read".to_string());
        }
        if read.nodes.iter().any(node_has_rule) {
            terms.push("has_rule".to_string());
        }
    }
    if doc.embargo_release_date.is_some() {
        terms.push("has_embargo".to_string());
    }
    if doc.file_access.iter().any(|f| f.read.has_none()) {
        terms.push("none_read_file".to_string());
    }
    terms
}

fn node_has_rule(node: &AccessNode) -> bool {
    matches!(
        node,
        AccessNode::World { rule: Some(_) }
            | AccessNode::Group { rule: Some(_), .. }
            | AccessNode::Location { rule: Some(_), .. }
            | AccessNode::Agent { rule: Some(_), .. }
    )
}

fn derive_primary(doc: &RightsDocument) -> &'static str {
    let read_rule = |count_one: fn(&AccessNode) -> bool| {
        doc.read
            .as_ref()
            .and_then(|r| r.nodes.iter().find(|n| count_one(n)))
            .is_some_and(node_has_rule)
    };
    match doc.classify() {
        RightsBucket::Stanford => {
            if read_rule(|n| matches!(n, AccessNode::Group { .. })) {
                "access_restricted_qualified"
            } else {
                "access_restricted"
            }
        }
        RightsBucket::World => {
            if read_rule(|n| matches!(n, AccessNode::World { .. })) {
                "world_qualified"
            } else {
                "world"
            }
        }
        RightsBucket::Dark => "dark",
        RightsBucket::None => "citation",
    }
}

/// Projects a document's facets into a search-index document.
///
/// Only rights-owned keys are touched; unrelated fields in `index` are left
/// alone. Empty statements and licenses are suppressed.
pub fn project_rights(doc: &RightsDocument, facets: &RightsFacets, index: &mut IndexDocument) {
    index.set("rights_primary", facets.primary.clone());
    if !facets.errors.is_empty() {
        index.extend_unique("rights_errors", facets.errors.iter().cloned());
    }
    if !facets.terms.is_empty() {
        index.extend_unique("rights_characteristics", facets.terms.iter().cloned());
    }
    index.extend_unique("rights_descriptions", facets.descriptions());

    let plain = |grants: &[QualifiedAccess]| -> Vec<String> {
        grants.iter().map(|g| g.value.clone()).collect()
    };
    if !facets.obj_locations.is_empty() {
        index.extend_unique("object_rights_locations", plain(&facets.obj_locations));
    }
    if !facets.file_locations.is_empty() {
        index.extend_unique("file_rights_locations", plain(&facets.file_locations));
    }
    if !facets.obj_agents.is_empty() {
        index.extend_unique("object_rights_agents", plain(&facets.obj_agents));
    }
    if !facets.file_agents.is_empty() {
        index.extend_unique("file_rights_agents", plain(&facets.file_agents));
    }

    if let Some(statement) = non_blank(doc.use_statement.as_deref()) {
        index.add_unique("use_statement", statement);
    }
    if let Some(copyright) = non_blank(doc.copyright.as_deref()) {
        index.add_unique("copyright", copyright);
    }

    let licenses = use_licenses(doc);
    if let Some(first) = licenses.first() {
        index.set("use_license_machine", (*first).to_string());
    }
    if !licenses.is_empty() {
        index.extend_unique("use_licenses_machine", licenses.iter().map(ToString::to_string));
    }
}

/// The machine license codes carried by the document, blank-filtered,
/// creative commons first.
#[must_use]
pub fn use_licenses(doc: &RightsDocument) -> Vec<&str> {
    [&doc.creative_commons, &doc.open_data_commons]
        .into_iter()
        .flatten()
        .filter_map(super::document::License::machine_code)
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

//! Index-document projections.
//!
//! Each projection flattens one metadata document into fields on a
//! caller-owned [`IndexDocument`]. Projections only add or merge values
//! under their own keys; a document that already carries fields from other
//! components keeps them untouched. [`index_object`] runs every projection
//! for an object in one pass.

use curio_core::IndexDocument;
use curio_release::{ReleasedFor, project_release};
use curio_rights::project_rights;

use crate::identity::IdentityMetadata;
use crate::object::RepositoryObject;

/// Projects identity metadata into the index document.
///
/// Identifiers surface three ways: the joined `name:value` form under
/// `identifier`, the bare value under `id_value`, and per-name fields such
/// as `catkey_id` or `barcode_id`. Administrative tags are exploded so each
/// prefix of `A : B : C` is searchable, and tags of the form
/// `Prefix : rest` additionally index the rest under a field named for the
/// prefix (e.g. `project_tag`).
pub fn project_identity(identity: &IdentityMetadata, index: &mut IndexDocument) {
    index.set("object_id", identity.object_id.to_string());
    if let Some(object_type) = identity.object_type {
        index.set("object_type", object_type.as_str());
    }
    if let Some(label) = &identity.object_label {
        index.set("object_label", label.clone());
    }

    if let Some(source_id) = identity.source_id() {
        index.add_unique("id_value", source_id.value.clone());
        index.add_unique("identifier", source_id.to_string());
        index.set("source_id", source_id.to_string());
    }
    for other_id in identity.other_ids() {
        index.add_unique("id_value", other_id.value.clone());
        index.add_unique("identifier", other_id.to_string());
        index.add_unique(format!("{}_id", other_id.name), other_id.value.clone());
    }

    for tag in &identity.tags {
        project_tag(tag, index);
    }

    if let Some(content_type) = identity.content_type_tag() {
        index.set("content_type", content_type);
    }
}

/// Explodes one administrative tag into its index fields.
fn project_tag(tag: &str, index: &mut IndexDocument) {
    if let Some((prefix, rest)) = tag.split_once(':') {
        let field_prefix = prefix
            .to_lowercase()
            .trim()
            .replace(char::is_whitespace, "_");
        if !field_prefix.is_empty() && !rest.trim().is_empty() {
            index.add_unique(format!("{field_prefix}_tag"), rest.trim());
        }
    }

    // each progressive prefix of "A : B : C": "A", "A : B", "A : B : C"
    let mut progressive = String::new();
    for (i, part) in tag.split(':').enumerate() {
        if i > 0 {
            progressive.push_str(" : ");
        }
        progressive.push_str(part.trim());
        index.add_unique("exploded_tag", progressive.clone());
    }
}

/// Projects every document of an object, plus its resolved release state,
/// into the index document.
pub fn index_object(
    object: &mut RepositoryObject,
    resolved: &ReleasedFor,
    index: &mut IndexDocument,
) {
    let span = curio_core::observability::indexing_span("index_object", object.id().as_str());
    let _guard = span.enter();

    project_identity(&object.identity, index);
    let (rights, facets) = object.rights_and_facets();
    project_rights(rights, facets, index);
    project_release(resolved, index);
}

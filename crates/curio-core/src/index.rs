//! Search-index documents.
//!
//! An [`IndexDocument`] is the flat field → value mapping handed to the
//! search index. The document is owned by the caller and may already carry
//! fields written by other components; everything here therefore only adds
//! or merges values under its own keys and never clobbers a key it does not
//! own.
//!
//! Fields hold either a single scalar or a list of scalars. Appending to a
//! scalar field promotes it to a list, preserving the existing value.
//!
//! # Example
//!
//! ```rust
//! use curio_core::index::IndexDocument;
//!
//! let mut doc = IndexDocument::new();
//! doc.add("released_to", "Searchworks");
//! doc.add("released_to", "Earthworks");
//! assert_eq!(doc.values("released_to"), vec!["Searchworks", "Earthworks"]);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single field value: scalar or list of scalars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A single value.
    Scalar(String),
    /// An ordered list of values.
    List(Vec<String>),
}

impl FieldValue {
    fn push(&mut self, value: String) {
        match self {
            Self::Scalar(existing) => {
                let first = std::mem::take(existing);
                *self = Self::List(vec![first, value]);
            }
            Self::List(values) => values.push(value),
        }
    }

    fn contains(&self, value: &str) -> bool {
        match self {
            Self::Scalar(existing) => existing == value,
            Self::List(values) => values.iter().any(|v| v == value),
        }
    }
}

/// A flat search-index document: field name → scalar or list of scalars.
///
/// Field order is deterministic (sorted by name) so serialized documents are
/// stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexDocument {
    fields: BTreeMap<String, FieldValue>,
}

impl IndexDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field to a single scalar value, replacing any prior value
    /// under that key. Use only for keys the calling component owns.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields
            .insert(field.into(), FieldValue::Scalar(value.into()));
    }

    /// Appends a value to a field, creating the field if absent and
    /// promoting a scalar to a list if needed. Duplicates are kept.
    pub fn add(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        self.fields
            .entry(field.into())
            .and_modify(|existing| existing.push(value.clone()))
            .or_insert(FieldValue::Scalar(value));
    }

    /// Appends a value to a field unless the field already contains it.
    pub fn add_unique(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.fields.get_mut(&field) {
            Some(existing) => {
                if !existing.contains(&value) {
                    existing.push(value);
                }
            }
            None => {
                self.fields.insert(field, FieldValue::Scalar(value));
            }
        }
    }

    /// Appends every value in `values` to a field, skipping duplicates.
    pub fn extend_unique<I, V>(&mut self, field: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        for value in values {
            self.add_unique(field.to_string(), value);
        }
    }

    /// Removes the named values from a field, dropping the field entirely if
    /// nothing remains.
    pub fn suppress(&mut self, field: &str, unwanted: &[&str]) {
        let kept: Vec<String> = match self.fields.get_mut(field) {
            None => return,
            Some(FieldValue::Scalar(v)) => {
                if unwanted.contains(&v.as_str()) {
                    Vec::new()
                } else {
                    vec![std::mem::take(v)]
                }
            }
            Some(FieldValue::List(values)) => values
                .drain(..)
                .filter(|v| !unwanted.contains(&v.as_str()))
                .collect(),
        };
        if kept.is_empty() {
            self.fields.remove(field);
        } else {
            self.fields
                .insert(field.to_string(), FieldValue::List(kept));
        }
    }

    /// Returns the raw value of a field, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Returns every value of a field as a flat list (empty if absent).
    #[must_use]
    pub fn values(&self, field: &str) -> Vec<&str> {
        match self.fields.get(field) {
            Some(FieldValue::Scalar(v)) => vec![v.as_str()],
            Some(FieldValue::List(values)) => values.iter().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }

    /// Returns true if the field is present.
    #[must_use]
    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterates over `(field, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the document has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_promotes_scalar_to_list() {
        let mut doc = IndexDocument::new();
        doc.add("tag", "first");
        assert_eq!(doc.get("tag"), Some(&FieldValue::Scalar("first".into())));
        doc.add("tag", "second");
        assert_eq!(doc.values("tag"), vec!["first", "second"]);
    }

    #[test]
    fn add_unique_skips_duplicates() {
        let mut doc = IndexDocument::new();
        doc.add_unique("tag", "a");
        doc.add_unique("tag", "a");
        doc.add_unique("tag", "b");
        assert_eq!(doc.values("tag"), vec!["a", "b"]);
    }

    #[test]
    fn adds_never_touch_unrelated_keys() {
        let mut doc = IndexDocument::new();
        doc.set("someone_elses_field", "untouched");
        doc.add("released_to", "Searchworks");
        doc.extend_unique("rights_descriptions", ["world", "world"]);
        assert_eq!(doc.values("someone_elses_field"), vec!["untouched"]);
        assert_eq!(doc.values("rights_descriptions"), vec!["world"]);
    }

    #[test]
    fn suppress_removes_values_and_empty_fields() {
        let mut doc = IndexDocument::new();
        doc.extend_unique("descriptions", ["keep", "drop_a", "drop_b"]);
        doc.suppress("descriptions", &["drop_a", "drop_b"]);
        assert_eq!(doc.values("descriptions"), vec!["keep"]);

        doc.suppress("descriptions", &["keep"]);
        assert!(!doc.contains_field("descriptions"));

        // suppressing a missing field is a no-op
        doc.suppress("absent", &["x"]);
    }

    #[test]
    fn serializes_scalars_and_lists_flat() {
        let mut doc = IndexDocument::new();
        doc.set("primary", "world");
        doc.add("tags", "a");
        doc.add("tags", "b");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"primary": "world", "tags": ["a", "b"]})
        );
    }

    #[test]
    fn deserialize_roundtrip() {
        let json = serde_json::json!({"primary": "world", "tags": ["a", "b"]});
        let doc: IndexDocument = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), json);
    }
}

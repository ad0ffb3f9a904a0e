//! Release-tag resolution.
//!
//! Given an object, its administrative tags, and the release tags of the
//! object and every collection it transitively belongs to, resolution
//! computes which targets consider the object released:
//!
//! 1. the object's own tags and the tags of every governing collection are
//!    merged per target (union, de-duplicated, each collection visited at
//!    most once so self-referencing membership cannot loop);
//! 2. for each target, the most recent *self* tag wins outright when one
//!    exists;
//! 3. otherwise the most recent *applicable* collection tag decides, where
//!    a tag gated on an administrative tag applies only to objects carrying
//!    that exact tag; inapplicable candidates are discarded newest-first
//!    and an exhausted candidate list leaves the target unresolved;
//! 4. optionally, targets a publish endpoint already knows about but that
//!    resolution no longer produces are added as explicit retractions.
//!
//! Timestamp comparison is chronological. When two tags for a target carry
//! the same timestamp, the one encountered later in the merged order wins.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet, VecDeque};

use curio_core::{Druid, IndexDocument};

use crate::error::{ReleaseError, Result};
use crate::tag::{ReleaseTag, TagScope};

/// The resolved outcome for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseState {
    /// Whether the target considers the object released.
    pub released: bool,
}

/// The resolved outcome map: target name to release state.
pub type ReleasedFor = BTreeMap<String, ReleaseState>;

/// The resolver's view of the object being resolved.
#[derive(Debug, Clone, Copy)]
pub struct ReleaseSubject<'a> {
    /// The object's identity (seed of the cycle guard).
    pub id: &'a Druid,
    /// The object's own release tags.
    pub release_tags: &'a [ReleaseTag],
    /// The object's administrative tags, for gate checks.
    pub administrative_tags: &'a [String],
}

/// One governing collection as returned by the membership accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseMember {
    /// The collection's identity.
    pub id: Druid,
    /// The collection's release tags.
    pub release_tags: Vec<ReleaseTag>,
}

/// External accessor for collection membership.
///
/// Implementations read from whatever store holds the membership graph.
/// Calls are synchronous and read-only; the resolver bounds them with its
/// visited set, never by trusting the graph to be acyclic.
pub trait CollectionLookup {
    /// Returns the collections the given object directly belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::Lookup`] when the store cannot be read. The
    /// resolver's [`FetchPolicy`] decides whether that aborts resolution.
    fn collections_of(&self, id: &Druid) -> Result<Vec<ReleaseMember>>;
}

/// External listing of targets a publish endpoint already knows about.
pub trait PublishedTargets {
    /// Returns the target names currently recorded for the object.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::Published`] when the listing cannot be
    /// fetched.
    fn published_targets(&self, id: &Druid) -> Result<Vec<String>>;
}

/// What to do when a collection or published-state fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Treat the unreachable source as contributing nothing, log a
    /// warning, and keep resolving.
    #[default]
    Degrade,
    /// Propagate the failure and abort the resolution.
    Abort,
}

/// Resolves release state for objects against a membership store.
#[derive(Debug)]
pub struct ReleaseResolver<'a, L: CollectionLookup + ?Sized> {
    lookup: &'a L,
    policy: FetchPolicy,
}

impl<'a, L: CollectionLookup + ?Sized> ReleaseResolver<'a, L> {
    /// Creates a resolver with the default (degrading) fetch policy.
    pub fn new(lookup: &'a L) -> Self {
        Self {
            lookup,
            policy: FetchPolicy::default(),
        }
    }

    /// Overrides the fetch policy.
    #[must_use]
    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Computes the release state of every target with a resolvable tag.
    ///
    /// Targets whose only tags are inapplicable collection tags are absent
    /// from the result, not defaulted to false.
    ///
    /// # Errors
    ///
    /// Under [`FetchPolicy::Abort`], propagates the first failed collection
    /// fetch. Under [`FetchPolicy::Degrade`] this never fails.
    pub fn released_for(&self, subject: &ReleaseSubject<'_>) -> Result<ReleasedFor> {
        let merged = self.merged_tags(subject)?;
        let mut resolved = ReleasedFor::new();

        // Most recent self tag trumps everything else for its target.
        for (target, tags) in &merged {
            let self_tags: Vec<&ReleaseTag> = tags
                .iter()
                .filter(|t| t.what == TagScope::SelfTag)
                .collect();
            if let Some(latest) = newest_tag(&self_tags) {
                resolved.insert(
                    target.clone(),
                    ReleaseState {
                        released: latest.release,
                    },
                );
            }
        }

        // Remaining targets fall to the latest applicable collection tag.
        for (target, tags) in &merged {
            if resolved.contains_key(target) {
                continue;
            }
            let collection_tags: Vec<&ReleaseTag> = tags
                .iter()
                .filter(|t| t.what == TagScope::Collection)
                .collect();
            if let Some(tag) =
                latest_applicable_tag(&collection_tags, subject.administrative_tags)
            {
                resolved.insert(
                    target.clone(),
                    ReleaseState {
                        released: tag.release,
                    },
                );
            }
        }

        Ok(resolved)
    }

    /// Resolves release state and reconciles it against the published
    /// listing: targets the endpoint knows (compared case-insensitively)
    /// that resolution no longer produces are added with
    /// `released: false`. Freshly computed entries are never overwritten.
    ///
    /// # Errors
    ///
    /// Under [`FetchPolicy::Abort`], propagates fetch failures from either
    /// source.
    pub fn released_for_with_published(
        &self,
        subject: &ReleaseSubject<'_>,
        published: &dyn PublishedTargets,
    ) -> Result<ReleasedFor> {
        let mut resolved = self.released_for(subject)?;
        match published.published_targets(subject.id) {
            Ok(targets) => reconcile_published(&mut resolved, &targets),
            Err(err) => match self.policy {
                FetchPolicy::Degrade => {
                    tracing::warn!(
                        druid = %subject.id,
                        error = %err,
                        "published-state listing unavailable; skipping reconciliation"
                    );
                }
                FetchPolicy::Abort => return Err(err),
            },
        }
        Ok(resolved)
    }

    /// Merges the subject's tags with those of every transitively governing
    /// collection, grouped by target.
    ///
    /// Traversal is breadth-first over the membership graph with a visited
    /// set keyed by druid, seeded with the subject itself: a collection that
    /// lists itself (directly or transitively) contributes its tags exactly
    /// once.
    fn merged_tags(&self, subject: &ReleaseSubject<'_>) -> Result<BTreeMap<String, Vec<ReleaseTag>>> {
        let mut merged = BTreeMap::new();
        merge_tags(&mut merged, subject.release_tags.iter().cloned());

        let mut visited: HashSet<Druid> = HashSet::new();
        visited.insert(subject.id.clone());
        let mut queue: VecDeque<Druid> = VecDeque::new();
        queue.push_back(subject.id.clone());

        while let Some(current) = queue.pop_front() {
            let members = match self.lookup.collections_of(&current) {
                Ok(members) => members,
                Err(err) => match self.policy {
                    FetchPolicy::Degrade => {
                        tracing::warn!(
                            druid = %current,
                            error = %err,
                            "collection lookup failed; treating as contributing no tags"
                        );
                        continue;
                    }
                    FetchPolicy::Abort => return Err(err),
                },
            };
            for member in members {
                if visited.insert(member.id.clone()) {
                    merge_tags(&mut merged, member.release_tags.into_iter());
                    queue.push_back(member.id);
                }
            }
        }

        Ok(merged)
    }
}

/// Appends tags into the per-target map, skipping exact duplicates.
fn merge_tags(
    merged: &mut BTreeMap<String, Vec<ReleaseTag>>,
    tags: impl Iterator<Item = ReleaseTag>,
) {
    for tag in tags {
        let entry = merged.entry(tag.to.clone()).or_default();
        if !entry.contains(&tag) {
            entry.push(tag);
        }
    }
}

/// The most recent tag in the slice; on identical timestamps the later
/// entry wins.
fn newest_tag<'t>(tags: &[&'t ReleaseTag]) -> Option<&'t ReleaseTag> {
    let mut newest: Option<&ReleaseTag> = None;
    for tag in tags {
        if newest.map_or(true, |best| tag.when >= best.when) {
            newest = Some(tag);
        }
    }
    newest
}

/// The most recent tag that applies to an object with the given
/// administrative tags.
///
/// Candidates are scanned newest-first; an inapplicable candidate is
/// discarded and the scan continues. Returns `None` when every candidate is
/// inapplicable.
fn latest_applicable_tag<'t>(
    tags: &[&'t ReleaseTag],
    administrative_tags: &[String],
) -> Option<&'t ReleaseTag> {
    let mut ordered: Vec<(usize, &ReleaseTag)> = tags.iter().copied().enumerate().collect();
    // newest first; equal timestamps keep the later original entry first
    ordered.sort_by(|(ia, a), (ib, b)| b.when.cmp(&a.when).then(ib.cmp(ia)));
    ordered
        .into_iter()
        .map(|(_, tag)| tag)
        .find(|tag| tag.applies_to(administrative_tags))
}

/// Adds `released: false` entries for published targets missing from the
/// resolved map. Comparison is case-insensitive; computed entries are never
/// overwritten and the listing's casing is kept for added entries.
pub fn reconcile_published(resolved: &mut ReleasedFor, published: &[String]) {
    for target in published {
        let known = resolved
            .keys()
            .any(|existing| existing.eq_ignore_ascii_case(target));
        if !known {
            resolved.insert(target.clone(), ReleaseState { released: false });
        }
    }
}

/// Projects a resolved map into a search-index document: the `released_to`
/// field lists every target that resolved released.
pub fn project_release(resolved: &ReleasedFor, index: &mut IndexDocument) {
    for (target, state) in resolved {
        if state.released {
            index.add_unique("released_to", target.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 1, day, 23, 33, 47).unwrap()
    }

    fn tag(to: &str, what: TagScope, when: DateTime<Utc>, release: bool) -> ReleaseTag {
        ReleaseTag {
            to: to.into(),
            what,
            who: "carrickr".into(),
            when,
            release,
            tag: None,
        }
    }

    fn gated(to: &str, when: DateTime<Utc>, release: bool, gate: &str) -> ReleaseTag {
        ReleaseTag {
            tag: Some(gate.into()),
            ..tag(to, TagScope::Collection, when, release)
        }
    }

    #[test]
    fn newest_tag_picks_latest_timestamp() {
        let older = tag("Revs", TagScope::SelfTag, at(6), true);
        let newer = tag("Revs", TagScope::Collection, at(7), false);
        let tags = vec![&older, &newer];
        assert_eq!(newest_tag(&tags), Some(&newer));
        assert_eq!(newest_tag(&[]), None);
    }

    #[test]
    fn newest_tag_tie_breaks_toward_later_entry() {
        let first = tag("Revs", TagScope::SelfTag, at(6), true);
        let second = tag("Revs", TagScope::SelfTag, at(6), false);
        let tags = vec![&first, &second];
        assert_eq!(newest_tag(&tags), Some(&second));
    }

    #[test]
    fn latest_applicable_skips_newer_inapplicable_candidates() {
        let admin_tags = vec!["Project : Revs".to_string()];
        let old_inapplicable = gated("Revs", at(6), true, "Project : Jim");
        let valid = gated("Revs", at(8), true, "Project : Revs");
        let newer_inapplicable = gated("Revs", at(9), false, "Project : Raiders");
        let tags = vec![&old_inapplicable, &valid, &newer_inapplicable];
        assert_eq!(latest_applicable_tag(&tags, &admin_tags), Some(&valid));
    }

    #[test]
    fn latest_applicable_returns_none_when_exhausted() {
        let admin_tags = vec!["Project : Revs".to_string()];
        let a = gated("Revs", at(6), true, "Project : Jim");
        let b = gated("Revs", at(7), true, "Project : Raiders");
        assert_eq!(latest_applicable_tag(&[&a, &b], &admin_tags), None);
    }

    #[test]
    fn ungated_tags_apply_unconditionally() {
        let ungated = tag("Revs", TagScope::Collection, at(6), true);
        assert_eq!(latest_applicable_tag(&[&ungated], &[]), Some(&ungated));
    }

    #[test]
    fn merge_skips_exact_duplicates_only() {
        let mut merged = BTreeMap::new();
        let a = tag("Revs", TagScope::SelfTag, at(6), true);
        let b = tag("Revs", TagScope::Collection, at(7), true);
        merge_tags(&mut merged, vec![a.clone(), b.clone()].into_iter());
        merge_tags(&mut merged, vec![a.clone()].into_iter());
        assert_eq!(merged["Revs"], vec![a, b]);
    }

    #[test]
    fn reconcile_adds_missing_targets_without_overwriting() {
        let mut resolved = ReleasedFor::new();
        resolved.insert("Kurita".into(), ReleaseState { released: true });
        reconcile_published(
            &mut resolved,
            &["kurita".to_string(), "Atago".to_string()],
        );
        // kurita matched case-insensitively, so nothing was overwritten
        assert_eq!(resolved["Kurita"], ReleaseState { released: true });
        assert_eq!(resolved["Atago"], ReleaseState { released: false });
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn projection_lists_only_released_targets() {
        let mut resolved = ReleasedFor::new();
        resolved.insert("Project".into(), ReleaseState { released: true });
        resolved.insert("test_target".into(), ReleaseState { released: true });
        resolved.insert("test_nontarget".into(), ReleaseState { released: false });

        let mut index = IndexDocument::new();
        project_release(&resolved, &mut index);
        assert_eq!(index.values("released_to"), vec!["Project", "test_target"]);
    }
}

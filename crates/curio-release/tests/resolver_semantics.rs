//! Resolution semantics against an in-memory membership graph.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use curio_core::Druid;
use curio_release::{
    CollectionLookup, FetchPolicy, PublishedTargets, ReleaseError, ReleaseMember, ReleaseResolver,
    ReleaseState, ReleaseSubject, ReleaseTag, Result, TagScope,
};

/// Membership graph held in memory: object druid -> (collection druid, tags).
#[derive(Default)]
struct MemoryGraph {
    members: HashMap<Druid, Vec<ReleaseMember>>,
    failing: Vec<Druid>,
}

impl MemoryGraph {
    fn add_membership(&mut self, child: &Druid, collection: ReleaseMember) {
        self.members.entry(child.clone()).or_default().push(collection);
    }

    fn fail_lookups_for(&mut self, id: &Druid) {
        self.failing.push(id.clone());
    }
}

impl CollectionLookup for MemoryGraph {
    fn collections_of(&self, id: &Druid) -> Result<Vec<ReleaseMember>> {
        if self.failing.contains(id) {
            return Err(ReleaseError::Lookup {
                druid: id.to_string(),
                message: "store unreachable".into(),
            });
        }
        Ok(self.members.get(id).cloned().unwrap_or_default())
    }
}

struct FixedPublished(Vec<String>);

impl PublishedTargets for FixedPublished {
    fn published_targets(&self, _id: &Druid) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

struct BrokenPublished;

impl PublishedTargets for BrokenPublished {
    fn published_targets(&self, id: &Druid) -> Result<Vec<String>> {
        Err(ReleaseError::Published {
            druid: id.to_string(),
            message: "endpoint down".into(),
        })
    }
}

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 1, day, 22, 37, 21).unwrap()
}

fn tag(
    to: &str,
    what: TagScope,
    when: DateTime<Utc>,
    release: bool,
    gate: Option<&str>,
) -> ReleaseTag {
    ReleaseTag {
        to: to.into(),
        what,
        who: "carrickr".into(),
        when,
        release,
        tag: gate.map(Into::into),
    }
}

fn druid(s: &str) -> Druid {
    Druid::new(s).unwrap()
}

#[test]
fn collection_tag_gated_on_admin_tag_releases_matching_object() {
    // object carries "Project : Revs"; its collection releases Revs only for
    // objects with that administrative tag
    let object = druid("bb004bn8654");
    let collection = druid("wz243gf4151");
    let mut graph = MemoryGraph::default();
    graph.add_membership(
        &object,
        ReleaseMember {
            id: collection,
            release_tags: vec![tag(
                "Revs",
                TagScope::Collection,
                at(6),
                true,
                Some("Project : Revs"),
            )],
        },
    );

    let admin_tags = vec!["Project : Revs".to_string()];
    let subject = ReleaseSubject {
        id: &object,
        release_tags: &[],
        administrative_tags: &admin_tags,
    };
    let resolved = ReleaseResolver::new(&graph).released_for(&subject).unwrap();
    assert_eq!(resolved["Revs"], ReleaseState { released: true });

    // an object without the administrative tag is left unresolved entirely
    let no_tags: Vec<String> = Vec::new();
    let ungated_subject = ReleaseSubject {
        id: &object,
        release_tags: &[],
        administrative_tags: &no_tags,
    };
    let resolved = ReleaseResolver::new(&graph)
        .released_for(&ungated_subject)
        .unwrap();
    assert!(resolved.get("Revs").is_none());
}

#[test]
fn self_tag_beats_newer_collection_tag() {
    let object = druid("bb537hc4022");
    let collection = druid("nt028fd5773");
    let mut graph = MemoryGraph::default();
    graph.add_membership(
        &object,
        ReleaseMember {
            id: collection,
            release_tags: vec![tag("FRDA", TagScope::Collection, at(9), true, None)],
        },
    );

    let own_tags = vec![tag("FRDA", TagScope::SelfTag, at(7), false, None)];
    let subject = ReleaseSubject {
        id: &object,
        release_tags: &own_tags,
        administrative_tags: &[],
    };
    let resolved = ReleaseResolver::new(&graph).released_for(&subject).unwrap();
    // the self tag is older and opposite, and still wins
    assert_eq!(resolved["FRDA"], ReleaseState { released: false });
}

#[test]
fn most_recent_collection_tag_wins_across_collections() {
    let object = druid("dc235vd9662");
    let chambers = druid("wz243gf4151");
    let revs = druid("nt028fd5773");
    let mut graph = MemoryGraph::default();
    graph.add_membership(
        &object,
        ReleaseMember {
            id: chambers,
            release_tags: vec![tag("Atago", TagScope::Collection, at(20), true, None)],
        },
    );
    graph.add_membership(
        &object,
        ReleaseMember {
            id: revs,
            release_tags: vec![tag("Atago", TagScope::Collection, at(21), false, None)],
        },
    );

    let subject = ReleaseSubject {
        id: &object,
        release_tags: &[],
        administrative_tags: &[],
    };
    let resolved = ReleaseResolver::new(&graph).released_for(&subject).unwrap();
    assert_eq!(resolved["Atago"], ReleaseState { released: false });
}

#[test]
fn self_referencing_collection_terminates() {
    // bad data: a collection listing itself as its own member
    let collection = druid("wz243gf4151");
    let mut graph = MemoryGraph::default();
    graph.add_membership(
        &collection,
        ReleaseMember {
            id: collection.clone(),
            release_tags: vec![tag("Kurita", TagScope::Collection, at(6), true, None)],
        },
    );

    let own_tags = vec![tag("Kurita", TagScope::Collection, at(5), true, None)];
    let subject = ReleaseSubject {
        id: &collection,
        release_tags: &own_tags,
        administrative_tags: &[],
    };
    let resolved = ReleaseResolver::new(&graph).released_for(&subject).unwrap();
    assert_eq!(resolved["Kurita"], ReleaseState { released: true });
}

#[test]
fn transitive_cycles_use_each_collection_once() {
    // a -> b -> c -> b: c's parent is already visited
    let object = druid("aa111bb2222");
    let b = druid("cc333dd4444");
    let c = druid("ee555ff6666");
    let mut graph = MemoryGraph::default();
    graph.add_membership(
        &object,
        ReleaseMember {
            id: b.clone(),
            release_tags: vec![tag("Kurita", TagScope::Collection, at(6), true, None)],
        },
    );
    graph.add_membership(
        &b,
        ReleaseMember {
            id: c.clone(),
            release_tags: vec![tag("Mogami", TagScope::Collection, at(7), true, None)],
        },
    );
    graph.add_membership(
        &c,
        ReleaseMember {
            id: b,
            release_tags: vec![tag("Kurita", TagScope::Collection, at(6), true, None)],
        },
    );

    let subject = ReleaseSubject {
        id: &object,
        release_tags: &[],
        administrative_tags: &[],
    };
    let resolved = ReleaseResolver::new(&graph).released_for(&subject).unwrap();
    assert_eq!(resolved["Kurita"], ReleaseState { released: true });
    assert_eq!(resolved["Mogami"], ReleaseState { released: true });
}

#[test]
fn unresolved_targets_are_omitted_not_false() {
    let object = druid("bc566xq6031");
    let collection = druid("wz243gf4151");
    let mut graph = MemoryGraph::default();
    graph.add_membership(
        &object,
        ReleaseMember {
            id: collection,
            release_tags: vec![tag(
                "Mogami",
                TagScope::Collection,
                at(21),
                true,
                Some("Project : ReleaseSpecTesting : Batch1"),
            )],
        },
    );

    let subject = ReleaseSubject {
        id: &object,
        release_tags: &[],
        administrative_tags: &[],
    };
    let resolved = ReleaseResolver::new(&graph).released_for(&subject).unwrap();
    assert!(resolved.is_empty());
}

#[test]
fn published_reconciliation_adds_retractions() {
    let object = druid("dc235vd9662");
    let graph = MemoryGraph::default();
    let own_tags = vec![tag("Kurita", TagScope::SelfTag, at(6), true, None)];
    let subject = ReleaseSubject {
        id: &object,
        release_tags: &own_tags,
        administrative_tags: &[],
    };

    let published = FixedPublished(vec![
        "Kurita".to_string(),
        "Atago".to_string(),
        "Mogami".to_string(),
    ]);
    let resolved = ReleaseResolver::new(&graph)
        .released_for_with_published(&subject, &published)
        .unwrap();

    // the freshly computed true is kept; everything else retracts
    assert_eq!(resolved["Kurita"], ReleaseState { released: true });
    assert_eq!(resolved["Atago"], ReleaseState { released: false });
    assert_eq!(resolved["Mogami"], ReleaseState { released: false });
}

#[test]
fn degrade_policy_skips_unreachable_sources() {
    let object = druid("bb004bn8654");
    let reachable = druid("wz243gf4151");
    let broken = druid("nt028fd5773");
    let mut graph = MemoryGraph::default();
    graph.add_membership(
        &object,
        ReleaseMember {
            id: reachable.clone(),
            release_tags: vec![tag("Kurita", TagScope::Collection, at(6), true, None)],
        },
    );
    graph.add_membership(
        &object,
        ReleaseMember {
            id: broken.clone(),
            release_tags: Vec::new(),
        },
    );
    // the broken collection's own parents cannot be fetched
    graph.fail_lookups_for(&broken);

    let subject = ReleaseSubject {
        id: &object,
        release_tags: &[],
        administrative_tags: &[],
    };
    let resolved = ReleaseResolver::new(&graph).released_for(&subject).unwrap();
    assert_eq!(resolved["Kurita"], ReleaseState { released: true });

    // the same resolution under the strict policy aborts
    let err = ReleaseResolver::new(&graph)
        .with_policy(FetchPolicy::Abort)
        .released_for(&subject)
        .unwrap_err();
    assert!(matches!(err, ReleaseError::Lookup { .. }));

    // a broken published listing degrades the same way
    let resolved = ReleaseResolver::new(&graph)
        .released_for_with_published(&subject, &BrokenPublished)
        .unwrap();
    assert_eq!(resolved["Kurita"], ReleaseState { released: true });
}

//! Enforcement tree walks
//!
//! Every query shares one traversal contract: visit each resource node under
//! the queried resource type exactly once, classify its absolute pointer
//! against the query path, and feed its permissions (weighted by node level)
//! into one or more [`WeightedPermissions`] according to an aggregation
//! mode. After the walk the tie-break evaluation in [`crate::weighted`]
//! produces the verdict.
//!
//! The aggregation modes:
//!
//! | Mode | ABOVE/SAME | BELOW |
//! |---|---|---|
//! | `Unrestricted` | grants + revokes | revokes only |
//! | `Partial` | grants + revokes | grants only |
//! | `Effected` | grants + revokes | nothing |
//!
//! `Different` contributes nothing in every mode. Nodes under other resource
//! types would always classify `Different`, so only the matching type's
//! subtree is walked at all.
//!
//! [`check_permissions`] aggregates one accumulator across a whole subject
//! context; [`classify_subjects`] keeps three accumulators per subject and
//! answers all three subject-enumeration queries in a single pass.

use crate::location::PointerLocation;
use crate::tree::{NodeId, PolicyTrie, ResourceNode};
use crate::weighted::WeightedPermissions;
use std::collections::HashSet;
use trellis_core::{EffectedSubjects, Permission, ResourceKey, SubjectId};

/// Which aggregation rule governs what a visited node contributes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregationMode {
    /// Grants and revokes at or above the path, revokes anywhere below.
    /// Answers "granted with no revoke in the whole subtree".
    Unrestricted,
    /// Grants and revokes at or above the path, grants anywhere below.
    /// Answers "could some descendant path be granted".
    Partial,
    /// Grants and revokes at or above the path only.
    /// Answers "what verdict is inherited at exactly this path".
    Effected,
}

impl AggregationMode {
    fn collect(
        self,
        location: PointerLocation,
        node: &ResourceNode,
        into: &mut WeightedPermissions,
    ) {
        let weight = node.level();
        let permissions = node.permissions();
        match location {
            PointerLocation::Above | PointerLocation::Same => {
                into.add_all_granted(&permissions.granted, weight);
                into.add_all_revoked(&permissions.revoked, weight);
            }
            PointerLocation::Below => match self {
                AggregationMode::Unrestricted => {
                    into.add_all_revoked(&permissions.revoked, weight);
                }
                AggregationMode::Partial => {
                    into.add_all_granted(&permissions.granted, weight);
                }
                AggregationMode::Effected => {}
            },
            PointerLocation::Different => {}
        }
    }
}

/// Visit every node of the subtree rooted at `root` exactly once.
fn walk_nodes<F>(trie: &PolicyTrie, root: NodeId, mut visit: F)
where
    F: FnMut(&ResourceNode),
{
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let node = trie.node(id);
        visit(node);
        stack.extend(node.children());
    }
}

/// Combined-context check: aggregate one accumulator across all `subjects`
/// and evaluate it as a whole.
///
/// "The context is granted" means the subjects together hold every expected
/// permission; it does not matter which subject contributes which grant.
/// Subjects unknown to the tree contribute nothing.
pub fn check_permissions(
    trie: &PolicyTrie,
    key: &ResourceKey,
    subjects: &[SubjectId],
    permissions: &[Permission],
    mode: AggregationMode,
) -> bool {
    let mut weighted = WeightedPermissions::new();
    for subject in subjects {
        let Some(root) = trie.root_of(subject, key.resource_type()) else {
            continue;
        };
        walk_nodes(trie, root, |node| {
            let location = PointerLocation::locate(node.pointer(), key.path());
            mode.collect(location, node, &mut weighted);
        });
    }
    let verdict = weighted.evaluate(permissions);
    verdict.granted && !verdict.revoked
}

/// All three per-subject enforcement answers, assembled in one traversal
#[derive(Debug, Default)]
pub struct SubjectClassification {
    /// Subjects with a definite grant or revoke verdict at the path
    pub effected: EffectedSubjects,
    /// Subjects granted somewhere within the subtree at the path
    pub partial: HashSet<SubjectId>,
    /// Subjects granted at the path with no revoke anywhere below it
    pub unrestricted: HashSet<SubjectId>,
}

/// Classify every subject known to the tree against `key`/`permissions`.
///
/// Each subject's subtree is walked once while three independent
/// accumulators (one per aggregation mode) fill up; the per-mode evaluations
/// then place the subject in the matching result sets. A subject with no
/// definite verdict lands nowhere.
pub fn classify_subjects(
    trie: &PolicyTrie,
    key: &ResourceKey,
    permissions: &[Permission],
) -> SubjectClassification {
    let mut classification = SubjectClassification::default();

    for (subject, subject_node) in trie.subjects() {
        let Some(root) = subject_node.root(key.resource_type()) else {
            continue;
        };

        let mut unrestricted = WeightedPermissions::new();
        let mut partial = WeightedPermissions::new();
        let mut effected = WeightedPermissions::new();

        walk_nodes(trie, root, |node| {
            let location = PointerLocation::locate(node.pointer(), key.path());
            AggregationMode::Unrestricted.collect(location, node, &mut unrestricted);
            AggregationMode::Partial.collect(location, node, &mut partial);
            AggregationMode::Effected.collect(location, node, &mut effected);
        });

        // Revoked checked first: a subject is never in both partitions.
        let effected_verdict = effected.evaluate(permissions);
        if effected_verdict.revoked {
            classification.effected.revoked.insert(subject.clone());
        } else if effected_verdict.granted {
            classification.effected.granted.insert(subject.clone());
        }

        if partial.evaluate(permissions).granted {
            classification.partial.insert(subject.clone());
        }

        let unrestricted_verdict = unrestricted.evaluate(permissions);
        if unrestricted_verdict.granted && !unrestricted_verdict.revoked {
            classification.unrestricted.insert(subject.clone());
        }
    }

    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_trie;
    use trellis_core::{EffectedPermissions, PolicyEntry};

    fn entry(subject: &str, resource: &str, granted: &[&str], revoked: &[&str]) -> PolicyEntry {
        PolicyEntry::new(
            [subject],
            ResourceKey::parse(resource).unwrap(),
            EffectedPermissions::new(granted.iter().copied(), revoked.iter().copied()),
        )
    }

    fn key(raw: &str) -> ResourceKey {
        ResourceKey::parse(raw).unwrap()
    }

    fn subjects(ids: &[&str]) -> Vec<SubjectId> {
        ids.iter().map(|id| SubjectId::new(id)).collect()
    }

    fn read() -> Vec<Permission> {
        vec![Permission::new("READ")]
    }

    #[test]
    fn test_grant_at_root_propagates_downward() {
        let trie = build_trie([entry("s1", "thing:/", &["READ"], &[])]);
        let context = subjects(&["s1"]);

        for target in ["thing:/", "thing:/a", "thing:/a/b/c"] {
            assert!(
                check_permissions(
                    &trie,
                    &key(target),
                    &context,
                    &read(),
                    AggregationMode::Unrestricted
                ),
                "expected unrestricted READ at {target}"
            );
        }
    }

    #[test]
    fn test_below_revoke_defeats_unrestricted_but_not_partial() {
        let trie = build_trie([
            entry("s1", "thing:/a", &["READ"], &[]),
            entry("s1", "thing:/a/b", &[], &["READ"]),
        ]);
        let context = subjects(&["s1"]);

        // The deeper revoke outweighs the grant for the whole-subtree check
        assert!(!check_permissions(
            &trie,
            &key("thing:/a"),
            &context,
            &read(),
            AggregationMode::Unrestricted
        ));
        // ...and at and below its own path
        assert!(!check_permissions(
            &trie,
            &key("thing:/a/b"),
            &context,
            &read(),
            AggregationMode::Unrestricted
        ));
        assert!(!check_permissions(
            &trie,
            &key("thing:/a/b/c"),
            &context,
            &read(),
            AggregationMode::Unrestricted
        ));
        // The partial check ignores the below-revoke
        assert!(check_permissions(
            &trie,
            &key("thing:/a"),
            &context,
            &read(),
            AggregationMode::Partial
        ));
    }

    #[test]
    fn test_partial_counts_grants_below() {
        let trie = build_trie([entry("s1", "thing:/a/b", &["READ"], &[])]);
        let context = subjects(&["s1"]);

        // Nothing is granted at /a itself...
        assert!(!check_permissions(
            &trie,
            &key("thing:/a"),
            &context,
            &read(),
            AggregationMode::Unrestricted
        ));
        // ...but a descendant grant makes the partial check pass
        assert!(check_permissions(
            &trie,
            &key("thing:/a"),
            &context,
            &read(),
            AggregationMode::Partial
        ));
        // Sibling branches stay unaffected
        assert!(!check_permissions(
            &trie,
            &key("thing:/x"),
            &context,
            &read(),
            AggregationMode::Partial
        ));
    }

    #[test]
    fn test_same_path_tie_revokes() {
        let trie = build_trie([entry("s1", "thing:/a", &["READ"], &["READ"])]);
        let context = subjects(&["s1"]);

        assert!(!check_permissions(
            &trie,
            &key("thing:/a"),
            &context,
            &read(),
            AggregationMode::Unrestricted
        ));
        assert!(!check_permissions(
            &trie,
            &key("thing:/a"),
            &context,
            &read(),
            AggregationMode::Partial
        ));
    }

    #[test]
    fn test_context_combines_across_subjects() {
        // READ and WRITE granted to different subjects of the same context
        let trie = build_trie([
            entry("s1", "thing:/", &["READ"], &[]),
            entry("s2", "thing:/", &["WRITE"], &[]),
        ]);
        let expected = vec![Permission::new("READ"), Permission::new("WRITE")];

        assert!(check_permissions(
            &trie,
            &key("thing:/"),
            &subjects(&["s1", "s2"]),
            &expected,
            AggregationMode::Unrestricted
        ));
        // Either subject alone lacks one of the pair
        assert!(!check_permissions(
            &trie,
            &key("thing:/"),
            &subjects(&["s1"]),
            &expected,
            AggregationMode::Unrestricted
        ));
    }

    #[test]
    fn test_unknown_subject_is_never_granted() {
        let trie = build_trie([entry("s1", "thing:/", &["READ"], &[])]);

        assert!(!check_permissions(
            &trie,
            &key("thing:/"),
            &subjects(&["nobody"]),
            &read(),
            AggregationMode::Unrestricted
        ));
        assert!(!check_permissions(
            &trie,
            &key("thing:/"),
            &subjects(&["nobody"]),
            &read(),
            AggregationMode::Partial
        ));
    }

    #[test]
    fn test_unknown_resource_type_is_never_granted() {
        let trie = build_trie([entry("s1", "thing:/", &["READ"], &[])]);

        assert!(!check_permissions(
            &trie,
            &key("policy:/"),
            &subjects(&["s1"]),
            &read(),
            AggregationMode::Unrestricted
        ));
    }

    #[test]
    fn test_classify_partitions_effected_subjects() {
        let trie = build_trie([
            entry("s1", "thing:/a", &["READ"], &[]),
            entry("s2", "thing:/a", &[], &["READ"]),
            entry("s3", "thing:/x", &["READ"], &[]),
        ]);

        let classification = classify_subjects(&trie, &key("thing:/a"), &read());

        assert!(classification
            .effected
            .granted
            .contains(&SubjectId::new("s1")));
        assert!(classification
            .effected
            .revoked
            .contains(&SubjectId::new("s2")));
        // s3's grant lives on an unrelated branch: no verdict at /a
        assert!(!classification
            .effected
            .granted
            .contains(&SubjectId::new("s3")));
        assert!(!classification
            .effected
            .revoked
            .contains(&SubjectId::new("s3")));

        // Partition sets never overlap
        assert!(classification
            .effected
            .granted
            .is_disjoint(&classification.effected.revoked));
    }

    #[test]
    fn test_classify_three_answers_in_one_pass() {
        let trie = build_trie([
            // s1: unrestricted at /a
            entry("s1", "thing:/a", &["READ"], &[]),
            // s2: granted at /a but revoked deeper down
            entry("s2", "thing:/a", &["READ"], &[]),
            entry("s2", "thing:/a/b", &[], &["READ"]),
            // s3: only granted below /a
            entry("s3", "thing:/a/c", &["READ"], &[]),
        ]);

        let classification = classify_subjects(&trie, &key("thing:/a"), &read());

        let s1 = SubjectId::new("s1");
        let s2 = SubjectId::new("s2");
        let s3 = SubjectId::new("s3");

        assert!(classification.unrestricted.contains(&s1));
        assert!(!classification.unrestricted.contains(&s2));
        assert!(!classification.unrestricted.contains(&s3));

        assert!(classification.partial.contains(&s1));
        assert!(classification.partial.contains(&s2));
        assert!(classification.partial.contains(&s3));

        assert!(classification.effected.granted.contains(&s1));
        assert!(classification.effected.granted.contains(&s2));
        assert!(!classification.effected.granted.contains(&s3));
    }
}

//! Tree construction
//!
//! [`build_trie`] folds an iterable of policy entries into a [`PolicyTrie`]:
//! fetch-or-create the subject node and its resource-type root, descend
//! (creating empty-permission placeholders) along the entry's path, and
//! union-merge the entry's permissions at the terminal node. Merging means
//! several entries may target the same (subject, path) without one erasing
//! another's grant.
//!
//! An entry with the root path attaches its permissions to the type root
//! node itself rather than creating a child segment.

use crate::tree::PolicyTrie;
use trellis_core::PolicyEntry;

/// Build a policy tree from policy entries.
///
/// Entry order does not matter: trees built from any permutation of the same
/// entries answer every query identically.
pub fn build_trie<I>(entries: I) -> PolicyTrie
where
    I: IntoIterator<Item = PolicyEntry>,
{
    let mut trie = PolicyTrie::default();
    for entry in entries {
        for subject in &entry.subjects {
            let mut node = trie.ensure_root(subject, entry.resource.resource_type());
            for segment in entry.resource.path().iter() {
                node = trie.ensure_child(node, segment);
            }
            trie.merge_permissions(node, &entry.permissions);
        }
    }
    tracing::debug!(
        subjects = trie.subject_count(),
        nodes = trie.node_count(),
        "policy trie built"
    );
    trie
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{EffectedPermissions, Permission, ResourceKey, SubjectId};

    fn entry(subject: &str, resource: &str, granted: &[&str], revoked: &[&str]) -> PolicyEntry {
        PolicyEntry::new(
            [subject],
            ResourceKey::parse(resource).unwrap(),
            EffectedPermissions::new(granted.iter().copied(), revoked.iter().copied()),
        )
    }

    #[test]
    fn test_root_path_attaches_to_type_root() {
        let trie = build_trie([entry("s1", "thing:/", &["READ"], &[])]);

        let root = trie.root_of(&SubjectId::new("s1"), "thing").unwrap();
        assert!(trie
            .node(root)
            .permissions()
            .granted
            .contains(&Permission::new("READ")));
        assert_eq!(trie.node_count(), 1);
    }

    #[test]
    fn test_descent_creates_placeholder_nodes() {
        let trie = build_trie([entry("s1", "thing:/a/b", &["READ"], &[])]);

        let root = trie.root_of(&SubjectId::new("s1"), "thing").unwrap();
        let a = trie.node(root).child("a").unwrap();
        let b = trie.node(a).child("b").unwrap();

        // Intermediate node carries no permissions of its own
        assert!(trie.node(a).permissions().is_empty());
        assert!(trie
            .node(b)
            .permissions()
            .granted
            .contains(&Permission::new("READ")));
    }

    #[test]
    fn test_entries_for_same_path_merge() {
        let trie = build_trie([
            entry("s1", "thing:/a", &["READ"], &[]),
            entry("s1", "thing:/a", &["WRITE"], &["ADMIN"]),
        ]);

        let root = trie.root_of(&SubjectId::new("s1"), "thing").unwrap();
        let a = trie.node(root).child("a").unwrap();
        let permissions = trie.node(a).permissions();

        assert!(permissions.granted.contains(&Permission::new("READ")));
        assert!(permissions.granted.contains(&Permission::new("WRITE")));
        assert!(permissions.revoked.contains(&Permission::new("ADMIN")));
    }

    #[test]
    fn test_entry_fans_out_to_all_subjects() {
        let trie = build_trie([PolicyEntry::new(
            ["s1", "s2"],
            ResourceKey::parse("thing:/a").unwrap(),
            EffectedPermissions::granted_only(["READ"]),
        )]);

        assert_eq!(trie.subject_count(), 2);
        assert!(trie.root_of(&SubjectId::new("s1"), "thing").is_some());
        assert!(trie.root_of(&SubjectId::new("s2"), "thing").is_some());
    }

    #[test]
    fn test_subjects_do_not_share_nodes() {
        let trie = build_trie([
            entry("s1", "thing:/a", &["READ"], &[]),
            entry("s2", "thing:/a", &[], &["READ"]),
        ]);

        let s1_root = trie.root_of(&SubjectId::new("s1"), "thing").unwrap();
        let s2_root = trie.root_of(&SubjectId::new("s2"), "thing").unwrap();
        let s1_a = trie.node(s1_root).child("a").unwrap();
        let s2_a = trie.node(s2_root).child("a").unwrap();

        assert!(trie.node(s1_a).permissions().revoked.is_empty());
        assert!(trie.node(s2_a).permissions().granted.is_empty());
    }
}

//! Permission-filtered document views
//!
//! Computes the subset of a document a subject context may see. The walk
//! here differs from [`crate::visit`]: instead of weighing permissions at
//! one target, it collects **every** path in the queried subtree that
//! explicitly grants or revokes a requested permission, then decides each
//! flattened field's visibility from those path sets.
//!
//! Visibility walks the field's depth prefixes in order; at each depth the
//! grant check runs before the revoke check, so a revoke at the identical
//! depth always overrides a grant, while a deeper grant re-opens access
//! below a shallower revoke.

use crate::tree::{NodeId, PolicyTrie};
use rustc_hash::FxHashSet;
use serde_json::Value;
use trellis_core::fields::expand_fields;
use trellis_core::{Permission, ResourceKey, ResourcePointer, SubjectId};

/// Filter `fields` down to what `subjects` may see with all of
/// `permissions`, and rebuild the document from the surviving fields.
///
/// Field pointers are absolute within the key's resource-type namespace,
/// the same pointer space as policy resource paths.
pub fn build_json_view(
    trie: &PolicyTrie,
    key: &ResourceKey,
    fields: &[(ResourcePointer, Value)],
    subjects: &[SubjectId],
    permissions: &[Permission],
) -> Value {
    let mut granted_per_permission: Vec<FxHashSet<ResourcePointer>> =
        vec![FxHashSet::default(); permissions.len()];
    let mut revoked_paths: FxHashSet<ResourcePointer> = FxHashSet::default();

    for subject in subjects {
        let Some(root) = trie.root_of(subject, key.resource_type()) else {
            continue;
        };
        collect_paths(
            trie,
            root,
            key.path(),
            permissions,
            &mut granted_per_permission,
            &mut revoked_paths,
        );
    }

    // A path counts as granted only when every requested permission grants
    // it; a revoke of any requested permission blocks.
    let mut per_permission = granted_per_permission.into_iter();
    let mut granted_paths = per_permission.next().unwrap_or_default();
    for other in per_permission {
        granted_paths.retain(|pointer| other.contains(pointer));
    }
    // A revoke at the identical path wins the tie outright; deeper revokes
    // act during the visibility walk below.
    granted_paths.retain(|pointer| !revoked_paths.contains(pointer));

    let visible: Vec<(ResourcePointer, Value)> = fields
        .iter()
        .filter(|(pointer, _)| is_visible(pointer, &granted_paths, &revoked_paths))
        .cloned()
        .collect();
    expand_fields(&visible)
}

/// Record every granted/revoked path in the subtree relevant to `target`.
///
/// Above the target's depth the walk follows only the matching segment;
/// from the target's depth on it fans out into all children. Each visited
/// node's explicit grants and revokes are recorded at the node's own
/// absolute pointer.
fn collect_paths(
    trie: &PolicyTrie,
    root: NodeId,
    target: &ResourcePointer,
    permissions: &[Permission],
    granted: &mut [FxHashSet<ResourcePointer>],
    revoked: &mut FxHashSet<ResourcePointer>,
) {
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let node = trie.node(id);
        let node_permissions = node.permissions();
        for (index, permission) in permissions.iter().enumerate() {
            if node_permissions.granted.contains(permission) {
                granted[index].insert(node.pointer().clone());
            }
            if node_permissions.revoked.contains(permission) {
                revoked.insert(node.pointer().clone());
            }
        }
        if node.level() < target.level() {
            let Some(segment) = target.segment(node.level()) else {
                unreachable!()
            };
            if let Some(child) = node.child(segment) {
                stack.push(child);
            }
        } else {
            stack.extend(node.children());
        }
    }
}

fn is_visible(
    pointer: &ResourcePointer,
    granted: &FxHashSet<ResourcePointer>,
    revoked: &FxHashSet<ResourcePointer>,
) -> bool {
    let root = ResourcePointer::root();
    let mut accessible = granted.contains(&root) && !revoked.contains(&root);
    for depth in 1..=pointer.level() {
        let prefix = pointer.truncate(depth);
        if granted.contains(&prefix) {
            accessible = true;
        }
        if revoked.contains(&prefix) {
            accessible = false;
        }
    }
    accessible
}

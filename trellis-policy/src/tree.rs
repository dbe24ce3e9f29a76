//! The policy tree
//!
//! One [`SubjectNode`] per distinct subject id; below it, one resource trie
//! per resource type whose nodes mirror the path hierarchy. Every node
//! carries its own granted/revoked permission sets.
//!
//! Nodes live in a single arena (`Vec<ResourceNode>`) addressed by [`NodeId`];
//! a node stores its parent's id (a non-owning back-reference) and its
//! absolute pointer, precomputed at construction. There is no parent/child
//! reference cycle and nothing to memoize lazily, so a built tree is fully
//! immutable: it can sit behind an `Arc` and serve concurrent queries
//! without any locking.
//!
//! Construction goes through the `pub(crate)` fetch-or-create methods used
//! by [`crate::builder`]; no mutator is exposed once [`crate::builder::build_trie`]
//! has returned.

use std::collections::HashMap;
use std::sync::Arc;
use trellis_core::{EffectedPermissions, ResourcePointer, SubjectId};

/// Arena index of a resource node
pub type NodeId = usize;

/// One path segment under a subject, carrying its own permission sets
#[derive(Debug)]
pub struct ResourceNode {
    name: Arc<str>,
    parent: Option<NodeId>,
    pointer: ResourcePointer,
    children: HashMap<Arc<str>, NodeId>,
    permissions: EffectedPermissions,
}

impl ResourceNode {
    /// Segment name; for a type root this is the resource-type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arena id of the parent node; `None` for a type root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Absolute pointer in resource space; a type root sits at the root
    /// pointer
    pub fn pointer(&self) -> &ResourcePointer {
        &self.pointer
    }

    /// Depth weight of this node: the pointer's segment count
    pub fn level(&self) -> usize {
        self.pointer.level()
    }

    /// Permissions explicitly granted/revoked at this node
    pub fn permissions(&self) -> &EffectedPermissions {
        &self.permissions
    }

    /// Arena ids of all children
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    /// Arena id of the child named `segment`, if present
    pub fn child(&self, segment: &str) -> Option<NodeId> {
        self.children.get(segment).copied()
    }
}

/// Per-subject resource roots, one per resource type
#[derive(Debug, Default)]
pub struct SubjectNode {
    roots: HashMap<String, NodeId>,
}

impl SubjectNode {
    /// Arena id of the type root for `resource_type`, if the subject has any
    /// entries under that type
    pub fn root(&self, resource_type: &str) -> Option<NodeId> {
        self.roots.get(resource_type).copied()
    }

    /// Resource types this subject has entries under
    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(|resource_type| resource_type.as_str())
    }
}

/// The built policy tree: subject id → subject node, plus the shared arena
#[derive(Debug, Default)]
pub struct PolicyTrie {
    subjects: HashMap<SubjectId, SubjectNode>,
    nodes: Vec<ResourceNode>,
}

impl PolicyTrie {
    /// Subject node for `id`, if the policy mentions the subject
    pub fn subject(&self, id: &SubjectId) -> Option<&SubjectNode> {
        self.subjects.get(id)
    }

    /// Iterate all subjects known to the tree
    pub fn subjects(&self) -> impl Iterator<Item = (&SubjectId, &SubjectNode)> {
        self.subjects.iter()
    }

    /// Number of distinct subjects
    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    /// Resolve an arena id.
    ///
    /// Ids only ever come from this tree's own nodes, so an out-of-range id
    /// is a programming defect and panics.
    pub fn node(&self, id: NodeId) -> &ResourceNode {
        &self.nodes[id]
    }

    /// Total resource nodes across all subjects and types
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Type root for `subject` under `resource_type`, if any entries exist
    pub fn root_of(&self, subject: &SubjectId, resource_type: &str) -> Option<NodeId> {
        self.subject(subject)
            .and_then(|subject_node| subject_node.root(resource_type))
    }

    pub(crate) fn ensure_root(&mut self, subject: &SubjectId, resource_type: &str) -> NodeId {
        if let Some(id) = self.root_of(subject, resource_type) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(ResourceNode {
            name: Arc::from(resource_type),
            parent: None,
            pointer: ResourcePointer::root(),
            children: HashMap::new(),
            permissions: EffectedPermissions::default(),
        });
        self.subjects
            .entry(subject.clone())
            .or_default()
            .roots
            .insert(resource_type.to_string(), id);
        id
    }

    pub(crate) fn ensure_child(&mut self, parent: NodeId, segment: &str) -> NodeId {
        if let Some(id) = self.nodes[parent].child(segment) {
            return id;
        }
        let name: Arc<str> = Arc::from(segment);
        let pointer = self.nodes[parent].pointer.child(&name);
        let id = self.nodes.len();
        self.nodes.push(ResourceNode {
            name: name.clone(),
            parent: Some(parent),
            pointer,
            children: HashMap::new(),
            permissions: EffectedPermissions::default(),
        });
        self.nodes[parent].children.insert(name, id);
        id
    }

    pub(crate) fn merge_permissions(&mut self, node: NodeId, permissions: &EffectedPermissions) {
        self.nodes[node].permissions.merge(permissions);
    }
}

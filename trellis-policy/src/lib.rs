//! Tree-based policy enforcement for Trellis
//!
//! This crate answers authorization queries over hierarchical resources:
//! given policy entries (subject → resource path → granted/revoked
//! permissions), does a set of subjects hold a permission at a path,
//! considering inheritance from ancestor paths and explicit revocations at
//! any level — and which subset of a JSON document may they see?
//!
//! # Core Types
//!
//! - [`PolicyTrie`]: immutable per-subject resource tree, built once per
//!   policy by [`build_trie`] (arena-backed, shareable across threads)
//! - [`PointerLocation`]: classification of a node's pointer against the
//!   query path (Above / Same / Below / Different)
//! - [`WeightedPermissions`]: per-query accumulator resolving conflicting
//!   grants and revokes by node depth
//! - [`Enforcer`]: the query facade
//!
//! # Evaluation Semantics
//!
//! 1. **Depth wins**: per permission name, the deepest recorded grant and
//!    the deepest recorded revoke compete; the more specific rule applies
//! 2. **Ties revoke**: a grant defeats a revoke only with strictly greater
//!    weight — on equal weight the revoke wins, in both directions
//! 3. **Aggregation by location**: what a node contributes depends on where
//!    it sits relative to the query path and on the query kind
//!    ([`AggregationMode`]); unrelated branches contribute nothing
//! 4. **Undefined is denied**: a context with neither a definite grant nor
//!    a definite revoke is simply not granted
//! 5. **Missing is empty**: subjects or paths absent from the tree are not
//!    errors, they contribute nothing
//!
//! # Usage
//!
//! Build an [`Enforcer`] from policy entries with [`Enforcer::from_entries`]
//! (or pre-build the trie via [`build_trie`] and wrap it). The six query
//! operations validate their arguments and run a fresh synchronous tree
//! walk each; there is no per-query state on the enforcer, so wrap it in an
//! `Arc` to serve concurrent queries.

pub mod builder;
pub mod enforcer;
pub mod error;
pub mod location;
pub mod tree;
pub mod view;
pub mod visit;
pub mod weighted;

pub use builder::build_trie;
pub use enforcer::Enforcer;
pub use error::{EnforcementError, Result};
pub use location::PointerLocation;
pub use tree::{NodeId, PolicyTrie, ResourceNode, SubjectNode};
pub use view::build_json_view;
pub use visit::{check_permissions, classify_subjects, AggregationMode, SubjectClassification};
pub use weighted::{
    PermissionVerdict, ResolvedPermissions, WeightedPermission, WeightedPermissions,
};

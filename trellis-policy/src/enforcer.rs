//! The enforcement facade
//!
//! [`Enforcer`] owns a built [`PolicyTrie`] and exposes the query surface.
//! It is stateless between queries — every call validates its arguments and
//! runs a fresh traversal, so one enforcer behind an `Arc` can serve
//! concurrent queries without synchronization.
//!
//! An absent verdict is never access: unknown subjects, unknown resource
//! types, and undefined evaluations all come out as not granted.

use crate::builder::build_trie;
use crate::error::{EnforcementError, Result};
use crate::tree::PolicyTrie;
use crate::view;
use crate::visit::{self, AggregationMode, SubjectClassification};
use serde_json::Value;
use std::collections::HashSet;
use trellis_core::{
    EffectedSubjects, Permission, PolicyEntry, ResourceKey, ResourcePointer, SubjectId,
};

/// Policy query surface over an immutable policy tree
#[derive(Debug)]
pub struct Enforcer {
    trie: PolicyTrie,
}

impl Enforcer {
    /// Wrap an already-built policy tree
    pub fn new(trie: PolicyTrie) -> Self {
        Self { trie }
    }

    /// Build the tree from policy entries and wrap it in one step
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = PolicyEntry>,
    {
        Self::new(build_trie(entries))
    }

    /// The underlying policy tree
    pub fn trie(&self) -> &PolicyTrie {
        &self.trie
    }

    /// True iff the combined subject context holds every permission at `key`
    /// with no revoke at any level — above, at, or below the path.
    pub fn has_unrestricted_permissions(
        &self,
        key: &ResourceKey,
        subjects: &[SubjectId],
        permissions: &[Permission],
    ) -> Result<bool> {
        ensure_resource_key(key)?;
        ensure_subjects(subjects)?;
        ensure_permissions(permissions)?;
        tracing::trace!(resource = %key, "unrestricted permission check");
        Ok(visit::check_permissions(
            &self.trie,
            key,
            subjects,
            permissions,
            AggregationMode::Unrestricted,
        ))
    }

    /// True iff the combined subject context could see at least part of the
    /// subtree at `key`: grants anywhere below the path count, revokes below
    /// it do not.
    pub fn has_partial_permissions(
        &self,
        key: &ResourceKey,
        subjects: &[SubjectId],
        permissions: &[Permission],
    ) -> Result<bool> {
        ensure_resource_key(key)?;
        ensure_subjects(subjects)?;
        ensure_permissions(permissions)?;
        tracing::trace!(resource = %key, "partial permission check");
        Ok(visit::check_permissions(
            &self.trie,
            key,
            subjects,
            permissions,
            AggregationMode::Partial,
        ))
    }

    /// Partition all known subjects into definitely granted / definitely
    /// revoked at `key`, considering only the path and its ancestors.
    pub fn subjects_with_permission(
        &self,
        key: &ResourceKey,
        permissions: &[Permission],
    ) -> Result<EffectedSubjects> {
        Ok(self.classify(key, permissions)?.effected)
    }

    /// Subjects granted every permission somewhere within the subtree at
    /// `key` (not necessarily at the path itself).
    pub fn subjects_with_partial_permission(
        &self,
        key: &ResourceKey,
        permissions: &[Permission],
    ) -> Result<HashSet<SubjectId>> {
        Ok(self.classify(key, permissions)?.partial)
    }

    /// Subjects granted every permission at `key` with no revoke anywhere
    /// below it.
    pub fn subjects_with_unrestricted_permission(
        &self,
        key: &ResourceKey,
        permissions: &[Permission],
    ) -> Result<HashSet<SubjectId>> {
        Ok(self.classify(key, permissions)?.unrestricted)
    }

    /// Filter a flattened document down to the fields the subject context
    /// may see with all of `permissions`, rebuilt as a JSON document.
    pub fn build_json_view(
        &self,
        key: &ResourceKey,
        fields: &[(ResourcePointer, Value)],
        subjects: &[SubjectId],
        permissions: &[Permission],
    ) -> Result<Value> {
        ensure_resource_key(key)?;
        ensure_subjects(subjects)?;
        ensure_permissions(permissions)?;
        tracing::trace!(resource = %key, fields = fields.len(), "json view");
        Ok(view::build_json_view(
            &self.trie, key, fields, subjects, permissions,
        ))
    }

    fn classify(
        &self,
        key: &ResourceKey,
        permissions: &[Permission],
    ) -> Result<SubjectClassification> {
        ensure_resource_key(key)?;
        ensure_permissions(permissions)?;
        tracing::trace!(resource = %key, "subject classification");
        Ok(visit::classify_subjects(&self.trie, key, permissions))
    }
}

fn ensure_subjects(subjects: &[SubjectId]) -> Result<()> {
    if subjects.is_empty() {
        return Err(EnforcementError::EmptySubjects);
    }
    Ok(())
}

fn ensure_permissions(permissions: &[Permission]) -> Result<()> {
    if permissions.is_empty() {
        return Err(EnforcementError::EmptyPermissions);
    }
    Ok(())
}

fn ensure_resource_key(key: &ResourceKey) -> Result<()> {
    if key.resource_type().is_empty() {
        return Err(EnforcementError::InvalidResourceKey);
    }
    Ok(())
}

//! Policy entries and effected sets
//!
//! This module defines the engine's input record and the two "effected"
//! pairings that show up on both sides of the API:
//! - `EffectedPermissions`: granted/revoked permission sets attached to one
//!   resource path
//! - `PolicyEntry`: subjects × resource → effected permissions
//! - `EffectedSubjects`: subjects partitioned by definite verdict, a query
//!   result

use crate::key::ResourceKey;
use crate::permission::Permission;
use crate::subject::SubjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Granted and revoked permission sets attached to one resource path
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectedPermissions {
    /// Permissions explicitly granted at the path
    pub granted: HashSet<Permission>,
    /// Permissions explicitly revoked at the path
    pub revoked: HashSet<Permission>,
}

impl EffectedPermissions {
    /// Create from granted and revoked collections
    pub fn new<G, R>(granted: G, revoked: R) -> Self
    where
        G: IntoIterator,
        G::Item: Into<Permission>,
        R: IntoIterator,
        R::Item: Into<Permission>,
    {
        Self {
            granted: granted.into_iter().map(Into::into).collect(),
            revoked: revoked.into_iter().map(Into::into).collect(),
        }
    }

    /// Grants only, nothing revoked
    pub fn granted_only<G>(granted: G) -> Self
    where
        G: IntoIterator,
        G::Item: Into<Permission>,
    {
        Self {
            granted: granted.into_iter().map(Into::into).collect(),
            revoked: HashSet::new(),
        }
    }

    /// Revokes only, nothing granted
    pub fn revoked_only<R>(revoked: R) -> Self
    where
        R: IntoIterator,
        R::Item: Into<Permission>,
    {
        Self {
            granted: HashSet::new(),
            revoked: revoked.into_iter().map(Into::into).collect(),
        }
    }

    /// True when neither set holds a permission
    pub fn is_empty(&self) -> bool {
        self.granted.is_empty() && self.revoked.is_empty()
    }

    /// Union-merge `other` into self, independently per set.
    ///
    /// Merging never removes a permission, so entries contributed by one
    /// policy record cannot erase another's.
    pub fn merge(&mut self, other: &EffectedPermissions) {
        self.granted.extend(other.granted.iter().cloned());
        self.revoked.extend(other.revoked.iter().cloned());
    }
}

/// One policy record: these subjects have these effected permissions at
/// this resource
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyEntry {
    /// Subjects the record speaks about
    pub subjects: Vec<SubjectId>,
    /// Target resource type and path
    pub resource: ResourceKey,
    /// Permissions granted/revoked at the target
    pub permissions: EffectedPermissions,
}

impl PolicyEntry {
    /// Create a new policy entry
    pub fn new<S>(subjects: S, resource: ResourceKey, permissions: EffectedPermissions) -> Self
    where
        S: IntoIterator,
        S::Item: Into<SubjectId>,
    {
        Self {
            subjects: subjects.into_iter().map(Into::into).collect(),
            resource,
            permissions,
        }
    }
}

/// Subjects partitioned by definite verdict at a resource
///
/// A subject never appears in both sets; subjects with no definite verdict
/// appear in neither.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectedSubjects {
    /// Subjects with a definite grant
    pub granted: HashSet<SubjectId>,
    /// Subjects with a definite revoke
    pub revoked: HashSet<SubjectId>,
}

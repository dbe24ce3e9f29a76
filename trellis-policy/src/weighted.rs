//! Weighted permission aggregation
//!
//! During a traversal every visited node contributes its granted and revoked
//! permissions weighted by the node's level, so deeper (more specific) rules
//! outweigh shallower ones. After the walk, [`WeightedPermissions::resolve`]
//! keeps the highest-weight entry per permission name and the tie-break
//! evaluation turns the two maps into a verdict.
//!
//! The tie-break is deliberately asymmetric: a revoke wins an equal-weight
//! tie in both conditions, so a grant only ever defeats a revoke with
//! strictly greater weight. Changing this would change authorization
//! outcomes.

use rustc_hash::FxHashMap;
use trellis_core::Permission;

/// A permission together with the level of the node that recorded it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightedPermission {
    /// The permission name
    pub permission: Permission,
    /// Level of the contributing resource node
    pub weight: usize,
}

/// Per-query accumulator of weighted grants and revokes.
///
/// Created fresh for every traversal and discarded with it; nothing here
/// survives across queries.
#[derive(Debug, Default)]
pub struct WeightedPermissions {
    granted: Vec<WeightedPermission>,
    revoked: Vec<WeightedPermission>,
}

impl WeightedPermissions {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single granted permission at `weight`
    pub fn add_granted(&mut self, permission: Permission, weight: usize) {
        self.granted.push(WeightedPermission { permission, weight });
    }

    /// Record a single revoked permission at `weight`
    pub fn add_revoked(&mut self, permission: Permission, weight: usize) {
        self.revoked.push(WeightedPermission { permission, weight });
    }

    /// Record every permission in `permissions` as granted at `weight`
    pub fn add_all_granted<'a, I>(&mut self, permissions: I, weight: usize)
    where
        I: IntoIterator<Item = &'a Permission>,
    {
        for permission in permissions {
            self.add_granted(permission.clone(), weight);
        }
    }

    /// Record every permission in `permissions` as revoked at `weight`
    pub fn add_all_revoked<'a, I>(&mut self, permissions: I, weight: usize)
    where
        I: IntoIterator<Item = &'a Permission>,
    {
        for permission in permissions {
            self.add_revoked(permission.clone(), weight);
        }
    }

    /// Keep, per expected permission name, only the highest-weight entry of
    /// each kind. Names outside `expected` are dropped.
    pub fn resolve(&self, expected: &[Permission]) -> ResolvedPermissions {
        ResolvedPermissions {
            granted: highest_by_name(&self.granted, expected),
            revoked: highest_by_name(&self.revoked, expected),
        }
    }

    /// Resolve and run the tie-break evaluation in one step
    pub fn evaluate(&self, expected: &[Permission]) -> PermissionVerdict {
        self.resolve(expected).evaluate(expected)
    }
}

fn highest_by_name(
    entries: &[WeightedPermission],
    expected: &[Permission],
) -> FxHashMap<Permission, usize> {
    let mut best: FxHashMap<Permission, usize> = FxHashMap::default();
    for entry in entries {
        if !expected.contains(&entry.permission) {
            continue;
        }
        best.entry(entry.permission.clone())
            .and_modify(|weight| *weight = (*weight).max(entry.weight))
            .or_insert(entry.weight);
    }
    best
}

/// Highest-weight grant and revoke per expected permission name
#[derive(Debug)]
pub struct ResolvedPermissions {
    /// Winning granted weight per permission
    pub granted: FxHashMap<Permission, usize>,
    /// Winning revoked weight per permission
    pub revoked: FxHashMap<Permission, usize>,
}

impl ResolvedPermissions {
    /// Every expected permission has a revoked entry, and no grant of the
    /// same name carries strictly more weight (a tie still revokes).
    pub fn effectively_revoked(&self, expected: &[Permission]) -> bool {
        expected.iter().all(|permission| {
            let Some(&revoked_weight) = self.revoked.get(permission) else {
                return false;
            };
            match self.granted.get(permission) {
                Some(&granted_weight) => granted_weight <= revoked_weight,
                None => true,
            }
        })
    }

    /// Every expected permission has a granted entry, and any revoke of the
    /// same name carries strictly less weight (a tie revokes).
    pub fn effectively_granted(&self, expected: &[Permission]) -> bool {
        expected.iter().all(|permission| {
            let Some(&granted_weight) = self.granted.get(permission) else {
                return false;
            };
            match self.revoked.get(permission) {
                Some(&revoked_weight) => revoked_weight < granted_weight,
                None => true,
            }
        })
    }

    /// Run both conditions
    pub fn evaluate(&self, expected: &[Permission]) -> PermissionVerdict {
        PermissionVerdict {
            granted: self.effectively_granted(expected),
            revoked: self.effectively_revoked(expected),
        }
    }
}

/// Outcome of the tie-break evaluation for one subject or combined context
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PermissionVerdict {
    /// All expected permissions effectively granted
    pub granted: bool,
    /// All expected permissions effectively revoked
    pub revoked: bool,
}

impl PermissionVerdict {
    /// Neither condition held; callers must treat this as not granted
    pub fn is_undefined(&self) -> bool {
        !self.granted && !self.revoked
    }
}

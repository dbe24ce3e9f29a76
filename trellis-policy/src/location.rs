//! Pointer location classification
//!
//! The single primitive deciding how a resource node relates to a query
//! target: the node's absolute pointer is classified against the query's
//! reference pointer, and the aggregation rules in [`crate::visit`] key off
//! the verdict.

use std::cmp::Ordering;
use trellis_core::ResourcePointer;

/// Position of an evaluated pointer relative to a fixed reference pointer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerLocation {
    /// The evaluated pointer is a strict prefix of the reference (an ancestor)
    Above,
    /// Both pointers are segment-wise equal
    Same,
    /// The reference is a strict prefix of the evaluated pointer (a descendant)
    Below,
    /// Neither pointer is a prefix of the other
    Different,
}

impl PointerLocation {
    /// Classify `evaluation` against `reference`.
    ///
    /// Walks both pointers segment-by-segment up to the shorter length; any
    /// mismatch is `Different`, otherwise the length comparison picks
    /// `Above`/`Same`/`Below`.
    pub fn locate(evaluation: &ResourcePointer, reference: &ResourcePointer) -> Self {
        let shared = evaluation.level().min(reference.level());
        for index in 0..shared {
            if evaluation.segment(index) != reference.segment(index) {
                return PointerLocation::Different;
            }
        }
        match evaluation.level().cmp(&reference.level()) {
            Ordering::Less => PointerLocation::Above,
            Ordering::Equal => PointerLocation::Same,
            Ordering::Greater => PointerLocation::Below,
        }
    }
}

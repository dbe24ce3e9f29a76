//! Enforcement error types

use thiserror::Error;

/// Result type alias for enforcement operations
pub type Result<T> = std::result::Result<T, EnforcementError>;

/// Errors raised by the enforcement facade before any traversal runs.
///
/// Missing subjects or paths in the policy tree are NOT errors — they simply
/// contribute nothing to a query and yield an undefined (never granted)
/// verdict.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnforcementError {
    /// The query carried no subjects
    #[error("subject collection must not be empty")]
    EmptySubjects,

    /// The query carried no permissions
    #[error("permission collection must not be empty")]
    EmptyPermissions,

    /// The resource key names no resource type
    #[error("resource key must name a non-empty resource type")]
    InvalidResourceKey,
}

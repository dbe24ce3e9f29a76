//! # Trellis Core
//!
//! Domain primitives for the Trellis policy enforcement engine.
//!
//! This crate provides:
//! - Identifier types: [`Permission`], [`SubjectId`] (cheap-clone `Arc<str>`
//!   newtypes)
//! - [`ResourcePointer`]: hierarchical path into a resource-type namespace
//! - [`ResourceKey`]: resource type + path, the target of every query
//! - [`EffectedPermissions`] / [`PolicyEntry`]: the engine's policy input
//! - [`EffectedSubjects`]: granted/revoked subject partition
//! - JSON field flattening ([`fields::flatten_value`] /
//!   [`fields::expand_fields`]) for the document view filter
//!
//! ## Design Principles
//!
//! 1. **Pure data**: no I/O, no persistence; parsing and storage of policies
//!    belong to the surrounding service layer
//! 2. **Cheap clones**: identifiers and path segments share `Arc<str>`
//!    payloads, so per-query copies cost a refcount bump
//! 3. **String forms everywhere**: pointers and keys serialize as their
//!    `"/a/b"` / `"type:/a/b"` display forms

pub mod entry;
pub mod error;
pub mod fields;
pub mod key;
pub mod permission;
pub mod pointer;
pub mod subject;

pub use entry::{EffectedPermissions, EffectedSubjects, PolicyEntry};
pub use error::{Error, Result};
pub use key::ResourceKey;
pub use permission::Permission;
pub use pointer::ResourcePointer;
pub use subject::SubjectId;

//! Resource pointers
//!
//! A `ResourcePointer` is an ordered sequence of path segments addressing a
//! location inside a resource-type namespace (e.g. `/attributes/location`).
//! The root pointer has zero segments and prints as `/`.
//!
//! Pointers are compared segment-wise; `level` (the segment count) doubles
//! as the depth weight during policy aggregation, so the root sits at
//! level 0 and every segment adds one.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Hierarchical pointer into a resource-type namespace
///
/// Serializes as its string form (`"/"`, `"/a/b"`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ResourcePointer {
    segments: Vec<Arc<str>>,
}

impl ResourcePointer {
    /// The root pointer (zero segments)
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a pointer from its string form.
    ///
    /// Accepts `""`, `"/"`, `"a/b"` and `"/a/b"`; empty interior segments
    /// (`"/a//b"`) are rejected.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.strip_prefix('/').unwrap_or(s);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = Vec::new();
        for segment in trimmed.split('/') {
            if segment.is_empty() {
                return Err(Error::invalid_pointer(format!("empty segment in '{s}'")));
            }
            segments.push(Arc::from(segment));
        }
        Ok(Self { segments })
    }

    /// Number of segments; the root pointer has level 0
    pub fn level(&self) -> usize {
        self.segments.len()
    }

    /// True for the zero-segment pointer
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment at `index`, if present
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(|segment| segment.as_ref())
    }

    /// Iterate the segments in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|segment| segment.as_ref())
    }

    /// New pointer with `segment` appended
    pub fn child(&self, segment: impl AsRef<str>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Arc::from(segment.as_ref()));
        Self { segments }
    }

    /// Prefix of this pointer cut down to at most `level` segments
    pub fn truncate(&self, level: usize) -> Self {
        Self {
            segments: self.segments[..level.min(self.segments.len())].to_vec(),
        }
    }

    /// True when `prefix` matches this pointer segment-wise over the whole
    /// of `prefix` (every pointer starts with the root pointer)
    pub fn starts_with(&self, prefix: &ResourcePointer) -> bool {
        prefix.level() <= self.level()
            && prefix
                .segments
                .iter()
                .zip(&self.segments)
                .all(|(a, b)| a == b)
    }
}

impl fmt::Display for ResourcePointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for ResourcePointer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ResourcePointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourcePointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

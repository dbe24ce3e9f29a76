//! Resource keys
//!
//! A `ResourceKey` names an enforcement target: a resource type plus a
//! pointer into that type's hierarchy. The string form is `type:/a/b`; the
//! pointer part always carries its leading slash, so the root of a type is
//! `type:/`.

use crate::error::{Error, Result};
use crate::pointer::ResourcePointer;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Resource type plus path, the target of every enforcement query
///
/// Serializes as its string form (`"thing:/features/temperature"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    resource_type: String,
    path: ResourcePointer,
}

impl ResourceKey {
    /// Create a new resource key
    pub fn new(resource_type: impl Into<String>, path: ResourcePointer) -> Self {
        Self {
            resource_type: resource_type.into(),
            path,
        }
    }

    /// Parse a key from its `type:/a/b` string form.
    ///
    /// The resource type before the first `:` must be non-empty.
    pub fn parse(s: &str) -> Result<Self> {
        let Some((resource_type, path)) = s.split_once(':') else {
            return Err(Error::invalid_resource_key(format!(
                "missing ':' separator in '{s}'"
            )));
        };
        if resource_type.is_empty() {
            return Err(Error::invalid_resource_key(format!(
                "empty resource type in '{s}'"
            )));
        }
        Ok(Self {
            resource_type: resource_type.to_string(),
            path: ResourcePointer::parse(path)?,
        })
    }

    /// The resource-type namespace this key addresses
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// The path within the resource type
    pub fn path(&self) -> &ResourcePointer {
        &self.path
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.path)
    }
}

impl FromStr for ResourceKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ResourceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

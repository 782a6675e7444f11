//! Checksum utilities for flattened schema projections

use sha2::{Sha256, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::node::SchemaNode;

/// SHA256 checksum of a flattened leaf sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Compute checksum over the JSON rendering of a leaf sequence
    pub fn of_leaves(leaves: &[SchemaNode]) -> Self {
        let canonical = serde_json::to_string(leaves).unwrap_or_default();
        Self::from_bytes(canonical.as_bytes())
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verify that a leaf sequence matches this checksum
    pub fn verify_leaves(&self, leaves: &[SchemaNode]) -> bool {
        *self == Self::of_leaves(leaves)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Checksum {
    fn from(s: String) -> Self {
        Self(s)
    }
}

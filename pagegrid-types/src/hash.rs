//! Node identifiers.
//!
//! Every node of a layout document carries a hash. Hashes generated by the
//! editor for nodes that were never persisted are "draft" hashes; they are
//! replaced by stable identifiers (UUID v7) when the document is persisted.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a layout node.
///
/// Compared, ordered and hashed by its string value.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, std::hash::Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hash(String);

impl Hash {
    /// Prefix marking a client-generated placeholder hash.
    pub const DRAFT_PREFIX: &'static str = "__";

    /// Wraps an existing identifier string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh, stable (non-draft) hash.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// True if the hash is empty or starts with [`Hash::DRAFT_PREFIX`].
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.0.is_empty() || self.0.starts_with(Self::DRAFT_PREFIX)
    }

    /// Returns the underlying identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the hash, returning the underlying identifier.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Hash {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Hash {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for Hash {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Hash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! Per-node content records.

use crate::{Hash, LanguageId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::btree_map::{self, BTreeMap};

/// Content of one layout node in one language.
///
/// A record with `language == None` is the fallback copy, visible to every
/// language that has no localized record of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub hash: Hash,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguageId>,
    pub payload: Value,
}

impl ContentRecord {
    /// Creates a fallback-tagged record.
    pub fn new(hash: impl Into<Hash>, payload: Value) -> Self {
        Self {
            hash: hash.into(),
            language: None,
            payload,
        }
    }

    /// Creates a record tagged with a concrete language.
    pub fn localized(hash: impl Into<Hash>, language: LanguageId, payload: Value) -> Self {
        Self {
            hash: hash.into(),
            language: Some(language),
            payload,
        }
    }

    /// Returns a copy of this record re-tagged with `language`.
    #[must_use]
    pub fn with_language(&self, language: Option<LanguageId>) -> Self {
        Self {
            hash: self.hash.clone(),
            language,
            payload: self.payload.clone(),
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.language.is_none()
    }

    /// True if the payload carries no content, see [`is_empty_payload`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        is_empty_payload(&self.payload)
    }
}

/// Decides whether a content payload is empty.
///
/// `null`, `""`, `[]` and `{}` are empty, and so is an array or object whose
/// every element is empty. Numbers and booleans always count as content.
#[must_use]
pub fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.iter().all(is_empty_payload),
        Value::Object(map) => map.values().all(is_empty_payload),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Content records keyed by node hash, at most one record per hash.
///
/// Iteration order is the order of the hashes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentMap {
    records: BTreeMap<Hash, ContentRecord>,
}

impl ContentMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record under its own hash, returning the record it replaced.
    pub fn insert(&mut self, record: ContentRecord) -> Option<ContentRecord> {
        self.records.insert(record.hash.clone(), record)
    }

    pub fn get(&self, hash: &str) -> Option<&ContentRecord> {
        self.records.get(hash)
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.records.contains_key(hash)
    }

    pub fn remove(&mut self, hash: &str) -> Option<ContentRecord> {
        self.records.remove(hash)
    }

    pub fn hashes(&self) -> impl Iterator<Item = &Hash> {
        self.records.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<ContentRecord> for ContentMap {
    fn from_iter<I: IntoIterator<Item = ContentRecord>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl Extend<ContentRecord> for ContentMap {
    fn extend<I: IntoIterator<Item = ContentRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl IntoIterator for ContentMap {
    type Item = ContentRecord;
    type IntoIter = btree_map::IntoValues<Hash, ContentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_values()
    }
}

impl<'a> IntoIterator for &'a ContentMap {
    type Item = &'a ContentRecord;
    type IntoIter = btree_map::Values<'a, Hash, ContentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}

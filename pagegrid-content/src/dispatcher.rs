//! Content diff engine.

use pagegrid_types::ContentMap;

/// Outcome of a dispatch: which content to insert, overwrite and delete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchedContent {
    /// Upcoming records whose hash has no existing content.
    pub new: ContentMap,
    /// Upcoming records that change existing content.
    pub modified: ContentMap,
    /// Existing records whose content goes away.
    pub removed: ContentMap,
}

impl DispatchedContent {
    /// True if there is nothing to persist.
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }
}

/// Splits upcoming content into new, modified and removed records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentDispatcher;

impl ContentDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Diffs `upcoming` against `existing`.
    ///
    /// - new: hashes only in `upcoming`
    /// - modified: hashes in both whose upcoming payload differs and is not empty
    /// - removed: hashes of `existing` missing from `upcoming`, or whose
    ///   upcoming payload is empty
    ///
    /// An empty upcoming payload always means removal, never modification.
    pub fn dispatch(&self, upcoming: &ContentMap, existing: &ContentMap) -> DispatchedContent {
        let mut dispatched = DispatchedContent::default();

        for record in upcoming {
            match existing.get(record.hash.as_str()) {
                None => {
                    dispatched.new.insert(record.clone());
                }
                Some(current) if !record.is_empty() && current.payload != record.payload => {
                    dispatched.modified.insert(record.clone());
                }
                Some(_) => {}
            }
        }

        for record in existing {
            let kept = upcoming
                .get(record.hash.as_str())
                .is_some_and(|next| !next.is_empty());
            if !kept {
                dispatched.removed.insert(record.clone());
            }
        }

        dispatched
    }
}

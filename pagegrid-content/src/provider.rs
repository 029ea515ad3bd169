use crate::ContentResult;
use pagegrid_storage::ContentStore;
use pagegrid_types::{ContentMap, Hash, LanguageId};
use std::sync::Arc;
use tracing::debug;

/// Reads node content in one language, falling back to the shared copy.
pub struct ContentProvider {
    store: Arc<dyn ContentStore>,
    language: LanguageId,
}

impl ContentProvider {
    pub fn new(store: Arc<dyn ContentStore>, language: LanguageId) -> Self {
        Self { store, language }
    }

    pub fn language(&self) -> LanguageId {
        self.language
    }

    /// Content of `hashes` for the current language.
    ///
    /// A hash resolves to its current-language record when one exists,
    /// otherwise to its fallback record. Hashes without either are absent.
    pub fn find_by_hashes(&self, hashes: &[Hash]) -> ContentResult<ContentMap> {
        if hashes.is_empty() {
            return Ok(ContentMap::new());
        }

        let rows = self
            .store
            .query_by_hashes_and_language(hashes, self.language, true)?;

        let mut contents = ContentMap::new();
        for row in rows {
            let localized = contents
                .get(row.hash.as_str())
                .is_some_and(|kept| !kept.is_fallback());
            if row.is_fallback() && localized {
                continue;
            }
            contents.insert(row);
        }
        debug!(language = %self.language, requested = hashes.len(), found = contents.len(), "resolved content");
        Ok(contents)
    }
}

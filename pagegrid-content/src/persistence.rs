use crate::{ContentResult, DispatchedContent};
use pagegrid_storage::{ContentStore, ContentWrite};
use pagegrid_types::LanguageContext;
use std::sync::Arc;
use tracing::info;

/// Writes dispatched content to a [`ContentStore`] for one language.
pub struct ContentPersistenceManager {
    store: Arc<dyn ContentStore>,
    language: LanguageContext,
}

impl ContentPersistenceManager {
    pub fn new(store: Arc<dyn ContentStore>, language: LanguageContext) -> Self {
        Self { store, language }
    }

    pub fn language(&self) -> LanguageContext {
        self.language
    }

    /// Persists a diff as a single batch.
    ///
    /// New records are written for the current language and as a fallback
    /// copy; new records with an empty payload are not stored at all. Modified records overwrite the current language's row, and also
    /// the fallback row when the current language is the default. Removed
    /// hashes lose every row in every language.
    pub fn persist(&self, dispatched: &DispatchedContent) -> ContentResult<()> {
        let writes = self.plan(dispatched);
        if writes.is_empty() {
            return Ok(());
        }
        self.store.apply(&writes)?;
        info!(
            language = %self.language.current,
            new = dispatched.new.len(),
            modified = dispatched.modified.len(),
            removed = dispatched.removed.len(),
            "persisted content"
        );
        Ok(())
    }

    /// The writes [`persist`](Self::persist) applies, in order.
    pub fn plan(&self, dispatched: &DispatchedContent) -> Vec<ContentWrite> {
        let current = Some(self.language.current);
        let mut writes = Vec::new();

        for record in dispatched.new.iter().filter(|record| !record.is_empty()) {
            writes.push(ContentWrite::Insert(record.with_language(current)));
            writes.push(ContentWrite::Insert(record.with_language(None)));
        }

        for record in &dispatched.modified {
            writes.push(ContentWrite::Upsert(record.with_language(current)));
            if self.language.is_default() {
                writes.push(ContentWrite::Upsert(record.with_language(None)));
            }
        }

        for record in &dispatched.removed {
            writes.push(ContentWrite::DeleteHash(record.hash.clone()));
        }

        writes
    }
}

//! Fetch and save workflow of whole layouts.

use crate::{ContentDispatcher, ContentPersistenceManager, ContentProvider, ContentResult};
use pagegrid_model::{LayoutObject, LayoutObjectFactory, SerializationState};
use pagegrid_storage::{ContentStore, DocumentStore, StorageError};
use pagegrid_types::{ContentMap, Hash, LanguageContext};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Loads and stores layouts together with their content.
///
/// Documents are kept content-free in the [`DocumentStore`]; node content
/// goes through the dispatcher into the [`ContentStore`].
pub struct LayoutRepository {
    factory: LayoutObjectFactory,
    documents: Arc<dyn DocumentStore>,
    contents: Arc<dyn ContentStore>,
    language: LanguageContext,
    dispatcher: ContentDispatcher,
}

impl LayoutRepository {
    pub fn new(
        factory: LayoutObjectFactory,
        documents: Arc<dyn DocumentStore>,
        contents: Arc<dyn ContentStore>,
        language: LanguageContext,
    ) -> Self {
        Self {
            factory,
            documents,
            contents,
            language,
            dispatcher: ContentDispatcher::new(),
        }
    }

    pub fn language(&self) -> LanguageContext {
        self.language
    }

    pub fn provider(&self) -> ContentProvider {
        ContentProvider::new(Arc::clone(&self.contents), self.language.current)
    }

    pub fn persistence(&self) -> ContentPersistenceManager {
        ContentPersistenceManager::new(Arc::clone(&self.contents), self.language)
    }

    /// Loads a stored layout in the `Fetched` state with its content attached.
    pub fn fetch(&self, name: &str) -> ContentResult<LayoutObject> {
        let document = self.documents.read(name)?;
        let mut layout = self
            .factory
            .create_layout_object(&document, Some(name.to_string()), SerializationState::Fetched)?;
        let contents = self.provider().find_by_hashes(&layout.hashes())?;
        layout.set_contents(contents);
        debug!(name, nodes = layout.len(), "fetched layout");
        Ok(layout)
    }

    /// Stores a new layout under a generated name.
    pub fn create(&self, document: &Value) -> ContentResult<LayoutObject> {
        let name = Uuid::now_v7().simple().to_string();
        let layout = self
            .factory
            .create_layout_object(document, Some(name), SerializationState::Persisting)?;
        let existing = self.provider().find_by_hashes(&layout.hashes())?;
        self.save(layout, existing, None)
    }

    /// Replaces the layout stored under `name`, creating it if missing.
    ///
    /// Content of nodes that are no longer part of the layout is removed.
    pub fn update(&self, name: &str, document: &Value) -> ContentResult<LayoutObject> {
        let layout = self
            .factory
            .create_layout_object(document, Some(name.to_string()), SerializationState::Persisting)?;

        let previous = match self.documents.read(name) {
            Ok(document) => Some(document),
            Err(StorageError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        };

        let mut hashes: BTreeSet<Hash> = layout.hashes().into_iter().collect();
        if let Some(stored) = &previous {
            let stored = self
                .factory
                .create_layout_object(stored, None, SerializationState::Default)?;
            hashes.extend(stored.hashes());
        }
        let hashes: Vec<Hash> = hashes.into_iter().collect();

        let existing = self.provider().find_by_hashes(&hashes)?;
        self.save(layout, existing, previous)
    }

    // Serializes in `Persisting`, writes the document, persists the content
    // diff, and hands the layout back in `Fetched`. When the content cannot
    // be persisted, `previous` is written back (or the new document removed).
    fn save(
        &self,
        mut layout: LayoutObject,
        existing: ContentMap,
        previous: Option<Value>,
    ) -> ContentResult<LayoutObject> {
        let name = layout.name().unwrap_or_default().to_string();
        let document = layout.serialize()?;
        let upcoming = layout.take_contents();

        let dispatched = self.dispatcher.dispatch(&upcoming, &existing);
        self.documents.write(&name, &document)?;
        if let Err(e) = self.persistence().persist(&dispatched) {
            let restored = match &previous {
                Some(previous) => self.documents.write(&name, previous),
                None => self.documents.remove(&name),
            };
            if let Err(restore) = restored {
                warn!(name = %name, error = %restore, "failed to restore layout document");
            }
            return Err(e);
        }
        info!(
            name = %name,
            nodes = layout.len(),
            new = dispatched.new.len(),
            modified = dispatched.modified.len(),
            removed = dispatched.removed.len(),
            "saved layout"
        );

        layout.set_state(SerializationState::Fetched);
        layout.set_contents(upcoming);
        Ok(layout)
    }
}

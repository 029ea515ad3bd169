//! Read-through cache of compiled definitions.

use crate::{Definition, DefinitionError, DefinitionResult, DefinitionSource};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info};

/// Provides definitions by node type name, loading them on first use.
///
/// Reads share an `RwLock`. A miss enters a populate section guarded by a
/// separate mutex: the cache is re-checked, then the whole source is
/// reloaded and every definition is stored. Concurrent misses therefore
/// compile the batch once and never observe a half-filled cache.
pub struct DefinitionProvider {
    source: Box<dyn DefinitionSource>,
    cache: RwLock<HashMap<String, Arc<Definition>>>,
    populate: Mutex<()>,
}

impl DefinitionProvider {
    pub fn new(source: impl DefinitionSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: RwLock::new(HashMap::new()),
            populate: Mutex::new(()),
        }
    }

    /// Returns the definition of `name`, reloading all definitions on a miss.
    pub fn fetch(&self, name: &str) -> DefinitionResult<Arc<Definition>> {
        if let Some(definition) = self.cached(name) {
            return Ok(definition);
        }

        let _guard = self.populate.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have populated the cache while we waited.
        if let Some(definition) = self.cached(name) {
            return Ok(definition);
        }

        debug!(name, "definition cache miss");
        self.reload()?;
        self.cached(name)
            .ok_or_else(|| DefinitionError::NotFound(name.to_string()))
    }

    /// Loads every definition from the source into the cache.
    pub fn warm_up(&self) -> DefinitionResult<usize> {
        let _guard = self.populate.lock().unwrap_or_else(PoisonError::into_inner);
        self.reload()
    }

    /// Drops every cached definition. The next fetch reloads the source.
    pub fn invalidate(&self) {
        let _guard = self.populate.lock().unwrap_or_else(PoisonError::into_inner);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Names of the cached definitions, sorted.
    pub fn cached_names(&self) -> Vec<String> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = cache.keys().cloned().collect();
        names.sort();
        names
    }

    fn cached(&self, name: &str) -> Option<Arc<Definition>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    // Callers must hold the populate guard.
    fn reload(&self) -> DefinitionResult<usize> {
        let definitions = self.source.load_definitions()?;
        let count = definitions.len();

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        for definition in definitions {
            cache.insert(definition.name().to_string(), Arc::new(definition));
        }
        info!(count, "loaded definitions");
        Ok(count)
    }
}

impl std::fmt::Debug for DefinitionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefinitionProvider")
            .field("cached", &self.cached_names())
            .finish_non_exhaustive()
    }
}

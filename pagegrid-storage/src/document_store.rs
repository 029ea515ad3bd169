//! Layout document persistence.

use crate::{StorageError, StorageResult};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Reads and writes layout documents by name.
pub trait DocumentStore: Send + Sync {
    /// Returns the stored document, or [`StorageError::NotFound`].
    fn read(&self, name: &str) -> StorageResult<Value>;

    /// Stores `document` under `name`, replacing any previous version.
    fn write(&self, name: &str, document: &Value) -> StorageResult<()>;

    fn exists(&self, name: &str) -> StorageResult<bool>;

    /// Deletes the document stored under `name`. Missing documents are ignored.
    fn remove(&self, name: &str) -> StorageResult<()>;
}

/// Stores each document as `<root>/<name>.json`.
#[derive(Debug, Clone)]
pub struct JsonDocumentStore {
    root: PathBuf,
}

impl JsonDocumentStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> StorageResult<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(format!("{name}.json")))
    }
}

impl DocumentStore for JsonDocumentStore {
    fn read(&self, name: &str) -> StorageResult<Value> {
        let path = self.path_for(name)?;
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    fn write(&self, name: &str, document: &Value) -> StorageResult<()> {
        let path = self.path_for(name)?;
        let tmp = self.root.join(format!(".{name}.json.tmp"));
        std::fs::write(&tmp, serde_json::to_vec_pretty(document)?)?;
        // Readers see either the previous or the new document, never a partial one.
        std::fs::rename(&tmp, &path)?;
        debug!(name, path = %path.display(), "wrote document");
        Ok(())
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        Ok(self.path_for(name)?.is_file())
    }

    fn remove(&self, name: &str) -> StorageResult<()> {
        let path = self.path_for(name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(name, path = %path.display(), "removed document");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps documents in memory.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<String, Value>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn read(&self, name: &str) -> StorageResult<Value> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    fn write(&self, name: &str, document: &Value) -> StorageResult<()> {
        validate_name(name)?;
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), document.clone());
        Ok(())
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        Ok(self
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name))
    }

    fn remove(&self, name: &str) -> StorageResult<()> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
        Ok(())
    }
}

fn validate_name(name: &str) -> StorageResult<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(StorageError::InvalidData(format!("invalid document name: {name:?}")));
    }
    Ok(())
}

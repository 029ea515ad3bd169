//! Storage collaborators for pagegrid.
//!
//! - [`DocumentStore`]: layout documents by name ([`JsonDocumentStore`] on
//!   disk, [`MemoryDocumentStore`] in memory)
//! - [`ContentStore`]: per-language content rows, written in atomic
//!   batches of [`ContentWrite`]s ([`SqliteContentStore`])

mod content_store;
mod document_store;
mod error;

pub use content_store::{ContentStore, ContentWrite, SqliteContentStore};
pub use document_store::{DocumentStore, JsonDocumentStore, MemoryDocumentStore};
pub use error::{StorageError, StorageResult};

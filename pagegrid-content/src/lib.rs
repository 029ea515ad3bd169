//! Content management for pagegrid.
//!
//! Node content lives outside the layout documents, one row per node hash
//! and language, plus a fallback row shared by every language:
//! - [`ContentDispatcher`]: diffs upcoming against existing content
//! - [`ContentPersistenceManager`]: writes a diff as one atomic batch
//! - [`ContentProvider`]: reads content with language fallback
//! - [`LayoutRepository`]: the fetch and save workflow of whole layouts

mod dispatcher;
mod error;
mod persistence;
mod provider;
mod repository;

pub use dispatcher::{ContentDispatcher, DispatchedContent};
pub use error::{ContentError, ContentResult};
pub use persistence::ContentPersistenceManager;
pub use provider::ContentProvider;
pub use repository::LayoutRepository;

//! Core value types for pagegrid.
//!
//! This crate defines the small, storage-agnostic types shared by every
//! other pagegrid crate:
//! - [`Hash`]: the identifier of a layout node, draft or stable
//! - [`ContentRecord`] / [`ContentMap`]: per-node content payloads keyed by hash
//! - [`LanguageId`] / [`LanguageContext`]: the language a request acts in
//!
//! Node types, definitions and the entity graph live in `pagegrid-definition`
//! and `pagegrid-model`, not here.

mod content;
mod hash;
mod language;

pub use content::{is_empty_payload, ContentMap, ContentRecord};
pub use hash::Hash;
pub use language::{LanguageContext, LanguageId};

//! Layout entity graph for pagegrid.
//!
//! A layout document is a JSON array of nodes. [`LayoutObjectFactory`]
//! hydrates it into a [`LayoutObject`], the aggregate root that owns every
//! [`Entity`] of the document in an arena, indexes them by hash, and holds
//! the language-resolved content of the nodes.
//!
//! # Ownership
//!
//! Entities never point at each other. Children collections hold
//! [`NodeId`]s into the owning layout's arena, and an entity's root is the
//! [`LayoutId`] of that layout, so the graph has no reference cycles.
//!
//! # Serialization
//!
//! A layout renders itself back to wire JSON according to its
//! [`SerializationState`]:
//! - `Default`: structure only
//! - `Fetched`: structure plus stored content under `params.props`
//! - `Persisting`: promotes draft hashes and moves `params.props` into the
//!   layout's content map

mod collection;
mod entity;
mod error;
mod factory;
mod layout;
mod state;

pub use collection::ReferenceAwareCollection;
pub use entity::{Entity, LayoutId, NodeId};
pub use error::{ModelError, ModelResult};
pub use factory::LayoutObjectFactory;
pub use layout::LayoutObject;
pub use state::{validate_props, SerializationState};

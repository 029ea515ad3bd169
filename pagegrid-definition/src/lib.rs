//! Node type definitions for pagegrid.
//!
//! A definition describes the shape of one node type of a layout document:
//! its kind (widget, widget item or grid), whether it may contain children,
//! whether it carries validation rules, and its typed content properties.
//!
//! - [`Definition`] / [`PropertyDefinition`]: the immutable compiled model
//! - [`DefinitionCompiler`]: parses one JSON definition
//! - [`DefinitionSource`]: where definitions come from (a directory, or memory)
//! - [`DefinitionProvider`]: read-through cache keyed by node type name

mod compiler;
mod definition;
mod error;
mod provider;
mod source;

pub use compiler::DefinitionCompiler;
pub use definition::{Definition, DefinitionBuilder, EntityKind, PropertyDefinition, ScalarType};
pub use error::{DefinitionError, DefinitionResult};
pub use provider::DefinitionProvider;
pub use source::{DefinitionSource, DirectoryDefinitionSource, StaticDefinitionSource};

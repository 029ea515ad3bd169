//! Error types for hydration and serialization.

use crate::NodeId;
use pagegrid_definition::DefinitionError;
use pagegrid_types::Hash;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while hydrating, mutating or serializing a layout.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A wire node has no `type` field.
    #[error("type identifier is missing")]
    MissingTypeIdentifier,

    /// The node type is not a string, or has no usable definition.
    #[error("invalid entity type: [{entity_type}]")]
    InvalidEntityType {
        entity_type: String,
        #[source]
        source: Option<DefinitionError>,
    },

    /// A wire node has a missing, empty or non-string `hash`.
    #[error("invalid entity hash for entity of type [{entity_type}]")]
    InvalidEntityHash { entity_type: String },

    /// Two nodes of one document share a hash.
    #[error("duplicate entity hash: {0}")]
    DuplicateHash(Hash),

    /// The document root is not an array of nodes.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A node is structurally invalid.
    #[error("malformed node: {0}")]
    MalformedNode(String),

    /// A content property does not match its declared scalar type.
    #[error("property {property} of entity {hash} must be of type {expected}")]
    Validation {
        hash: Hash,
        property: String,
        expected: &'static str,
    },

    /// The node id does not belong to a live entity of this layout.
    #[error("unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// The parent's definition does not allow children.
    #[error("entity {0} cannot contain children")]
    ChildrenNotSupported(Hash),

    /// A collection index is out of range.
    #[error("index {index} out of bounds for collection of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// JSON encoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

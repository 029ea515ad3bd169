//! Error types for content management.

use pagegrid_model::ModelError;
use pagegrid_storage::StorageError;
use thiserror::Error;

/// Result type for content operations.
pub type ContentResult<T> = Result<T, ContentError>;

/// Errors raised by the content workflow. Both variants pass the
/// underlying error through unmodified.
#[derive(Debug, Error)]
pub enum ContentError {
    /// Document or content store failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Hydration, validation or serialization failure.
    #[error(transparent)]
    Model(#[from] ModelError),
}

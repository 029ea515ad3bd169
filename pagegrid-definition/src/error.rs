//! Error types for definition handling.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for definition operations.
pub type DefinitionResult<T> = Result<T, DefinitionError>;

/// Errors that can occur while compiling, loading or looking up definitions.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// Malformed or incomplete definition source.
    #[error("definition compilation failed: {0}")]
    Compilation(String),

    /// Definition source text that is not JSON. `path` names the file when
    /// the text was read from one.
    #[error(
        "invalid JSON definition{}: {source}",
        path.as_ref().map(|p| format!(" {}", p.display())).unwrap_or_default()
    )]
    InvalidJson {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },

    /// No definition exists for the requested node type, even after a reload.
    #[error("there is no definition for entity: {0}")]
    NotFound(String),

    /// The definition source could not be read.
    #[error("failed to read definition source {path}: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

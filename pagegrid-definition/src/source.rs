//! Where definitions are loaded from.

use crate::{Definition, DefinitionCompiler, DefinitionError, DefinitionResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A batch source of definitions.
///
/// The provider always reloads the whole batch; a source never needs to
/// support loading a single definition.
pub trait DefinitionSource: Send + Sync {
    /// Compiles every definition the source knows about.
    fn load_definitions(&self) -> DefinitionResult<Vec<Definition>>;
}

/// Loads every `*.json` file of a directory, one definition per file.
#[derive(Debug, Clone)]
pub struct DirectoryDefinitionSource {
    path: PathBuf,
    compiler: DefinitionCompiler,
}

impl DirectoryDefinitionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            compiler: DefinitionCompiler::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn definition_files(&self) -> DefinitionResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.path).map_err(|source| DefinitionError::Source {
            path: self.path.clone(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| DefinitionError::Source {
                path: self.path.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl DefinitionSource for DirectoryDefinitionSource {
    fn load_definitions(&self) -> DefinitionResult<Vec<Definition>> {
        let mut definitions = Vec::new();
        for file in self.definition_files()? {
            let text = std::fs::read_to_string(&file).map_err(|source| DefinitionError::Source {
                path: file.clone(),
                source,
            })?;
            let definition = self.compiler.compile(&text).map_err(|e| match e {
                DefinitionError::Compilation(msg) => {
                    DefinitionError::Compilation(format!("{}: {msg}", file.display()))
                }
                DefinitionError::InvalidJson { source, .. } => DefinitionError::InvalidJson {
                    path: Some(file.clone()),
                    source,
                },
                other => other,
            })?;
            debug!(file = %file.display(), name = definition.name(), "compiled definition");
            definitions.push(definition);
        }
        Ok(definitions)
    }
}

/// Definitions held in memory as source text.
#[derive(Debug, Clone, Default)]
pub struct StaticDefinitionSource {
    sources: Vec<String>,
    compiler: DefinitionCompiler,
}

impl StaticDefinitionSource {
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            compiler: DefinitionCompiler::new(),
        }
    }
}

impl DefinitionSource for StaticDefinitionSource {
    fn load_definitions(&self) -> DefinitionResult<Vec<Definition>> {
        self.sources
            .iter()
            .map(|text| self.compiler.compile(text))
            .collect()
    }
}

//! Configuration and wiring for the `pagegrid` binary.

use anyhow::{Context, Result};
use pagegrid_content::LayoutRepository;
use pagegrid_definition::{DefinitionProvider, DirectoryDefinitionSource};
use pagegrid_model::LayoutObjectFactory;
use pagegrid_storage::{JsonDocumentStore, SqliteContentStore};
use pagegrid_types::{LanguageContext, LanguageId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Settings read from the JSON config file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of `*.json` definition files.
    pub definitions_dir: PathBuf,
    /// Directory the layout documents are stored in.
    pub documents_dir: PathBuf,
    /// SQLite file holding node content.
    pub database_path: PathBuf,
    pub default_language: i64,
    /// Language of this invocation, the default language when unset.
    pub current_language: Option<i64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            definitions_dir: PathBuf::from("definitions"),
            documents_dir: PathBuf::from("documents"),
            database_path: PathBuf::from("pagegrid.db"),
            default_language: 1,
            current_language: None,
        }
    }
}

/// Command line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub definitions_dir: Option<PathBuf>,
    pub documents_dir: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub default_language: Option<i64>,
    pub current_language: Option<i64>,
}

impl Config {
    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(dir) = overrides.definitions_dir {
            self.definitions_dir = dir;
        }
        if let Some(dir) = overrides.documents_dir {
            self.documents_dir = dir;
        }
        if let Some(path) = overrides.database_path {
            self.database_path = path;
        }
        if let Some(id) = overrides.default_language {
            self.default_language = id;
        }
        if overrides.current_language.is_some() {
            self.current_language = overrides.current_language;
        }
        self
    }

    pub fn language(&self) -> LanguageContext {
        let default = LanguageId::new(self.default_language);
        let current = self.current_language.map_or(default, LanguageId::new);
        LanguageContext::new(current, default)
    }
}

/// Everything a command needs, built from a [`Config`].
pub struct Workspace {
    pub definitions: Arc<DefinitionProvider>,
    pub repository: LayoutRepository,
}

impl Workspace {
    pub fn open(config: &Config) -> Result<Self> {
        let definitions = Arc::new(DefinitionProvider::new(DirectoryDefinitionSource::new(
            &config.definitions_dir,
        )));
        let documents = JsonDocumentStore::new(&config.documents_dir)
            .with_context(|| format!("Failed to open document store {}", config.documents_dir.display()))?;
        let contents = SqliteContentStore::new(&config.database_path)
            .with_context(|| format!("Failed to open content database {}", config.database_path.display()))?;

        let language = config.language();
        info!(
            definitions = %config.definitions_dir.display(),
            documents = %config.documents_dir.display(),
            database = %config.database_path.display(),
            language = %language.current,
            "opened workspace"
        );

        let repository = LayoutRepository::new(
            LayoutObjectFactory::new(Arc::clone(&definitions)),
            Arc::new(documents),
            Arc::new(contents),
            language,
        );
        Ok(Self {
            definitions,
            repository,
        })
    }
}

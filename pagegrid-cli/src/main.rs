//! pagegrid command line
//!
//! Reads and writes page-builder layouts against a definitions directory,
//! a document directory and a content database.
//!
//! Usage:
//!   pagegrid definitions
//!   pagegrid fetch home
//!   pagegrid save layout.json --name home
//!   pagegrid --language 2 fetch home

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pagegrid_cli::{Config, Overrides, Workspace};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "pagegrid")]
#[command(about = "Schema-driven layout documents for the page builder")]
struct Args {
    /// Path to the JSON config file
    #[arg(short, long, default_value = "pagegrid.json")]
    config: PathBuf,

    /// Directory of definition files
    #[arg(long)]
    definitions: Option<PathBuf>,

    /// Directory layout documents are stored in
    #[arg(long)]
    documents: Option<PathBuf>,

    /// SQLite content database
    #[arg(long)]
    database: Option<PathBuf>,

    /// Current language id
    #[arg(short, long)]
    language: Option<i64>,

    /// Default language id
    #[arg(long)]
    default_language: Option<i64>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the known node types
    Definitions,

    /// Print a stored layout with its content
    Fetch {
        /// Layout name
        name: String,
    },

    /// Create or update a layout from a JSON file
    Save {
        /// File holding the layout document
        file: PathBuf,

        /// Layout to update; a new name is generated when omitted
        #[arg(short, long)]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = Config::load(&args.config)?.with_overrides(Overrides {
        definitions_dir: args.definitions,
        documents_dir: args.documents,
        database_path: args.database,
        default_language: args.default_language,
        current_language: args.language,
    });
    let workspace = Workspace::open(&config)?;

    match args.command {
        Command::Definitions => {
            let count = workspace
                .definitions
                .warm_up()
                .context("Failed to load definitions")?;
            info!(count, "definitions loaded");
            for name in workspace.definitions.cached_names() {
                println!("{name}");
            }
        }
        Command::Fetch { name } => {
            let mut layout = workspace
                .repository
                .fetch(&name)
                .with_context(|| format!("Failed to fetch layout {name}"))?;
            print_json(&layout.serialize()?)?;
        }
        Command::Save { file, name } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let document: Value =
                serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", file.display()))?;

            let mut layout = match name {
                Some(name) => workspace.repository.update(&name, &document),
                None => workspace.repository.create(&document),
            }
            .context("Failed to save layout")?;

            let mut output = Map::new();
            let saved = layout.name().unwrap_or_default().to_string();
            output.insert(saved, layout.serialize()?);
            print_json(&Value::Object(output))?;
        }
    }
    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

use pagegrid_cli::{Config, Overrides, Workspace};
use pagegrid_types::{LanguageContext, LanguageId};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::PathBuf;

// ── Config file ───────────────────────────────────────────────────

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("pagegrid.json")).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.language(), LanguageContext::default_only(LanguageId::new(1)));
}

#[test]
fn partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pagegrid.json");
    std::fs::write(&path, r#"{"documents_dir": "/srv/layouts", "current_language": 2}"#).unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.documents_dir, PathBuf::from("/srv/layouts"));
    assert_eq!(config.definitions_dir, PathBuf::from("definitions"));
    assert_eq!(config.language(), LanguageContext::new(LanguageId::new(2), LanguageId::new(1)));
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pagegrid.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(Config::load(&path).is_err());
}

#[test]
fn overrides_take_precedence() {
    let config = Config {
        current_language: Some(3),
        ..Config::default()
    }
    .with_overrides(Overrides {
        database_path: Some(PathBuf::from("other.db")),
        default_language: Some(5),
        ..Overrides::default()
    });

    assert_eq!(config.database_path, PathBuf::from("other.db"));
    assert_eq!(config.language(), LanguageContext::new(LanguageId::new(3), LanguageId::new(5)));
}

// ── Workspace ─────────────────────────────────────────────────────

#[test]
fn workspace_saves_and_fetches() {
    let dir = tempfile::tempdir().unwrap();
    let definitions = dir.path().join("definitions");
    std::fs::create_dir(&definitions).unwrap();
    std::fs::write(
        definitions.join("button.json"),
        r#"{"name": "button", "type": "WIDGET", "properties": [{"name": "text", "type": "STRING"}]}"#,
    )
    .unwrap();

    let config = Config::default().with_overrides(Overrides {
        definitions_dir: Some(definitions),
        documents_dir: Some(dir.path().join("documents")),
        database_path: Some(dir.path().join("contents.db")),
        ..Overrides::default()
    });
    let workspace = Workspace::open(&config).unwrap();

    assert_eq!(workspace.definitions.warm_up().unwrap(), 1);
    workspace
        .repository
        .update("home", &json!([{"type": "button", "hash": "h1", "params": {"props": {"text": "Hi"}}}]))
        .unwrap();

    let mut layout = workspace.repository.fetch("home").unwrap();
    assert_eq!(
        layout.serialize().unwrap(),
        json!([{"type": "button", "hash": "h1", "widgetType": "button", "params": {"props": {"text": "Hi"}}}])
    );
    assert!(dir.path().join("documents").join("home.json").is_file());
}

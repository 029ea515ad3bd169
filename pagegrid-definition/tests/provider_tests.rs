use pagegrid_definition::{
    Definition, DefinitionError, DefinitionProvider, DefinitionResult, DefinitionSource,
    DirectoryDefinitionSource, StaticDefinitionSource,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Static source that counts how often the batch is loaded.
struct CountingSource {
    inner: StaticDefinitionSource,
    loads: Arc<AtomicUsize>,
}

impl DefinitionSource for CountingSource {
    fn load_definitions(&self) -> DefinitionResult<Vec<Definition>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load_definitions()
    }
}

fn counting_provider() -> (DefinitionProvider, Arc<AtomicUsize>) {
    let loads = Arc::new(AtomicUsize::new(0));
    let source = CountingSource {
        inner: StaticDefinitionSource::new([
            r#"{"name": "button", "type": "WIDGET", "properties": [{"name": "text", "type": "STRING"}]}"#,
            r#"{"name": "block", "type": "BLOCK"}"#,
            r#"{"name": "column", "type": "COLUMN"}"#,
        ]),
        loads: Arc::clone(&loads),
    };
    (DefinitionProvider::new(source), loads)
}

// ── Read-through behaviour ────────────────────────────────────────

#[test]
fn miss_loads_whole_batch_once() {
    let (provider, loads) = counting_provider();

    let button = provider.fetch("button").unwrap();
    assert_eq!(button.name(), "button");
    assert_eq!(loads.load(Ordering::SeqCst), 1);

    // Every definition of the batch was cached by the first miss.
    provider.fetch("block").unwrap();
    provider.fetch("column").unwrap();
    provider.fetch("button").unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(provider.cached_names(), vec!["block", "button", "column"]);
}

#[test]
fn unknown_name_reloads_then_fails() {
    let (provider, loads) = counting_provider();

    let err = provider.fetch("carousel").unwrap_err();
    assert!(matches!(err, DefinitionError::NotFound(ref name) if name == "carousel"));
    assert_eq!(loads.load(Ordering::SeqCst), 1);

    // Known definitions were still cached by the failed lookup.
    provider.fetch("button").unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[test]
fn fetched_definitions_are_shared() {
    let (provider, _) = counting_provider();
    let a = provider.fetch("button").unwrap();
    let b = provider.fetch("button").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn warm_up_then_invalidate() {
    let (provider, loads) = counting_provider();

    assert_eq!(provider.warm_up().unwrap(), 3);
    provider.fetch("block").unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 1);

    provider.invalidate();
    assert!(provider.cached_names().is_empty());
    provider.fetch("block").unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 2);
}

#[test]
fn compilation_errors_propagate() {
    let provider = DefinitionProvider::new(StaticDefinitionSource::new(["{//}"]));
    assert!(matches!(
        provider.fetch("button"),
        Err(DefinitionError::InvalidJson { path: None, .. })
    ));
}

// ── Concurrency ───────────────────────────────────────────────────

#[test]
fn concurrent_misses_load_once() {
    let (provider, loads) = counting_provider();
    let provider = Arc::new(provider);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let provider = Arc::clone(&provider);
            thread::spawn(move || {
                let name = if i % 2 == 0 { "button" } else { "block" };
                provider.fetch(name).unwrap().name().to_string()
            })
        })
        .collect();

    for handle in handles {
        let name = handle.join().unwrap();
        assert!(name == "button" || name == "block");
    }
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

// ── Directory source ──────────────────────────────────────────────

#[test]
fn directory_source_reads_json_files_only() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("button.json"), r#"{"name": "button", "type": "WIDGET"}"#).unwrap();
    std::fs::write(dir.path().join("row.json"), r#"{"name": "row", "type": "ROW"}"#).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a definition").unwrap();

    let provider = DefinitionProvider::new(DirectoryDefinitionSource::new(dir.path()));
    assert!(provider.fetch("row").unwrap().is_grid());
    assert_eq!(provider.cached_names(), vec!["button", "row"]);
}

#[test]
fn directory_source_names_failing_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.json"), r#"{"containsChildren": true}"#).unwrap();

    let err = DirectoryDefinitionSource::new(dir.path())
        .load_definitions()
        .unwrap_err();
    match err {
        DefinitionError::Compilation(msg) => {
            assert!(msg.contains("broken.json"), "{msg}");
            assert!(msg.contains("missing: type"), "{msg}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn directory_source_names_unparsable_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.json"), "{//}").unwrap();

    let err = DirectoryDefinitionSource::new(dir.path())
        .load_definitions()
        .unwrap_err();
    assert!(err.to_string().contains("broken.json"), "{err}");
    match err {
        DefinitionError::InvalidJson { path, .. } => {
            assert_eq!(path, Some(dir.path().join("broken.json")));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_directory_is_a_source_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = DirectoryDefinitionSource::new(dir.path().join("absent"));
    assert!(matches!(
        source.load_definitions(),
        Err(DefinitionError::Source { .. })
    ));
}

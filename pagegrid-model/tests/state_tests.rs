use pagegrid_definition::{DefinitionProvider, StaticDefinitionSource};
use pagegrid_model::{validate_props, LayoutObject, LayoutObjectFactory, ModelError, SerializationState};
use pagegrid_types::{ContentMap, ContentRecord, Hash};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

fn factory() -> LayoutObjectFactory {
    let source = StaticDefinitionSource::new([
        r#"{"name": "button", "type": "WIDGET", "properties": [{"name": "text", "type": "STRING"}, {"name": "size", "type": "INT"}]}"#,
        r#"{"name": "form", "type": "WIDGET", "containsChildren": true, "containsValidation": true}"#,
        r#"{"name": "block", "type": "BLOCK"}"#,
    ]);
    LayoutObjectFactory::new(Arc::new(DefinitionProvider::new(source)))
}

fn layout(document: Value, state: SerializationState) -> LayoutObject {
    factory()
        .create_layout_object(&document, Some("page".into()), state)
        .unwrap()
}

// ── Default ───────────────────────────────────────────────────────

#[test]
fn default_state_emits_structure_only() {
    let mut layout = layout(
        json!([{"type": "widget", "widgetType": "button", "hash": "w1", "params": {"css": {"a": 1}, "props": {"text": "x"}}}]),
        SerializationState::Default,
    );
    assert_eq!(
        layout.serialize().unwrap(),
        json!([{"type": "widget", "widgetType": "button", "hash": "w1"}])
    );
}

// ── Fetched ───────────────────────────────────────────────────────

#[test]
fn fetched_state_exposes_stored_content() {
    let mut layout = layout(
        json!([
            {"type": "block", "hash": "b1", "children": [
                {"type": "button", "hash": "w1", "params": {"css": {"color": "red"}, "props": {"text": "inline"}}},
                {"type": "button", "hash": "w2"}
            ]}
        ]),
        SerializationState::Fetched,
    );
    layout.set_contents(ContentMap::from_iter([
        ContentRecord::new("w1", json!({"text": "Hi", "size": 3})),
        ContentRecord::new("w2", json!({"text": ""})),
    ]));

    assert_eq!(
        layout.serialize().unwrap(),
        json!([
            {"type": "block", "hash": "b1", "children": [
                {"type": "button", "hash": "w1", "widgetType": "button", "params": {
                    "css": {"color": "red"},
                    "props": {"text": "Hi", "size": 3}
                }},
                {"type": "button", "hash": "w2", "widgetType": "button"}
            ]}
        ])
    );
}

#[test]
fn fetched_state_exposes_validation_only_when_supported() {
    let rules = json!({"required": ["email"]});
    let mut layout = layout(
        json!([
            {"type": "form", "hash": "f1", "params": {"validation": rules}, "children": [
                {"type": "button", "hash": "w1", "params": {"validation": rules}}
            ]}
        ]),
        SerializationState::Fetched,
    );

    let rendered = layout.serialize().unwrap();
    assert_eq!(rendered[0]["params"]["validation"], rules);
    assert!(rendered[0]["children"][0].get("params").is_none());
}

#[test]
fn fetched_state_rejects_mistyped_content() {
    let mut layout = layout(json!([{"type": "button", "hash": "w1"}]), SerializationState::Fetched);
    layout
        .contents_mut()
        .insert(ContentRecord::new("w1", json!({"size": "large"})));

    let err = layout.serialize().unwrap_err();
    match err {
        ModelError::Validation { hash, property, expected } => {
            assert_eq!(hash.as_str(), "w1");
            assert_eq!(property, "size");
            assert_eq!(expected, "INT");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ── Persisting ────────────────────────────────────────────────────

#[test]
fn persisting_extracts_props_into_contents() {
    let mut layout = layout(
        json!([{"type": "button", "hash": "h1", "params": {"props": {"text": "Hi"}, "css": {"a": 1}}}]),
        SerializationState::Persisting,
    );

    let rendered = layout.serialize().unwrap();
    assert_eq!(
        rendered,
        json!([{"type": "button", "hash": "h1", "widgetType": "button", "params": {"css": {"a": 1}}}])
    );

    let record = layout.contents().get("h1").unwrap();
    assert_eq!(record.payload, json!({"text": "Hi"}));
    assert!(record.is_fallback());
}

#[test]
fn persisting_promotes_drafts_before_recording_content() {
    let mut layout = layout(
        json!([
            {"type": "block", "hash": "__b", "children": [
                {"type": "button", "hash": "__w", "params": {"props": {"text": "new"}}}
            ]}
        ]),
        SerializationState::Persisting,
    );

    let rendered = layout.serialize().unwrap();
    let block_hash = rendered[0]["hash"].as_str().unwrap();
    let button_hash = rendered[0]["children"][0]["hash"].as_str().unwrap();
    assert!(!Hash::from(block_hash).is_draft());
    assert!(!Hash::from(button_hash).is_draft());
    assert!(rendered[0]["children"][0].get("params").is_none());

    assert_eq!(layout.contents().len(), 1);
    assert_eq!(layout.contents().get(button_hash).unwrap().payload, json!({"text": "new"}));
    assert!(layout.find_entity_by_hash(button_hash).is_some());
    assert!(layout.find_entity_by_hash("__w").is_none());
}

#[test]
fn persisting_keeps_stable_hashes() {
    let mut layout = layout(json!([{"type": "button", "hash": "h1"}]), SerializationState::Persisting);
    let rendered = layout.serialize().unwrap();
    assert_eq!(rendered[0]["hash"], json!("h1"));
    assert!(layout.contents().is_empty());
}

#[test]
fn persisting_rejects_mistyped_props() {
    let mut layout = layout(
        json!([{"type": "button", "hash": "h1", "params": {"props": {"text": 5}}}]),
        SerializationState::Persisting,
    );
    assert!(matches!(layout.serialize().unwrap_err(), ModelError::Validation { .. }));
}

#[test]
fn failed_persisting_leaves_layout_untouched() {
    let mut layout = layout(
        json!([
            {"type": "button", "hash": "__a", "params": {"props": {"text": "ok"}}},
            {"type": "button", "hash": "__b", "params": {"props": {"size": "large"}}}
        ]),
        SerializationState::Persisting,
    );

    assert!(matches!(layout.serialize().unwrap_err(), ModelError::Validation { .. }));
    assert!(layout.contents().is_empty());
    assert!(layout.find_entity_by_hash("__a").is_some());
    assert!(layout.find_entity_by_hash("__b").is_some());
}

#[test]
fn persisting_rejects_non_object_props() {
    let mut layout = layout(
        json!([{"type": "button", "hash": "h1", "params": {"props": "text"}}]),
        SerializationState::Persisting,
    );
    assert!(matches!(layout.serialize().unwrap_err(), ModelError::MalformedNode(_)));
}

#[test]
fn persisted_button_fetches_back_unchanged() {
    let mut persisting = layout(
        json!([{"type": "button", "hash": "h1", "params": {"props": {"text": "Hi"}}}]),
        SerializationState::Persisting,
    );
    let stored = persisting.serialize().unwrap();
    let contents = persisting.take_contents();

    let mut fetched = layout(stored, SerializationState::Fetched);
    fetched.set_contents(contents);
    let rendered = fetched.serialize().unwrap();

    assert_eq!(rendered[0]["hash"], json!("h1"));
    assert_eq!(rendered[0]["params"]["props"]["text"], json!("Hi"));
}

// ── Single node ───────────────────────────────────────────────────

#[test]
fn serializes_one_subtree() {
    let mut layout = layout(
        json!([
            {"type": "block", "hash": "b1", "children": [{"type": "button", "hash": "__w"}]},
            {"type": "block", "hash": "__b2"}
        ]),
        SerializationState::Default,
    );
    let b1 = layout.node_by_hash("b1").unwrap();

    let rendered = SerializationState::Persisting.serialize_entity(&mut layout, b1).unwrap();
    assert_eq!(rendered["hash"], json!("b1"));
    assert!(!Hash::from(rendered["children"][0]["hash"].as_str().unwrap()).is_draft());
    // Nodes outside the subtree keep their drafts.
    assert!(layout.find_entity_by_hash("__b2").is_some());
}

// ── Validation ────────────────────────────────────────────────────

#[test]
fn undeclared_and_null_props_pass_validation() {
    let definitions = factory();
    let button = definitions.definitions().fetch("button").unwrap();
    let props = json!({"text": null, "unknown": [1, 2], "size": 4});
    validate_props(&button, &Hash::from("w1"), props.as_object().unwrap()).unwrap();
}

use pagegrid_definition::{DefinitionError, DefinitionProvider, EntityKind, StaticDefinitionSource};
use pagegrid_model::{LayoutObjectFactory, ModelError, SerializationState};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

fn factory() -> LayoutObjectFactory {
    let source = StaticDefinitionSource::new([
        r#"{"name": "button", "type": "WIDGET", "properties": [{"name": "text", "type": "STRING"}]}"#,
        r#"{"name": "list", "type": "WIDGET", "containsChildren": true}"#,
        r#"{"name": "list-item", "type": "WIDGET_ITEM", "properties": [{"name": "label", "type": "STRING"}]}"#,
        r#"{"name": "block", "type": "BLOCK"}"#,
        r#"{"name": "column", "type": "COLUMN"}"#,
    ]);
    LayoutObjectFactory::new(Arc::new(DefinitionProvider::new(source)))
}

fn hydrate(document: Value) -> Result<pagegrid_model::LayoutObject, ModelError> {
    factory().create_layout_object(&document, Some("home".into()), SerializationState::Default)
}

// ── Hydration ─────────────────────────────────────────────────────

#[test]
fn hydrates_nested_document() {
    let layout = hydrate(json!([
        {"type": "block", "hash": "b1", "children": [
            {"type": "column", "hash": "c1", "children": [
                {"type": "widget", "widgetType": "button", "hash": "w1"}
            ]}
        ]}
    ]))
    .unwrap();

    assert_eq!(layout.name(), Some("home"));
    assert_eq!(layout.len(), 3);
    assert_eq!(
        layout.hashes().iter().map(|h| h.as_str()).collect::<Vec<_>>(),
        vec!["b1", "c1", "w1"]
    );

    let button = layout.find_entity_by_hash("w1").unwrap();
    assert_eq!(button.node_type(), "widget");
    assert_eq!(button.definition().name(), "button");
    assert_eq!(button.kind(), EntityKind::Widget);
    assert_eq!(button.discriminator(), "button");
    assert!(button.children().is_none());
    assert_eq!(button.root(), Some(layout.id()));

    let column = layout.node_by_hash("c1").unwrap();
    assert_eq!(button.parent(), Some(column));
}

#[test]
fn every_collection_references_its_layout() {
    let layout = hydrate(json!([
        {"type": "block", "hash": "b1", "children": [{"type": "column", "hash": "c1"}]},
        {"type": "block", "hash": "b2"}
    ]))
    .unwrap();

    assert_eq!(layout.tree().reference(), Some(layout.id()));
    for node in layout.preorder() {
        let entity = layout.entity(node).unwrap();
        assert_eq!(entity.root(), Some(layout.id()));
        if let Some(children) = entity.children() {
            assert_eq!(children.reference(), Some(layout.id()));
        }
    }
}

#[test]
fn copies_properties_except_reserved_fields() {
    let layout = hydrate(json!([
        {"type": "button", "hash": "w1", "params": {"css": {"color": "red"}}, "extra": 3}
    ]))
    .unwrap();

    let button = layout.find_entity_by_hash("w1").unwrap();
    assert_eq!(button.property("extra"), Some(&json!(3)));
    assert_eq!(button.css(), Some(&json!({"color": "red"})));
    assert!(button.property("type").is_none());
    assert!(button.property("hash").is_none());
}

#[test]
fn widget_item_discriminator_selects_definition() {
    let layout = hydrate(json!([
        {"type": "widget", "widgetType": "list", "hash": "l1", "children": [
            {"type": "widgetItem", "widgetItemType": "list-item", "hash": "i1"}
        ]}
    ]))
    .unwrap();

    let item = layout.find_entity_by_hash("i1").unwrap();
    assert_eq!(item.kind(), EntityKind::WidgetItem);
    assert_eq!(item.discriminator(), "list-item");
}

#[test]
fn children_of_childless_node_are_dropped() {
    let layout = hydrate(json!([
        {"type": "button", "hash": "w1", "children": [{"type": "button", "hash": "w2"}]}
    ]))
    .unwrap();

    assert_eq!(layout.len(), 1);
    assert!(layout.find_entity_by_hash("w2").is_none());
}

#[test]
fn grid_without_children_key_gets_empty_collection() {
    let layout = hydrate(json!([{"type": "block", "hash": "b1"}])).unwrap();
    let block = layout.find_entity_by_hash("b1").unwrap();
    assert!(block.children().unwrap().is_empty());
}

#[test]
fn empty_document_is_valid() {
    let layout = hydrate(json!([])).unwrap();
    assert!(layout.is_empty());
    assert!(layout.tree().is_empty());
}

#[test]
fn parses_from_string() {
    let layout = factory()
        .create_from_str(r#"[{"type": "button", "hash": "w1"}]"#, None, SerializationState::Fetched)
        .unwrap();
    assert_eq!(layout.state(), SerializationState::Fetched);
    assert!(layout.name().is_none());
}

// ── Rejected input ────────────────────────────────────────────────

#[test]
fn missing_type_is_rejected() {
    let err = hydrate(json!([{"hash": "w1"}])).unwrap_err();
    assert!(matches!(err, ModelError::MissingTypeIdentifier));
}

#[test]
fn non_string_type_is_rejected() {
    let err = hydrate(json!([{"type": 7, "hash": "w1"}])).unwrap_err();
    assert!(matches!(err, ModelError::InvalidEntityType { source: None, .. }));
}

#[test]
fn unknown_type_wraps_definition_error() {
    let err = hydrate(json!([{"type": "carousel", "hash": "w1"}])).unwrap_err();
    match err {
        ModelError::InvalidEntityType {
            entity_type,
            source: Some(DefinitionError::NotFound(name)),
        } => {
            assert_eq!(entity_type, "carousel");
            assert_eq!(name, "carousel");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_or_empty_hash_is_rejected() {
    for node in [json!({"type": "button"}), json!({"type": "button", "hash": ""}), json!({"type": "button", "hash": 4})] {
        let err = hydrate(json!([node])).unwrap_err();
        assert!(matches!(err, ModelError::InvalidEntityHash { ref entity_type } if entity_type == "button"));
    }
}

#[test]
fn duplicate_hash_is_rejected() {
    let err = hydrate(json!([
        {"type": "block", "hash": "x", "children": [{"type": "column", "hash": "x"}]}
    ]))
    .unwrap_err();
    assert!(matches!(err, ModelError::DuplicateHash(ref h) if h.as_str() == "x"));
}

#[test]
fn non_array_document_is_rejected() {
    let err = hydrate(json!({"type": "block", "hash": "b1"})).unwrap_err();
    assert!(matches!(err, ModelError::MalformedDocument(_)));
}

#[test]
fn malformed_nodes_are_rejected() {
    let err = hydrate(json!(["block"])).unwrap_err();
    assert!(matches!(err, ModelError::MalformedNode(_)));

    let err = hydrate(json!([{"type": "block", "hash": "b1", "children": {"a": 1}}])).unwrap_err();
    assert!(matches!(err, ModelError::MalformedNode(_)));
}

// ── Round trip ────────────────────────────────────────────────────

#[test]
fn default_state_reproduces_structure() {
    let document = json!([
        {"type": "block", "hash": "b1", "children": [
            {"type": "column", "hash": "c1", "children": [
                {"type": "widget", "widgetType": "button", "hash": "w1"},
                {"type": "widget", "widgetType": "list", "hash": "l1", "children": [
                    {"type": "widgetItem", "widgetItemType": "list-item", "hash": "i1"}
                ]}
            ]}
        ]},
        {"type": "block", "hash": "b2", "children": []}
    ]);

    let mut layout = hydrate(document.clone()).unwrap();
    assert_eq!(layout.serialize().unwrap(), document);
}

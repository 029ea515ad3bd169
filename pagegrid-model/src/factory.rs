//! Hydration of wire documents into layouts.

use crate::{Entity, LayoutObject, ModelError, ModelResult, NodeId, SerializationState};
use pagegrid_definition::DefinitionProvider;
use pagegrid_types::Hash;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

// Wire fields handled by the factory itself rather than copied as properties.
const RESERVED_FIELDS: [&str; 3] = ["type", "hash", "children"];

// Discriminators checked before `type`, most specific first.
const DISCRIMINATOR_FIELDS: [&str; 2] = ["widgetItemType", "widgetType"];

/// Builds [`LayoutObject`]s from wire JSON, resolving node definitions
/// through a shared [`DefinitionProvider`].
#[derive(Debug, Clone)]
pub struct LayoutObjectFactory {
    definitions: Arc<DefinitionProvider>,
}

impl LayoutObjectFactory {
    pub fn new(definitions: Arc<DefinitionProvider>) -> Self {
        Self { definitions }
    }

    pub fn definitions(&self) -> &Arc<DefinitionProvider> {
        &self.definitions
    }

    /// Hydrates a document (a JSON array of nodes) into a layout.
    pub fn create_layout_object(
        &self,
        document: &Value,
        name: Option<String>,
        state: SerializationState,
    ) -> ModelResult<LayoutObject> {
        let nodes = document.as_array().ok_or_else(|| {
            ModelError::MalformedDocument(format!(
                "expected an array of nodes, found {}",
                json_type(document)
            ))
        })?;

        let mut layout = LayoutObject::new(name, state);
        for node in nodes {
            self.hydrate(&mut layout, None, node)?;
        }
        layout.rebuild_hash_index()?;
        debug!(name = layout.name(), nodes = layout.len(), ?state, "hydrated layout");
        Ok(layout)
    }

    /// Parses `raw` and hydrates it, see [`create_layout_object`](Self::create_layout_object).
    pub fn create_from_str(
        &self,
        raw: &str,
        name: Option<String>,
        state: SerializationState,
    ) -> ModelResult<LayoutObject> {
        let document: Value = serde_json::from_str(raw)?;
        self.create_layout_object(&document, name, state)
    }

    /// Builds a single detached entity from a wire node, ignoring its children.
    pub fn create_entity(&self, node: &Value) -> ModelResult<Entity> {
        let object = node
            .as_object()
            .ok_or_else(|| ModelError::MalformedNode(format!("expected an object, found {}", json_type(node))))?;
        self.build_entity(object)
    }

    fn hydrate(&self, layout: &mut LayoutObject, parent: Option<NodeId>, node: &Value) -> ModelResult<NodeId> {
        let object = node
            .as_object()
            .ok_or_else(|| ModelError::MalformedNode(format!("expected an object, found {}", json_type(node))))?;
        let entity = self.build_entity(object)?;
        let hash = entity.hash().clone();
        let allows_children = entity.contains_children();
        let id = layout.attach(parent, entity)?;

        match object.get("children") {
            None | Some(Value::Null) => {}
            Some(Value::Array(children)) if allows_children => {
                for child in children {
                    self.hydrate(layout, Some(id), child)?;
                }
            }
            Some(Value::Array(children)) => {
                if !children.is_empty() {
                    warn!(%hash, dropped = children.len(), "node type does not allow children, dropping them");
                }
            }
            Some(other) => {
                return Err(ModelError::MalformedNode(format!(
                    "children of entity {hash} must be an array, found {}",
                    json_type(other)
                )));
            }
        }
        Ok(id)
    }

    fn build_entity(&self, object: &Map<String, Value>) -> ModelResult<Entity> {
        let node_type = match object.get("type") {
            None | Some(Value::Null) => return Err(ModelError::MissingTypeIdentifier),
            Some(Value::String(s)) if s.is_empty() => return Err(ModelError::MissingTypeIdentifier),
            Some(Value::String(s)) => s.as_str(),
            Some(other) => {
                return Err(ModelError::InvalidEntityType {
                    entity_type: other.to_string(),
                    source: None,
                });
            }
        };

        let key = definition_key(object, node_type);
        let definition = self
            .definitions
            .fetch(key)
            .map_err(|e| ModelError::InvalidEntityType {
                entity_type: key.to_string(),
                source: Some(e),
            })?;

        let hash = match object.get("hash") {
            Some(Value::String(h)) if !h.is_empty() => Hash::new(h.as_str()),
            _ => {
                return Err(ModelError::InvalidEntityHash {
                    entity_type: node_type.to_string(),
                });
            }
        };

        let properties = object
            .iter()
            .filter(|(field, _)| !RESERVED_FIELDS.contains(&field.as_str()))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();

        Ok(Entity::new(node_type, hash, definition).with_properties(properties))
    }
}

/// Name of the definition a node resolves to.
fn definition_key<'a>(object: &'a Map<String, Value>, node_type: &'a str) -> &'a str {
    DISCRIMINATOR_FIELDS
        .iter()
        .find_map(|field| object.get(*field).and_then(Value::as_str).filter(|s| !s.is_empty()))
        .unwrap_or(node_type)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

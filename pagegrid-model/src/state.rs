//! Serialization states of a layout.

use crate::{Entity, LayoutObject, ModelError, ModelResult, NodeId};
use pagegrid_definition::Definition;
use pagegrid_types::{ContentMap, ContentRecord, Hash};
use serde_json::{Map, Value};

/// How a layout renders itself back to wire JSON.
///
/// Every state emits `type`, `hash`, the `widgetType` / `widgetItemType`
/// discriminator of widget nodes, and `children` for nodes whose definition
/// allows them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SerializationState {
    /// Structure only.
    #[default]
    Default,
    /// Structure plus `params.css`, `params.validation` and the stored
    /// content of each node as `params.props`.
    Fetched,
    /// Promotes draft hashes, moves `params.props` into the layout's
    /// content map, and emits the remaining params.
    Persisting,
}

impl SerializationState {
    /// Renders the subtree rooted at `node`.
    ///
    /// In `Persisting`, the props of the whole subtree are validated and
    /// its drafts promoted before anything is rendered. A validation failure
    /// leaves the layout untouched.
    pub fn serialize_entity(self, layout: &mut LayoutObject, node: NodeId) -> ModelResult<Value> {
        if layout.entity(node).is_none() {
            return Err(ModelError::UnknownNode(node));
        }
        if self == Self::Persisting {
            let subtree = layout.subtree(node);
            check_persisted_props(layout, &subtree)?;
            layout.promote_drafts(&subtree)?;
        }
        let mut renderer = Renderer {
            nodes: &layout.nodes,
            contents: &mut layout.contents,
            state: self,
        };
        renderer.render(node)
    }

    pub(crate) fn serialize_tree(self, layout: &mut LayoutObject) -> ModelResult<Value> {
        if self == Self::Persisting {
            let all = layout.preorder();
            check_persisted_props(layout, &all)?;
            layout.promote_drafts(&all)?;
        }
        let LayoutObject {
            nodes,
            contents,
            tree,
            ..
        } = layout;
        let mut renderer = Renderer {
            nodes,
            contents,
            state: self,
        };
        let rendered = tree
            .iter()
            .map(|node| renderer.render(node))
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(Value::Array(rendered))
    }
}

fn check_persisted_props(layout: &LayoutObject, nodes: &[NodeId]) -> ModelResult<()> {
    for &node in nodes {
        let entity = layout.entity(node).ok_or(ModelError::UnknownNode(node))?;
        if let Some(params) = entity.params() {
            persisted_props(entity, params.get("props"))?;
        }
    }
    Ok(())
}

// The `params.props` object to store for `entity`, validated.
fn persisted_props<'v>(entity: &Entity, props: Option<&'v Value>) -> ModelResult<Option<&'v Map<String, Value>>> {
    match props {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(props)) => {
            validate_props(entity.definition(), entity.hash(), props)?;
            Ok(Some(props))
        }
        Some(_) => Err(ModelError::MalformedNode(format!(
            "params.props of entity {} must be an object",
            entity.hash()
        ))),
    }
}

// Splits the layout borrow: the arena is read while the content map is
// written by `Persisting`.
struct Renderer<'a> {
    nodes: &'a [Option<Entity>],
    contents: &'a mut ContentMap,
    state: SerializationState,
}

impl Renderer<'_> {
    fn render(&mut self, node: NodeId) -> ModelResult<Value> {
        let nodes = self.nodes;
        let entity = nodes
            .get(node.0)
            .and_then(Option::as_ref)
            .ok_or(ModelError::UnknownNode(node))?;

        let mut data = Map::new();
        data.insert("type".into(), Value::String(entity.node_type().to_string()));
        data.insert("hash".into(), Value::String(entity.hash().to_string()));
        if let Some(key) = entity.kind().discriminator_key() {
            data.insert(key.into(), Value::String(entity.discriminator().to_string()));
        }

        let params = match self.state {
            SerializationState::Default => Map::new(),
            SerializationState::Fetched => self.fetched_params(entity)?,
            SerializationState::Persisting => self.persisting_params(entity)?,
        };
        if !params.is_empty() {
            data.insert("params".into(), Value::Object(params));
        }

        if let Some(children) = entity.children() {
            let rendered = children
                .iter()
                .map(|child| self.render(child))
                .collect::<ModelResult<Vec<_>>>()?;
            data.insert("children".into(), Value::Array(rendered));
        }
        Ok(Value::Object(data))
    }

    fn fetched_params(&self, entity: &Entity) -> ModelResult<Map<String, Value>> {
        let mut params = Map::new();
        if let Some(css) = entity.css() {
            params.insert("css".into(), css.clone());
        }
        if let Some(rules) = entity.validation_rules() {
            params.insert("validation".into(), rules.clone());
        }
        if let Some(record) = self.contents.get(entity.hash().as_str()) {
            if !record.is_empty() {
                if let Some(props) = record.payload.as_object() {
                    validate_props(entity.definition(), entity.hash(), props)?;
                }
                params.insert("props".into(), record.payload.clone());
            }
        }
        Ok(params)
    }

    fn persisting_params(&mut self, entity: &Entity) -> ModelResult<Map<String, Value>> {
        let mut params = entity.params().cloned().unwrap_or_default();
        let props = params.remove("props");
        if let Some(props) = persisted_props(entity, props.as_ref())? {
            self.contents
                .insert(ContentRecord::new(entity.hash().clone(), Value::Object(props.clone())));
        }
        params.retain(|_, value| !value.is_null());
        Ok(params)
    }
}

/// Checks content properties against the definition's declared types.
///
/// Properties the definition does not declare, and null values, pass.
pub fn validate_props(definition: &Definition, hash: &Hash, props: &Map<String, Value>) -> ModelResult<()> {
    for (name, value) in props {
        if value.is_null() {
            continue;
        }
        let Some(property) = definition.property(name) else {
            continue;
        };
        if !property.scalar_type.matches(value) {
            return Err(ModelError::Validation {
                hash: hash.clone(),
                property: name.clone(),
                expected: property.scalar_type.keyword(),
            });
        }
    }
    Ok(())
}

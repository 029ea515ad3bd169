use crate::ReferenceAwareCollection;
use pagegrid_definition::{Definition, EntityKind};
use pagegrid_types::Hash;
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Index of an entity in its layout's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identity of one [`LayoutObject`](crate::LayoutObject) instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutId(Uuid);

impl LayoutId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

/// One node of a layout document.
///
/// Capabilities come from the shared [`Definition`]: an entity has a
/// children collection iff its definition allows children.
#[derive(Debug, Clone)]
pub struct Entity {
    node_type: String,
    hash: Hash,
    definition: Arc<Definition>,
    properties: Map<String, Value>,
    pub(crate) children: Option<ReferenceAwareCollection>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) root: Option<LayoutId>,
}

impl Entity {
    /// Creates a detached entity. It gets its root once inserted into a layout.
    pub fn new(node_type: impl Into<String>, hash: impl Into<Hash>, definition: Arc<Definition>) -> Self {
        let children = definition
            .contains_children()
            .then(ReferenceAwareCollection::detached);
        Self {
            node_type: node_type.into(),
            hash: hash.into(),
            definition,
            properties: Map::new(),
            children,
            parent: None,
            root: None,
        }
    }

    #[must_use]
    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    /// Wire `type` of the node.
    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    // Hash changes go through the layout so the hash index stays in sync.
    pub(crate) fn set_hash(&mut self, hash: Hash) {
        self.hash = hash;
    }

    pub fn definition(&self) -> &Arc<Definition> {
        &self.definition
    }

    pub fn kind(&self) -> EntityKind {
        self.definition.kind()
    }

    pub fn contains_children(&self) -> bool {
        self.definition.contains_children()
    }

    pub fn contains_validation(&self) -> bool {
        self.definition.contains_validation()
    }

    /// Wire fields other than `type`, `hash` and `children`.
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.properties.insert(name.into(), value)
    }

    /// The `params` bucket, if it is an object.
    pub fn params(&self) -> Option<&Map<String, Value>> {
        self.properties.get("params").and_then(Value::as_object)
    }

    /// Inline content, `params.props`.
    pub fn props(&self) -> Option<&Value> {
        self.params().and_then(|p| p.get("props"))
    }

    pub fn css(&self) -> Option<&Value> {
        self.params().and_then(|p| p.get("css"))
    }

    /// Client-side validation ruleset, only meaningful for validation-capable definitions.
    pub fn validation_rules(&self) -> Option<&Value> {
        if !self.contains_validation() {
            return None;
        }
        self.params().and_then(|p| p.get("validation"))
    }

    /// Concrete widget or widget-item type.
    ///
    /// Taken from the `widgetType` / `widgetItemType` wire field when set,
    /// otherwise the definition name.
    pub fn discriminator(&self) -> &str {
        self.kind()
            .discriminator_key()
            .and_then(|key| self.properties.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.definition.name())
    }

    pub fn children(&self) -> Option<&ReferenceAwareCollection> {
        self.children.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The layout this entity belongs to, `None` while detached.
    pub fn root(&self) -> Option<LayoutId> {
        self.root
    }
}

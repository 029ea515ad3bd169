use crate::{Entity, LayoutId, ModelError, ModelResult, NodeId, ReferenceAwareCollection, SerializationState};
use pagegrid_types::{ContentMap, Hash};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Aggregate root of one layout document.
///
/// Owns every entity of the document in an arena, the top-level `tree`,
/// a hash index covering every live entity, the language-resolved content
/// of the nodes, and the serialization state used to render the document.
#[derive(Debug, Clone)]
pub struct LayoutObject {
    id: LayoutId,
    name: Option<String>,
    pub(crate) nodes: Vec<Option<Entity>>,
    pub(crate) tree: ReferenceAwareCollection,
    hash_index: HashMap<Hash, NodeId>,
    pub(crate) contents: ContentMap,
    state: SerializationState,
}

impl LayoutObject {
    /// Creates an empty layout.
    pub fn new(name: Option<String>, state: SerializationState) -> Self {
        let id = LayoutId::new();
        Self {
            id,
            name,
            nodes: Vec::new(),
            tree: ReferenceAwareCollection::new(id),
            hash_index: HashMap::new(),
            contents: ContentMap::new(),
            state,
        }
    }

    pub fn id(&self) -> LayoutId {
        self.id
    }

    /// Document identity, the name it is stored under.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn state(&self) -> SerializationState {
        self.state
    }

    pub fn set_state(&mut self, state: SerializationState) {
        self.state = state;
    }

    /// Top-level nodes.
    pub fn tree(&self) -> &ReferenceAwareCollection {
        &self.tree
    }

    pub fn contents(&self) -> &ContentMap {
        &self.contents
    }

    pub fn contents_mut(&mut self) -> &mut ContentMap {
        &mut self.contents
    }

    pub fn set_contents(&mut self, contents: ContentMap) {
        self.contents = contents;
    }

    pub fn take_contents(&mut self) -> ContentMap {
        std::mem::take(&mut self.contents)
    }

    pub fn entity(&self, node: NodeId) -> Option<&Entity> {
        self.nodes.get(node.0).and_then(Option::as_ref)
    }

    pub fn entity_mut(&mut self, node: NodeId) -> Option<&mut Entity> {
        self.nodes.get_mut(node.0).and_then(Option::as_mut)
    }

    pub fn node_by_hash(&self, hash: &str) -> Option<NodeId> {
        self.hash_index.get(hash).copied()
    }

    pub fn find_entity_by_hash(&self, hash: &str) -> Option<&Entity> {
        self.node_by_hash(hash).and_then(|node| self.entity(node))
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Every node id in document order (pre-order, depth first).
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.tree.iter().rev().collect();
        while let Some(node) = stack.pop() {
            order.push(node);
            if let Some(children) = self.entity(node).and_then(Entity::children) {
                stack.extend(children.as_slice().iter().rev());
            }
        }
        order
    }

    /// Hashes of every node in document order.
    pub fn hashes(&self) -> Vec<Hash> {
        self.preorder()
            .into_iter()
            .filter_map(|node| self.entity(node))
            .map(|entity| entity.hash().clone())
            .collect()
    }

    /// Children of `parent`, or the top-level tree for `None`.
    pub fn children_of(&self, parent: Option<NodeId>) -> ModelResult<&ReferenceAwareCollection> {
        match parent {
            None => Ok(&self.tree),
            Some(node) => {
                let entity = self.entity(node).ok_or(ModelError::UnknownNode(node))?;
                entity
                    .children
                    .as_ref()
                    .ok_or_else(|| ModelError::ChildrenNotSupported(entity.hash().clone()))
            }
        }
    }

    fn children_mut(&mut self, parent: Option<NodeId>) -> ModelResult<&mut ReferenceAwareCollection> {
        match parent {
            None => Ok(&mut self.tree),
            Some(node) => {
                let entity = self
                    .nodes
                    .get_mut(node.0)
                    .and_then(Option::as_mut)
                    .ok_or(ModelError::UnknownNode(node))?;
                let hash = entity.hash().clone();
                entity
                    .children
                    .as_mut()
                    .ok_or(ModelError::ChildrenNotSupported(hash))
            }
        }
    }

    /// Appends a detached entity under `parent` (`None` for the top level).
    ///
    /// The entity is inserted without children; its root becomes this layout.
    pub fn append(&mut self, parent: Option<NodeId>, entity: Entity) -> ModelResult<NodeId> {
        self.ensure_unique(entity.hash(), &[])?;
        let node = self.attach(parent, entity)?;
        self.rebuild_hash_index()?;
        Ok(node)
    }

    /// Replaces the child at `index` of `parent`, returning the replaced entity.
    ///
    /// The replaced entity's descendants are dropped from the layout.
    pub fn set(&mut self, parent: Option<NodeId>, index: usize, entity: Entity) -> ModelResult<Entity> {
        let collection = self.children_of(parent)?;
        let old = collection.get(index).ok_or(ModelError::IndexOutOfBounds {
            index,
            len: collection.len(),
        })?;
        let replaced = self.subtree(old);
        self.ensure_unique(entity.hash(), &replaced)?;

        let node = self.store(parent, entity);
        self.children_mut(parent)?.replace(index, node);
        let removed = self.release(&replaced);
        self.rebuild_hash_index()?;
        removed.ok_or(ModelError::UnknownNode(old))
    }

    /// Removes the child at `index` of `parent` together with its descendants.
    pub fn remove(&mut self, parent: Option<NodeId>, index: usize) -> ModelResult<Entity> {
        let collection = self.children_mut(parent)?;
        if index >= collection.len() {
            return Err(ModelError::IndexOutOfBounds {
                index,
                len: collection.len(),
            });
        }
        let old = collection.remove(index);
        let removed = self.subtree(old);
        let entity = self.release(&removed);
        self.rebuild_hash_index()?;
        entity.ok_or(ModelError::UnknownNode(old))
    }

    /// Changes the hash of a node, keeping the index in sync.
    pub fn set_hash(&mut self, node: NodeId, hash: Hash) -> ModelResult<()> {
        self.ensure_unique(&hash, &[node])?;
        self.entity_mut(node)
            .ok_or(ModelError::UnknownNode(node))?
            .set_hash(hash);
        self.rebuild_hash_index()
    }

    /// Replaces every draft hash among `nodes` with a generated one.
    ///
    /// Returns `(draft, promoted)` pairs.
    pub fn promote_drafts(&mut self, nodes: &[NodeId]) -> ModelResult<Vec<(Hash, Hash)>> {
        let mut promoted = Vec::new();
        for &node in nodes {
            let entity = self.entity_mut(node).ok_or(ModelError::UnknownNode(node))?;
            if entity.hash().is_draft() {
                let draft = entity.hash().clone();
                let stable = Hash::generate();
                entity.set_hash(stable.clone());
                debug!(%draft, %stable, "promoted draft hash");
                promoted.push((draft, stable));
            }
        }
        if !promoted.is_empty() {
            self.rebuild_hash_index()?;
        }
        Ok(promoted)
    }

    /// Rebuilds the hash index from the tree, rejecting duplicate hashes.
    ///
    /// Entities with an empty hash are not indexed until they are promoted.
    /// On error the previous index is kept.
    pub fn rebuild_hash_index(&mut self) -> ModelResult<()> {
        let mut index = HashMap::with_capacity(self.nodes.len());
        for node in self.preorder() {
            let Some(entity) = self.entity(node) else {
                continue;
            };
            if entity.hash().as_str().is_empty() {
                continue;
            }
            if index.insert(entity.hash().clone(), node).is_some() {
                return Err(ModelError::DuplicateHash(entity.hash().clone()));
            }
        }
        self.hash_index = index;
        Ok(())
    }

    /// Renders the whole document in the current state.
    pub fn serialize(&mut self) -> ModelResult<Value> {
        let state = self.state;
        state.serialize_tree(self)
    }

    pub fn to_json_string(&mut self) -> ModelResult<String> {
        Ok(serde_json::to_string(&self.serialize()?)?)
    }

    /// `node` followed by all of its descendants, in pre-order.
    pub fn subtree(&self, node: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let Some(entity) = self.entity(current) else {
                continue;
            };
            order.push(current);
            if let Some(children) = entity.children() {
                stack.extend(children.as_slice().iter().rev());
            }
        }
        order
    }

    /// Stores the entity and links it under `parent`, without touching the index.
    pub(crate) fn attach(&mut self, parent: Option<NodeId>, entity: Entity) -> ModelResult<NodeId> {
        // Validate the parent before the entity enters the arena.
        self.children_of(parent)?;
        let node = self.store(parent, entity);
        self.children_mut(parent)?.push(node);
        Ok(node)
    }

    fn store(&mut self, parent: Option<NodeId>, mut entity: Entity) -> NodeId {
        let node = NodeId(self.nodes.len());
        entity.root = Some(self.id);
        entity.parent = parent;
        if entity.children.is_some() {
            entity.children = Some(ReferenceAwareCollection::new(self.id));
        }
        self.nodes.push(Some(entity));
        node
    }

    // Takes the given nodes out of the arena; returns the first one, detached.
    fn release(&mut self, nodes: &[NodeId]) -> Option<Entity> {
        let mut first = None;
        for (i, node) in nodes.iter().enumerate() {
            let taken = self.nodes.get_mut(node.0).and_then(Option::take);
            if i == 0 {
                first = taken;
            }
        }
        first.map(|mut entity| {
            entity.parent = None;
            entity.root = None;
            if entity.children.is_some() {
                entity.children = Some(ReferenceAwareCollection::detached());
            }
            entity
        })
    }

    fn ensure_unique(&self, hash: &Hash, exempt: &[NodeId]) -> ModelResult<()> {
        if hash.as_str().is_empty() {
            return Ok(());
        }
        match self.hash_index.get(hash) {
            Some(existing) if !exempt.contains(existing) => Err(ModelError::DuplicateHash(hash.clone())),
            _ => Ok(()),
        }
    }
}

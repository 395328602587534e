//! A small reference-counted entity/component graph used to describe a grammar.
//!
//! A [Tower] owns an arena of [Node]s. Nodes hold named/ordered children and a
//! set of typed [Component] attachments. A component's type is itself a node
//! handle, used only as a stable identity token; only one component of a given
//! type may live on a node at once.
mod component;
mod node;

pub use component::Component;
pub use node::{ChildSlot, Node};

use std::any::Any;
use std::collections::HashMap;

/// A handle into a [Tower] arena. Stable for the lifetime of the node; a
/// recycled slot carries a new generation so a stale handle is detected
/// rather than silently aliasing the new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    pub fn index(&self) -> usize {
        self.index
    }
}

pub type DestructorThunk = Box<dyn FnMut(&mut Tower, NodeId, &mut dyn Any)>;

/// Owning arena for a grammar's entity/component graph.
#[derive(Default)]
pub struct Tower {
    slots: Vec<Option<Node>>,
    generations: Vec<u32>,
    free: Vec<usize>,
}

impl Tower {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached node with a single strong reference.
    pub fn create(&mut self) -> NodeId {
        if let Some(index) = self.free.pop() {
            let generation = self.generations[index];
            self.slots[index] = Some(Node::new());
            NodeId { index, generation }
        } else {
            let index = self.slots.len();
            self.slots.push(Some(Node::new()));
            self.generations.push(0);
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    fn slot(&self, id: NodeId) -> Option<&Node> {
        if self.generations.get(id.index).copied() != Some(id.generation) {
            return None;
        }
        self.slots.get(id.index).and_then(|n| n.as_ref())
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.generations.get(id.index).copied() != Some(id.generation) {
            return None;
        }
        self.slots.get_mut(id.index).and_then(|n| n.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    pub fn ref_count(&self, id: NodeId) -> usize {
        self.slot(id).map_or(0, |n| n.ref_count)
    }

    pub fn add_ref(&mut self, id: NodeId) {
        if let Some(n) = self.slot_mut(id) {
            n.ref_count += 1;
        }
    }

    /// Release one reference. If the count reaches zero, runs component
    /// destructors (owner still alive) then releases children in index order
    /// and frees the slot.
    pub fn release(&mut self, id: NodeId) {
        let should_free = match self.slot_mut(id) {
            Some(n) => {
                n.ref_count -= 1;
                n.ref_count == 0
            }
            None => return,
        };
        if !should_free {
            return;
        }
        let mut components = match self.slot_mut(id) {
            Some(n) => std::mem::take(&mut n.components),
            None => return,
        };
        for component in components.iter_mut() {
            if let Some(mut thunk) = component.destructor.take() {
                thunk(self, id, component.payload.as_mut());
            }
        }
        let children: Vec<NodeId> = self
            .slot(id)
            .map(|n| n.children.iter().map(|c| c.node).collect())
            .unwrap_or_default();
        for child in children {
            self.release(child);
        }
        let index = id.index;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.slots[index] = None;
        self.free.push(index);
    }

    /// Attach `child` as a (possibly named) child of `parent`. Increments
    /// `child`'s reference count. Replacing a named slot detaches the prior
    /// occupant first.
    pub fn attach(&mut self, parent: NodeId, name: Option<&'static str>, child: NodeId) {
        if let Some(name) = name {
            let has_prior = self
                .slot(parent)
                .map_or(false, |n| n.named_child(name).is_some());
            if has_prior {
                self.detach_named(parent, name);
            }
        }
        self.add_ref(child);
        if let Some(n) = self.slot_mut(parent) {
            n.children.push(ChildSlot { name, node: child });
        }
    }

    pub fn detach_named(&mut self, parent: NodeId, name: &'static str) -> Option<NodeId> {
        let position = self
            .slot(parent)?
            .children
            .iter()
            .position(|c| c.name == Some(name))?;
        let removed = self.slot_mut(parent)?.children.remove(position);
        self.release(removed.node);
        Some(removed.node)
    }

    pub fn child_count(&self, id: NodeId) -> usize {
        self.slot(id).map_or(0, |n| n.children.len())
    }

    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.slot(id)?.children.get(index).map(|c| c.node)
    }

    pub fn named_child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.slot(id)?.named_child(name).map(|c| c.node)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.slot(id)
            .into_iter()
            .flat_map(|n| n.children.iter().map(|c| c.node))
    }

    /// Create (or fetch) the component of the given `type_id` on `id`.
    /// Creation is idempotent: a second call with the same type returns the
    /// existing component's payload slot without re-running `make`.
    pub fn create_component<T: Any>(
        &mut self,
        id: NodeId,
        type_id: NodeId,
        make: impl FnOnce() -> T,
        destructor: Option<DestructorThunk>,
    ) -> &mut T {
        let exists = self
            .slot(id)
            .map_or(false, |n| n.components.iter().any(|c| c.type_id == type_id));
        if !exists {
            self.add_ref(type_id);
            let n = self.slot_mut(id).expect("create_component on dead node");
            n.components.push(Component {
                type_id,
                payload: Box::new(make()),
                destructor,
            });
        }
        let n = self.slot_mut(id).expect("create_component on dead node");
        let component = n
            .components
            .iter_mut()
            .find(|c| c.type_id == type_id)
            .unwrap();
        component
            .payload
            .downcast_mut::<T>()
            .expect("component type mismatch for reused type_id")
    }

    pub fn component<T: Any>(&self, id: NodeId, type_id: NodeId) -> Option<&T> {
        self.slot(id)?
            .components
            .iter()
            .find(|c| c.type_id == type_id)
            .and_then(|c| c.payload.downcast_ref::<T>())
    }

    pub fn component_mut<T: Any>(&mut self, id: NodeId, type_id: NodeId) -> Option<&mut T> {
        self.slot_mut(id)?
            .components
            .iter_mut()
            .find(|c| c.type_id == type_id)
            .and_then(|c| c.payload.downcast_mut::<T>())
    }

    pub fn has_component(&self, id: NodeId, type_id: NodeId) -> bool {
        self.slot(id)
            .map_or(false, |n| n.components.iter().any(|c| c.type_id == type_id))
    }

    pub fn live_node_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Total components attached across every live node. Used alongside
    /// [Tower::live_node_count] to check that a build released everything it
    /// allocated.
    pub fn live_component_count(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .map(|n| n.components.len())
            .sum()
    }
}

/// Lazily-created singleton "type" nodes used as component identity tokens.
/// Mirrors the teacher crate's `OnceCell`-backed lazy singleton fields.
#[derive(Default)]
pub struct TypeTokens {
    tokens: HashMap<&'static str, NodeId>,
}

impl TypeTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, tower: &mut Tower, name: &'static str) -> NodeId {
        if let Some(id) = self.tokens.get(name) {
            return *id;
        }
        let id = tower.create();
        self.tokens.insert(name, id);
        id
    }
}

use super::{Component, NodeId};

#[derive(Debug, Clone, Copy)]
pub struct ChildSlot {
    pub name: Option<&'static str>,
    pub node: NodeId,
}

pub struct Node {
    pub(super) ref_count: usize,
    pub(super) children: Vec<ChildSlot>,
    pub(super) components: Vec<Component>,
}

impl Node {
    pub fn new() -> Self {
        Self {
            ref_count: 1,
            children: Vec::new(),
            components: Vec::new(),
        }
    }

    pub fn named_child(&self, name: &str) -> Option<&ChildSlot> {
        self.children.iter().find(|c| c.name == Some(name))
    }
}

use super::{NodeId, Tower};
use std::any::Any;

pub struct Component {
    pub(super) type_id: NodeId,
    pub(super) payload: Box<dyn Any>,
    pub(super) destructor: Option<Box<dyn FnMut(&mut Tower, NodeId, &mut dyn Any)>>,
}

impl Component {
    pub fn type_id(&self) -> NodeId {
        self.type_id
    }
}

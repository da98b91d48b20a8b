//! A small element tree whose nodes are event targets and app hosts.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::error::DomError;
use crate::hub::EventHub;
use crate::window::DomEvent;

new_key_type! {
    pub struct NodeId;
}

struct Node {
    tag: String,
    id: Option<String>,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    target: Rc<EventHub<DomEvent>>,
}

pub struct Document {
    nodes: RefCell<SlotMap<NodeId, Node>>,
    body: NodeId,
    hosts: RefCell<HashSet<NodeId>>,
}

impl Document {
    pub fn new() -> Rc<Self> {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(Node::new("body"));
        Rc::new(Self {
            nodes: RefCell::new(nodes),
            body,
            hosts: RefCell::new(HashSet::new()),
        })
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Creates a detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.nodes.borrow_mut().insert(Node::new(tag))
    }

    pub fn set_id(&self, node: NodeId, id: &str) -> Result<(), DomError> {
        let mut nodes = self.nodes.borrow_mut();
        let n = nodes.get_mut(node).ok_or(DomError::UnknownNode(node))?;
        n.id = Some(id.to_string());
        Ok(())
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.nodes.borrow().get(node).map(|n| n.tag.clone())
    }

    pub fn element_id(&self, node: NodeId) -> Option<String> {
        self.nodes.borrow().get(node).and_then(|n| n.id.clone())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow().get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .borrow()
            .get(node)
            .map(|n| n.children.to_vec())
            .unwrap_or_default()
    }

    /// Moves `child` under `parent` (detaching it from any previous parent)
    /// and returns `child`.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        let mut nodes = self.nodes.borrow_mut();
        if !nodes.contains_key(parent) {
            return Err(DomError::UnknownNode(parent));
        }
        if !nodes.contains_key(child) {
            return Err(DomError::UnknownNode(child));
        }

        // child may not be parent itself or one of its ancestors
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(DomError::HierarchyRequest { parent, child });
            }
            cursor = nodes[id].parent;
        }

        if let Some(old) = nodes[child].parent.take() {
            nodes[old].children.retain(|c| *c != child);
        }
        nodes[child].parent = Some(parent);
        nodes[parent].children.push(child);
        Ok(child)
    }

    pub fn remove_child(&self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        let mut nodes = self.nodes.borrow_mut();
        match nodes.get(child) {
            Some(n) if n.parent == Some(parent) => {}
            Some(_) => return Err(DomError::HierarchyRequest { parent, child }),
            None => return Err(DomError::UnknownNode(child)),
        }
        nodes[child].parent = None;
        nodes[parent].children.retain(|c| *c != child);
        Ok(child)
    }

    /// Whether `node` hangs off `body`.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == self.body {
                return true;
            }
            cursor = nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// First connected element in tree order matching `#id` or a tag name.
    pub fn query(&self, selector: &str) -> Option<NodeId> {
        let selector = selector.trim();
        if selector.is_empty() {
            return None;
        }
        let nodes = self.nodes.borrow();
        let matches = |n: &Node| match selector.strip_prefix('#') {
            Some(id) => n.id.as_deref() == Some(id),
            None => n.tag.eq_ignore_ascii_case(selector),
        };

        let mut stack = vec![self.body];
        while let Some(id) = stack.pop() {
            let node = &nodes[id];
            if matches(node) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// The listener list of `node`.
    pub fn target(&self, node: NodeId) -> Option<Rc<EventHub<DomEvent>>> {
        self.nodes.borrow().get(node).map(|n| n.target.clone())
    }

    /// Delivers `payload` to `node`, then to each ancestor in turn. Returns
    /// the number of listeners that ran.
    pub fn dispatch(
        &self,
        node: NodeId,
        event: &str,
        payload: &DomEvent,
    ) -> Result<usize, DomError> {
        let path: Vec<Rc<EventHub<DomEvent>>> = {
            let nodes = self.nodes.borrow();
            if !nodes.contains_key(node) {
                return Err(DomError::UnknownNode(node));
            }
            let mut path = Vec::new();
            let mut cursor = Some(node);
            while let Some(id) = cursor {
                path.push(nodes[id].target.clone());
                cursor = nodes[id].parent;
            }
            path
        };

        Ok(path.iter().map(|t| t.dispatch(event, payload)).sum())
    }

    pub(crate) fn claim_host(&self, node: NodeId) -> bool {
        self.hosts.borrow_mut().insert(node)
    }

    pub(crate) fn release_host(&self, node: NodeId) {
        self.hosts.borrow_mut().remove(&node);
    }

    pub fn is_host(&self, node: NodeId) -> bool {
        self.hosts.borrow().contains(&node)
    }
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            parent: None,
            children: SmallVec::new(),
            target: Rc::new(EventHub::new()),
        }
    }
}

//! The parser node base: flags, value slot, finish hook, and the arena the
//! schema tree lives in.

use crate::array::ArrayNode;
use crate::ignore::IgnoreNode;
use crate::leaf::LeafNode;
use crate::map::MapNode;
use crate::object::{ObjectNode, UnknownMember};
use crate::value::Value;

/// Handle of one parser node inside its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Result of a user hook; an `Err` message aborts the parse.
pub type HookResult = std::result::Result<(), String>;

/// Hook invoked when a node terminates with a value.
pub type FinishHook = Box<dyn FnMut(NodeRef<'_>) -> HookResult>;

/// Hook invoked for every key/value pair of a map.
pub type ElementHook = Box<dyn FnMut(&str, NodeRef<'_>) -> HookResult>;

/// Predicate checked after a scalar value lands and before its leaf
/// terminates.
pub type Validator = Box<dyn Fn(&Value) -> HookResult>;

pub(crate) struct Node {
    /// True until the node has observed an event contributing to a value.
    pub(crate) empty: bool,
    /// True after the node reached a terminal state with a value available.
    pub(crate) set: bool,
    /// The produced value, for leaves and storing containers.
    pub(crate) slot: Option<Value>,
    pub(crate) on_finish: Option<FinishHook>,
    pub(crate) kind: Kind,
}

impl Node {
    pub(crate) fn new(kind: Kind) -> Node {
        Node {
            empty: true,
            set: false,
            slot: None,
            on_finish: None,
            kind,
        }
    }
}

pub(crate) enum Kind {
    Leaf(LeafNode),
    Ignore(IgnoreNode),
    Array(ArrayNode),
    Object(ObjectNode),
    Map(MapNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KindTag {
    Leaf,
    Ignore,
    Array,
    Object,
    Map,
}

impl Kind {
    pub(crate) fn tag(&self) -> KindTag {
        match self {
            Kind::Leaf(_) => KindTag::Leaf,
            Kind::Ignore(_) => KindTag::Ignore,
            Kind::Array(_) => KindTag::Array,
            Kind::Object(_) => KindTag::Object,
            Kind::Map(_) => KindTag::Map,
        }
    }
}

/// The schema tree storage. Parent nodes reference their children by
/// [`NodeId`]; ids are minted here, so a child always precedes its parent
/// and the tree is cycle-free.
#[derive(Default)]
pub(crate) struct Nodes {
    nodes: Vec<Node>,
}

impl Nodes {
    pub(crate) fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub(crate) fn get(&self, id: NodeId) -> &Node {
        // Ids are minted by `add` and validated at the schema boundary.
        #[allow(clippy::indexing_slicing)]
        &self.nodes[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        #[allow(clippy::indexing_slicing)]
        &mut self.nodes[id.0]
    }

    /// Clear flags and storage of a subtree, keeping structure and hooks.
    pub(crate) fn reset(&mut self, id: NodeId) {
        let mut work = vec![id];
        while let Some(id) = work.pop() {
            let node = self.get_mut(id);
            node.empty = true;
            node.set = false;
            node.slot = None;
            match &mut node.kind {
                Kind::Leaf(_) => {}
                Kind::Ignore(ignore) => ignore.depth = 0,
                Kind::Array(array) => {
                    array.open = false;
                    array.index = 0;
                    array.values.clear();
                    work.push(array.child);
                }
                Kind::Object(object) => {
                    object.open = false;
                    for seen in &mut object.seen {
                        *seen = false;
                    }
                    if let UnknownMember::Ignore(ignore) = object.unknown {
                        work.push(ignore);
                    }
                    for member in &object.members {
                        work.push(member.child);
                    }
                }
                Kind::Map(map) => {
                    map.open = false;
                    map.current_key = None;
                    map.pairs.clear();
                    work.push(map.child);
                }
            }
        }
    }

    /// Terminal transition: a set node is by definition not empty.
    pub(crate) fn mark_terminal(&mut self, id: NodeId) {
        let node = self.get_mut(id);
        node.set = true;
        node.empty = false;
    }

    /// Move the value out, clearing the set flag.
    pub(crate) fn take_value(&mut self, id: NodeId) -> Option<Value> {
        let node = self.get_mut(id);
        if !node.set {
            return None;
        }
        node.set = false;
        node.slot.take()
    }
}

/// Read-only view of one node, handed to user callbacks and exposed by the
/// parser facade for extracting results.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    pub(crate) nodes: &'a Nodes,
    pub(crate) id: NodeId,
}

impl<'a> NodeRef<'a> {
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Whether the node has produced a terminal value this parse.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.nodes.get(self.id).set
    }

    /// Whether the node has seen no contributing event this parse.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.get(self.id).empty
    }

    /// The produced value of a leaf or storing container.
    #[must_use]
    pub fn value(&self) -> Option<&'a Value> {
        self.nodes.get(self.id).slot.as_ref()
    }

    /// Member view of a fixed-member object, by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<NodeRef<'a>> {
        let Kind::Object(object) = &self.nodes.get(self.id).kind else {
            return None;
        };
        let index = *object.by_name.get(name)?;
        self.member_at(index)
    }

    /// Member view of a fixed-member object, by declaration position.
    #[must_use]
    pub fn member_at(&self, index: usize) -> Option<NodeRef<'a>> {
        let Kind::Object(object) = &self.nodes.get(self.id).kind else {
            return None;
        };
        let member = object.members.get(index)?;
        Some(NodeRef {
            nodes: self.nodes,
            id: member.child,
        })
    }

    /// Element parser view of an array or map.
    #[must_use]
    pub fn child(&self) -> Option<NodeRef<'a>> {
        let id = match &self.nodes.get(self.id).kind {
            Kind::Array(array) => array.child,
            Kind::Map(map) => map.child,
            _ => return None,
        };
        Some(NodeRef {
            nodes: self.nodes,
            id,
        })
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        self.value().and_then(Value::as_int)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.value().and_then(Value::as_bool)
    }

    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        self.value().and_then(Value::as_double)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        self.value().and_then(Value::as_str)
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.nodes.get(self.id);
        write!(
            f,
            "NodeRef {{ id: {:?}, set: {:?}, empty: {:?}, value: {:?} }}",
            self.id, node.set, node.empty, node.slot
        )
    }
}

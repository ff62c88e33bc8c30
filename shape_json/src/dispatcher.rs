//! The runtime dispatcher: a stack of active parser nodes that every SAX
//! event is routed through.

use sax_json::Event;

use crate::error::{Error, ErrorKind, Result};
use crate::node::{KindTag, NodeId, NodeRef, Nodes};
use crate::{array, ignore, leaf, map, object};

/// What a node asks the dispatcher to do after processing one event.
pub(crate) enum Step {
    /// Keep the node on top; the next event is its too.
    Stay,
    /// Push a child; the next event goes to the child.
    Push { child: NodeId, seg: PathSeg },
    /// Push a child and deliver the current event to it. Used by arrays,
    /// where the element's first event is the one the array just saw.
    Delegate { child: NodeId, seg: PathSeg },
    /// The node reached its terminal state.
    Complete,
}

/// One segment of the document path, for error reporting.
pub(crate) enum PathSeg {
    Key(String),
    Index(usize),
}

pub(crate) struct Dispatcher {
    stack: Vec<NodeId>,
    /// One segment per stacked node below the root.
    path: Vec<PathSeg>,
    root: NodeId,
}

impl Dispatcher {
    pub(crate) fn new(root: NodeId) -> Dispatcher {
        Dispatcher {
            stack: vec![root],
            path: Vec::new(),
            root,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.stack.clear();
        self.stack.push(self.root);
        self.path.clear();
    }

    /// The root has completed and nothing is left on the stack.
    pub(crate) fn is_done(&self) -> bool {
        self.stack.is_empty()
    }

    /// Route one event to the top of the stack.
    pub(crate) fn dispatch(&mut self, nodes: &mut Nodes, event: &Event, index: usize) -> Result<()> {
        loop {
            let Some(&top) = self.stack.last() else {
                return Err(Error::new(ErrorKind::UnexpectedToken, index));
            };
            let step = route(nodes, top, event, index).map_err(|e| e.with_path(self.render_path()))?;
            match step {
                Step::Stay => return Ok(()),
                Step::Push { child, seg } => {
                    self.stack.push(child);
                    self.path.push(seg);
                    return Ok(());
                }
                Step::Delegate { child, seg } => {
                    self.stack.push(child);
                    self.path.push(seg);
                }
                Step::Complete => return self.complete(nodes, index),
            }
        }
    }

    /// Pop the completed node, notify its parent, then run its finish
    /// hook, in that order.
    fn complete(&mut self, nodes: &mut Nodes, index: usize) -> Result<()> {
        let done_path = self.render_path();
        let Some(done) = self.stack.pop() else {
            return Err(Error::internal(index, "completion with an empty stack"));
        };
        if !self.stack.is_empty() {
            self.path.pop();
        }
        nodes.mark_terminal(done);
        if let Some(&parent) = self.stack.last() {
            child_parsed(nodes, parent, done, index)
                .map_err(|e| e.with_path(done_path.clone()))?;
        }
        finish_node(nodes, done, index).map_err(|e| e.with_path(done_path))
    }

    fn render_path(&self) -> String {
        let mut out = String::new();
        for seg in &self.path {
            out.push('/');
            match seg {
                PathSeg::Key(key) => {
                    // JSON-pointer escaping: `~` then `/`.
                    out.push_str(&key.replace('~', "~0").replace('/', "~1"));
                }
                PathSeg::Index(index) => {
                    out.push_str(&index.to_string());
                }
            }
        }
        out
    }
}

fn route(nodes: &mut Nodes, id: NodeId, event: &Event, index: usize) -> Result<Step> {
    match nodes.get(id).kind.tag() {
        KindTag::Leaf => leaf::on_event(nodes, id, event, index),
        KindTag::Ignore => ignore::on_event(nodes, id, event, index),
        KindTag::Array => array::on_event(nodes, id, event, index),
        KindTag::Object => object::on_event(nodes, id, event, index),
        KindTag::Map => map::on_event(nodes, id, event, index),
    }
}

fn child_parsed(nodes: &mut Nodes, parent: NodeId, child: NodeId, index: usize) -> Result<()> {
    match nodes.get(parent).kind.tag() {
        KindTag::Array => array::child_parsed(nodes, parent, child, index),
        KindTag::Map => map::child_parsed(nodes, parent, child, index),
        // A member's value stays in its child until the object ends.
        KindTag::Object => Ok(()),
        KindTag::Leaf | KindTag::Ignore => {
            Err(Error::internal(index, "scalar parser cannot own a child"))
        }
    }
}

fn finish_node(nodes: &mut Nodes, id: NodeId, index: usize) -> Result<()> {
    let mut hook = nodes.get_mut(id).on_finish.take();
    let outcome = match &mut hook {
        Some(hook) => hook(NodeRef {
            nodes: &*nodes,
            id,
        }),
        None => Ok(()),
    };
    nodes.get_mut(id).on_finish = hook;
    outcome.map_err(|msg| Error::new(ErrorKind::CallbackFailed(msg), index))
}

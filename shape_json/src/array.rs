//! Array parsers, storing and non-storing.

use sax_json::Event;

use crate::dispatcher::{PathSeg, Step};
use crate::error::{Error, ErrorKind, Result};
use crate::node::{Kind, NodeId, Nodes};
use crate::value::Value;

pub(crate) struct ArrayNode {
    pub(crate) child: NodeId,
    /// Accumulate the children's popped values in input order.
    pub(crate) storing: bool,
    pub(crate) open: bool,
    /// Index of the element being parsed, for error paths.
    pub(crate) index: usize,
    pub(crate) values: Vec<Value>,
}

pub(crate) fn on_event(nodes: &mut Nodes, id: NodeId, event: &Event, index: usize) -> Result<Step> {
    let (open, child, element) = {
        let Kind::Array(array) = &nodes.get(id).kind else {
            return Err(Error::internal(index, "event routed to a non-array"));
        };
        (array.open, array.child, array.index)
    };

    if !open {
        return match event {
            Event::ArrayStart => {
                nodes.reset(id);
                let node = nodes.get_mut(id);
                node.empty = false;
                if let Kind::Array(array) = &mut node.kind {
                    array.open = true;
                }
                Ok(Step::Stay)
            }
            _ => Err(Error::new(
                ErrorKind::SchemaMismatch {
                    expected: "array",
                    found: event.kind(),
                },
                index,
            )),
        };
    }

    match event {
        Event::ArrayEnd => {
            let node = nodes.get_mut(id);
            if let Kind::Array(array) = &mut node.kind {
                array.open = false;
                let stored = array
                    .storing
                    .then(|| Value::Array(std::mem::take(&mut array.values)));
                if stored.is_some() {
                    node.slot = stored;
                }
            }
            Ok(Step::Complete)
        }
        Event::Key(_) => Err(Error::internal(index, "object key inside an array")),
        // Any other event starts the next element; it is delivered to the
        // freshly pushed element parser.
        _ => Ok(Step::Delegate {
            child,
            seg: PathSeg::Index(element),
        }),
    }
}

pub(crate) fn child_parsed(
    nodes: &mut Nodes,
    id: NodeId,
    child: NodeId,
    index: usize,
) -> Result<()> {
    let storing = {
        let Kind::Array(array) = &nodes.get(id).kind else {
            return Err(Error::internal(index, "child completion on a non-array"));
        };
        array.storing
    };
    if storing {
        let value = nodes
            .take_value(child)
            .ok_or_else(|| Error::internal(index, "storing array element has no value"))?;
        if let Kind::Array(array) = &mut nodes.get_mut(id).kind {
            array.values.push(value);
        }
    }
    if let Kind::Array(array) = &mut nodes.get_mut(id).kind {
        array.index += 1;
    }
    Ok(())
}

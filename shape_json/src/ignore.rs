//! Throwaway parser for values the schema does not care about.

use sax_json::Event;

use crate::dispatcher::Step;
use crate::error::{Error, Result};
use crate::node::{Kind, NodeId, Nodes};

/// Swallows one value of any shape by tracking nesting depth. Never
/// stores anything.
pub(crate) struct IgnoreNode {
    pub(crate) depth: usize,
}

pub(crate) fn on_event(nodes: &mut Nodes, id: NodeId, event: &Event, index: usize) -> Result<Step> {
    let node = nodes.get_mut(id);
    let Kind::Ignore(ignore) = &mut node.kind else {
        return Err(Error::internal(index, "event routed to a non-ignore"));
    };
    match event {
        Event::ObjectStart | Event::ArrayStart => {
            ignore.depth += 1;
            Ok(Step::Stay)
        }
        Event::ObjectEnd | Event::ArrayEnd => {
            ignore.depth = ignore
                .depth
                .checked_sub(1)
                .ok_or_else(|| Error::internal(index, "ignored subtree underflow"))?;
            if ignore.depth == 0 {
                Ok(Step::Complete)
            } else {
                Ok(Step::Stay)
            }
        }
        Event::Key(_) => Ok(Step::Stay),
        _ if ignore.depth == 0 => Ok(Step::Complete),
        _ => Ok(Step::Stay),
    }
}

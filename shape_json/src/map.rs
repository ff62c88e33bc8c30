//! Dynamic-key object parsers: every value goes through one shared child.

use sax_json::Event;

use crate::dispatcher::{PathSeg, Step};
use crate::error::{Error, ErrorKind, Result};
use crate::node::{ElementHook, Kind, NodeId, NodeRef, Nodes};
use crate::value::Value;

pub(crate) struct MapNode {
    pub(crate) child: NodeId,
    /// Accumulate `(key, value)` pairs in first-appearance order.
    pub(crate) storing: bool,
    pub(crate) open: bool,
    pub(crate) current_key: Option<String>,
    pub(crate) on_element: Option<ElementHook>,
    pub(crate) pairs: Vec<(String, Value)>,
}

pub(crate) fn on_event(nodes: &mut Nodes, id: NodeId, event: &Event, index: usize) -> Result<Step> {
    let open = {
        let Kind::Map(map) = &nodes.get(id).kind else {
            return Err(Error::internal(index, "event routed to a non-map"));
        };
        map.open
    };

    if !open {
        return match event {
            Event::ObjectStart => {
                nodes.reset(id);
                let node = nodes.get_mut(id);
                node.empty = false;
                if let Kind::Map(map) = &mut node.kind {
                    map.open = true;
                }
                Ok(Step::Stay)
            }
            _ => Err(Error::new(
                ErrorKind::SchemaMismatch {
                    expected: "object",
                    found: event.kind(),
                },
                index,
            )),
        };
    }

    match event {
        Event::Key(key) => {
            let node = nodes.get_mut(id);
            node.empty = false;
            let Kind::Map(map) = &mut node.kind else {
                return Err(Error::internal(index, "event routed to a non-map"));
            };
            map.current_key = Some(key.clone());
            Ok(Step::Push {
                child: map.child,
                seg: PathSeg::Key(key.clone()),
            })
        }
        Event::ObjectEnd => {
            let node = nodes.get_mut(id);
            if let Kind::Map(map) = &mut node.kind {
                map.open = false;
                let stored = map
                    .storing
                    .then(|| Value::Object(std::mem::take(&mut map.pairs)));
                if stored.is_some() {
                    node.slot = stored;
                }
            }
            Ok(Step::Complete)
        }
        _ => Err(Error::internal(index, "value event routed to a map")),
    }
}

/// A pair is complete: fire the element hook with the child still set,
/// then (storing variant) move the child's value into the pair list.
pub(crate) fn child_parsed(
    nodes: &mut Nodes,
    id: NodeId,
    child: NodeId,
    index: usize,
) -> Result<()> {
    let (mut hook, key, storing) = {
        let Kind::Map(map) = &mut nodes.get_mut(id).kind else {
            return Err(Error::internal(index, "child completion on a non-map"));
        };
        let key = map
            .current_key
            .clone()
            .ok_or_else(|| Error::internal(index, "map value completed without a key"))?;
        (map.on_element.take(), key, map.storing)
    };

    let outcome = match &mut hook {
        Some(hook) => hook(
            &key,
            NodeRef {
                nodes: &*nodes,
                id: child,
            },
        ),
        None => Ok(()),
    };
    if let Kind::Map(map) = &mut nodes.get_mut(id).kind {
        map.on_element = hook;
    }
    outcome.map_err(|msg| Error::new(ErrorKind::CallbackFailed(msg), index))?;

    if storing {
        let value = nodes
            .take_value(child)
            .ok_or_else(|| Error::internal(index, "storing map element has no value"))?;
        if let Kind::Map(map) = &mut nodes.get_mut(id).kind {
            map.pairs.push((key, value));
        }
    }
    Ok(())
}

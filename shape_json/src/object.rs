//! Fixed-member object parsers, plain and tuple (auto) variants.

use rustc_hash::FxHashMap;
use sax_json::Event;

use crate::dispatcher::{PathSeg, Step};
use crate::error::{Error, ErrorKind, Result};
use crate::node::{Kind, NodeId, Nodes};
use crate::value::Value;

pub(crate) struct MemberSlot {
    pub(crate) name: String,
    pub(crate) child: NodeId,
    pub(crate) optional: bool,
    /// Injected into the child when the member is absent at object end.
    pub(crate) default: Option<Value>,
}

/// How to react to a key outside the member table.
#[derive(Clone, Copy)]
pub(crate) enum UnknownMember {
    Error,
    /// Swallow the value through this dedicated ignore child.
    Ignore(NodeId),
}

pub(crate) struct ObjectNode {
    /// Declaration order; positional access depends on it.
    pub(crate) members: Vec<MemberSlot>,
    pub(crate) by_name: FxHashMap<String, usize>,
    pub(crate) seen: Vec<bool>,
    pub(crate) unknown: UnknownMember,
    /// Tuple variant: the node's own value is the members' values in
    /// declaration order, assembled at object end.
    pub(crate) auto: bool,
    pub(crate) open: bool,
}

pub(crate) fn on_event(nodes: &mut Nodes, id: NodeId, event: &Event, index: usize) -> Result<Step> {
    let open = {
        let Kind::Object(object) = &nodes.get(id).kind else {
            return Err(Error::internal(index, "event routed to a non-object"));
        };
        object.open
    };

    if !open {
        return match event {
            Event::ObjectStart => {
                nodes.reset(id);
                let node = nodes.get_mut(id);
                node.empty = false;
                if let Kind::Object(object) = &mut node.kind {
                    object.open = true;
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
        Event::Key(key) => on_key(nodes, id, key, index),
        Event::ObjectEnd => on_end(nodes, id, index),
        _ => Err(Error::internal(index, "value event routed to an object")),
    }
}

fn on_key(nodes: &mut Nodes, id: NodeId, key: &str, index: usize) -> Result<Step> {
    let node = nodes.get_mut(id);
    let Kind::Object(object) = &mut node.kind else {
        return Err(Error::internal(index, "event routed to a non-object"));
    };
    match object.by_name.get(key).copied() {
        Some(position) => {
            // A duplicate key re-parses the member; the last value wins.
            if let Some(seen) = object.seen.get_mut(position) {
                *seen = true;
            }
            let child = object
                .members
                .get(position)
                .map(|member| member.child)
                .ok_or_else(|| Error::internal(index, "member table out of sync"))?;
            Ok(Step::Push {
                child,
                seg: PathSeg::Key(key.to_string()),
            })
        }
        None => match object.unknown {
            UnknownMember::Error => {
                Err(Error::new(ErrorKind::UnknownKey(key.to_string()), index))
            }
            UnknownMember::Ignore(ignore) => Ok(Step::Push {
                child: ignore,
                seg: PathSeg::Key(key.to_string()),
            }),
        },
    }
}

/// Object end: check presence, materialize defaults, and for the tuple
/// variant assemble the members' values in declaration order.
fn on_end(nodes: &mut Nodes, id: NodeId, index: usize) -> Result<Step> {
    let (auto, children, defaults) = {
        let Kind::Object(object) = &mut nodes.get_mut(id).kind else {
            return Err(Error::internal(index, "event routed to a non-object"));
        };
        object.open = false;
        let mut defaults = Vec::new();
        for (position, member) in object.members.iter().enumerate() {
            if object.seen.get(position).copied().unwrap_or(false) {
                continue;
            }
            if !member.optional {
                return Err(Error::new(
                    ErrorKind::MissingMember(member.name.clone()),
                    index,
                ));
            }
            if let Some(default) = &member.default {
                defaults.push((member.child, default.clone()));
            }
        }
        let children: Vec<NodeId> = object.members.iter().map(|member| member.child).collect();
        (object.auto, children, defaults)
    };

    // A default makes its member set, never empty.
    for (child, value) in defaults {
        let node = nodes.get_mut(child);
        node.slot = Some(value);
        node.set = true;
        node.empty = false;
    }

    if auto {
        let mut tuple = Vec::with_capacity(children.len());
        for child in children {
            let value = nodes
                .take_value(child)
                .ok_or_else(|| Error::internal(index, "tuple member has no value"))?;
            tuple.push(value);
        }
        nodes.get_mut(id).slot = Some(Value::Array(tuple));
    }

    Ok(Step::Complete)
}

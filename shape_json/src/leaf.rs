//! Scalar value parsers.

use sax_json::Event;

use crate::dispatcher::Step;
use crate::error::{Error, ErrorKind, Result};
use crate::node::{NodeId, Nodes, Validator};
use crate::value::Value;

/// Whole doubles up to 2^53 are exact and convert to integers without
/// ambiguity.
const EXACT_INT_BOUND: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScalarKind {
    Int,
    Bool,
    Double,
    String,
}

impl ScalarKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            ScalarKind::Int => "integer",
            ScalarKind::Bool => "boolean",
            ScalarKind::Double => "double",
            ScalarKind::String => "string",
        }
    }
}

pub(crate) struct LeafNode {
    pub(crate) scalar: ScalarKind,
    /// An explicit JSON `null` is accepted and stored.
    pub(crate) nullable: bool,
    pub(crate) validator: Option<Validator>,
}

/// A leaf consumes exactly one scalar event and terminates.
pub(crate) fn on_event(nodes: &mut Nodes, id: NodeId, event: &Event, index: usize) -> Result<Step> {
    let node = nodes.get_mut(id);
    let crate::node::Kind::Leaf(leaf) = &node.kind else {
        return Err(Error::internal(index, "event routed to a non-leaf"));
    };
    let value = match (leaf.scalar, event) {
        (ScalarKind::Int, Event::Int(i)) => Value::Int(*i),
        #[allow(clippy::cast_possible_truncation)]
        (ScalarKind::Int, Event::Double(d)) if is_exact_int(*d) => Value::Int(*d as i64),
        (ScalarKind::Double, Event::Double(d)) => Value::Double(*d),
        #[allow(clippy::cast_precision_loss)]
        (ScalarKind::Double, Event::Int(i)) => Value::Double(*i as f64),
        (ScalarKind::Bool, Event::Bool(b)) => Value::Bool(*b),
        (ScalarKind::String, Event::String(s)) => Value::String(s.clone()),
        (_, Event::Null) if leaf.nullable => Value::Null,
        _ => {
            return Err(Error::new(
                ErrorKind::SchemaMismatch {
                    expected: leaf.scalar.name(),
                    found: event.kind(),
                },
                index,
            ))
        }
    };
    if let Some(validator) = &leaf.validator {
        validator(&value).map_err(|msg| Error::new(ErrorKind::ValidationFailed(msg), index))?;
    }
    node.slot = Some(value);
    node.empty = false;
    Ok(Step::Complete)
}

pub(crate) fn is_exact_int(d: f64) -> bool {
    d.is_finite() && d.trunc() == d && d.abs() <= EXACT_INT_BOUND
}

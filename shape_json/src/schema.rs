//! The declarative surface: compose parser nodes into a schema tree and
//! attach hooks, all validated at build time.

use rustc_hash::FxHashMap;

use crate::array::ArrayNode;
use crate::ignore::IgnoreNode;
use crate::leaf::{LeafNode, ScalarKind};
use crate::map::MapNode;
use crate::node::{HookResult, Kind, Node, NodeId, NodeRef, Nodes};
use crate::object::{MemberSlot, ObjectNode, UnknownMember};
use crate::value::Value;

/// A schema construction error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("unknown parser id")]
    UnknownNode,
    #[error("a parser can only be attached to one parent")]
    ChildReused,
    #[error("duplicate member \"{0}\"")]
    DuplicateMember(String),
    #[error("the element parser of a storing container must produce a value")]
    StoringChild,
    #[error("every member of a tuple object must produce a value")]
    TupleMember,
    #[error("optional members of a tuple object must carry a default")]
    MissingDefault,
    #[error("a default value requires a value-producing member parser")]
    DefaultTarget,
    #[error("default value does not match the member parser type")]
    DefaultType,
    #[error("a validator can only be attached to a scalar parser")]
    ValidatorTarget,
    #[error("an element callback can only be attached to a map parser")]
    ElementTarget,
}

/// How a fixed-member object reacts to keys outside its member table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Fail the parse.
    #[default]
    Error,
    /// Swallow the value and continue.
    Ignore,
}

/// Options of a fixed-member object parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectOptions {
    pub unknown_keys: UnknownKeys,
}

impl ObjectOptions {
    #[must_use]
    pub fn new(unknown_keys: UnknownKeys) -> ObjectOptions {
        ObjectOptions { unknown_keys }
    }
}

/// One named member of an object parser.
pub struct Member {
    pub(crate) name: String,
    pub(crate) child: NodeId,
    pub(crate) optional: bool,
    pub(crate) default: Option<Value>,
}

impl Member {
    /// A required member.
    #[must_use]
    pub fn new(name: impl Into<String>, child: NodeId) -> Member {
        Member {
            name: name.into(),
            child,
            optional: false,
            default: None,
        }
    }

    /// An optional member. When absent, its parser simply stays unset.
    #[must_use]
    pub fn optional(name: impl Into<String>, child: NodeId) -> Member {
        Member {
            name: name.into(),
            child,
            optional: true,
            default: None,
        }
    }

    /// An optional member whose parser receives `default` when the member
    /// is absent. Requires a value-producing child.
    #[must_use]
    pub fn with_default(name: impl Into<String>, child: NodeId, default: Value) -> Member {
        Member {
            name: name.into(),
            child,
            optional: true,
            default: Some(default),
        }
    }
}

/// Builder and owner of a schema tree.
///
/// Leaves are created first, containers reference existing children, so
/// the result is always a cycle-free tree. The finished schema is handed
/// to [`crate::Parser`].
#[derive(Default)]
pub struct Schema {
    nodes: Nodes,
    /// Ids already owned by a parent; ownership is strict tree ownership.
    attached: rustc_hash::FxHashSet<usize>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Schema {
        Schema::default()
    }

    fn add(&mut self, kind: Kind) -> NodeId {
        self.nodes.add(Node::new(kind))
    }

    fn leaf(&mut self, scalar: ScalarKind, nullable: bool) -> NodeId {
        self.add(Kind::Leaf(LeafNode {
            scalar,
            nullable,
            validator: None,
        }))
    }

    /// A signed 64-bit integer value. Whole doubles are accepted when
    /// exactly representable.
    pub fn int(&mut self) -> NodeId {
        self.leaf(ScalarKind::Int, false)
    }

    pub fn boolean(&mut self) -> NodeId {
        self.leaf(ScalarKind::Bool, false)
    }

    /// A double value; integers widen.
    pub fn double(&mut self) -> NodeId {
        self.leaf(ScalarKind::Double, false)
    }

    pub fn string(&mut self) -> NodeId {
        self.leaf(ScalarKind::String, false)
    }

    /// Like [`Schema::int`], but an explicit JSON `null` is accepted and
    /// stored as a null value.
    pub fn optional_int(&mut self) -> NodeId {
        self.leaf(ScalarKind::Int, true)
    }

    pub fn optional_boolean(&mut self) -> NodeId {
        self.leaf(ScalarKind::Bool, true)
    }

    pub fn optional_double(&mut self) -> NodeId {
        self.leaf(ScalarKind::Double, true)
    }

    pub fn optional_string(&mut self) -> NodeId {
        self.leaf(ScalarKind::String, true)
    }

    /// Accepts one value of any shape and stores nothing.
    pub fn ignore(&mut self) -> NodeId {
        self.add(Kind::Ignore(IgnoreNode { depth: 0 }))
    }

    /// An array whose elements are parsed by `element`; values stay in the
    /// element parser for callbacks to consume.
    ///
    /// # Errors
    ///
    /// `UnknownNode` if `element` is not from this schema.
    pub fn array(&mut self, element: NodeId) -> Result<NodeId, SchemaError> {
        self.build_array(element, false)
    }

    /// A storing array: each element's value is popped and accumulated in
    /// input order.
    ///
    /// # Errors
    ///
    /// `UnknownNode`, or `StoringChild` if `element` does not produce a
    /// value.
    pub fn array_of(&mut self, element: NodeId) -> Result<NodeId, SchemaError> {
        self.build_array(element, true)
    }

    fn build_array(&mut self, element: NodeId, storing: bool) -> Result<NodeId, SchemaError> {
        self.check_element(element, storing)?;
        Ok(self.add(Kind::Array(ArrayNode {
            child: element,
            storing,
            open: false,
            index: 0,
            values: Vec::new(),
        })))
    }

    /// An object with dynamic keys; every value is parsed by `element`.
    ///
    /// # Errors
    ///
    /// `UnknownNode` if `element` is not from this schema.
    pub fn map(&mut self, element: NodeId) -> Result<NodeId, SchemaError> {
        self.build_map(element, false)
    }

    /// A storing map: `(key, value)` pairs accumulate in first-appearance
    /// order.
    ///
    /// # Errors
    ///
    /// `UnknownNode`, or `StoringChild` if `element` does not produce a
    /// value.
    pub fn map_of(&mut self, element: NodeId) -> Result<NodeId, SchemaError> {
        self.build_map(element, true)
    }

    fn build_map(&mut self, element: NodeId, storing: bool) -> Result<NodeId, SchemaError> {
        self.check_element(element, storing)?;
        Ok(self.add(Kind::Map(MapNode {
            child: element,
            storing,
            open: false,
            current_key: None,
            on_element: None,
            pairs: Vec::new(),
        })))
    }

    /// An object with fixed named members and the default options.
    ///
    /// # Errors
    ///
    /// See [`Schema::object_with`].
    pub fn object(&mut self, members: Vec<Member>) -> Result<NodeId, SchemaError> {
        self.object_with(members, ObjectOptions::default())
    }

    /// An object with fixed named members.
    ///
    /// # Errors
    ///
    /// `UnknownNode` for a foreign member parser, `DuplicateMember` for a
    /// repeated name, `DefaultTarget`/`DefaultType` for a bad default.
    pub fn object_with(
        &mut self,
        members: Vec<Member>,
        options: ObjectOptions,
    ) -> Result<NodeId, SchemaError> {
        self.build_object(members, options, false)
    }

    /// An object whose own value is the tuple of its members' values in
    /// declaration order.
    ///
    /// # Errors
    ///
    /// See [`Schema::tuple_object_with`].
    pub fn tuple_object(&mut self, members: Vec<Member>) -> Result<NodeId, SchemaError> {
        self.tuple_object_with(members, ObjectOptions::default())
    }

    /// Tuple-object variant of [`Schema::object_with`].
    ///
    /// # Errors
    ///
    /// As [`Schema::object_with`], plus `TupleMember` for a member that
    /// does not produce a value and `MissingDefault` for an optional
    /// member without one.
    pub fn tuple_object_with(
        &mut self,
        members: Vec<Member>,
        options: ObjectOptions,
    ) -> Result<NodeId, SchemaError> {
        self.build_object(members, options, true)
    }

    fn build_object(
        &mut self,
        members: Vec<Member>,
        options: ObjectOptions,
        auto: bool,
    ) -> Result<NodeId, SchemaError> {
        let mut by_name = FxHashMap::default();
        let mut slots = Vec::with_capacity(members.len());
        for (position, member) in members.into_iter().enumerate() {
            if !self.nodes.contains(member.child) {
                return Err(SchemaError::UnknownNode);
            }
            self.attach(member.child)?;
            if by_name.insert(member.name.clone(), position).is_some() {
                return Err(SchemaError::DuplicateMember(member.name));
            }
            let default = match member.default {
                Some(value) => Some(self.checked_default(member.child, value)?),
                None => None,
            };
            if auto {
                if !self.is_value_producing(member.child) {
                    return Err(SchemaError::TupleMember);
                }
                if member.optional && default.is_none() {
                    return Err(SchemaError::MissingDefault);
                }
            }
            slots.push(MemberSlot {
                name: member.name,
                child: member.child,
                optional: member.optional,
                default,
            });
        }
        let unknown = match options.unknown_keys {
            UnknownKeys::Error => UnknownMember::Error,
            UnknownKeys::Ignore => UnknownMember::Ignore(self.ignore()),
        };
        let seen = vec![false; slots.len()];
        Ok(self.add(Kind::Object(ObjectNode {
            members: slots,
            by_name,
            seen,
            unknown,
            auto,
            open: false,
        })))
    }

    /// Attach a validator to a scalar parser. It runs after a value lands
    /// and before the leaf terminates; an `Err` aborts the parse.
    ///
    /// # Errors
    ///
    /// `UnknownNode`, or `ValidatorTarget` for a non-scalar parser.
    pub fn validator(
        &mut self,
        id: NodeId,
        validator: impl Fn(&Value) -> HookResult + 'static,
    ) -> Result<(), SchemaError> {
        if !self.nodes.contains(id) {
            return Err(SchemaError::UnknownNode);
        }
        let Kind::Leaf(leaf) = &mut self.nodes.get_mut(id).kind else {
            return Err(SchemaError::ValidatorTarget);
        };
        leaf.validator = Some(Box::new(validator));
        Ok(())
    }

    /// Attach a finish hook, invoked when the node terminates with a
    /// value; an `Err` aborts the parse.
    ///
    /// # Errors
    ///
    /// `UnknownNode`.
    pub fn on_finish(
        &mut self,
        id: NodeId,
        hook: impl FnMut(NodeRef<'_>) -> HookResult + 'static,
    ) -> Result<(), SchemaError> {
        if !self.nodes.contains(id) {
            return Err(SchemaError::UnknownNode);
        }
        self.nodes.get_mut(id).on_finish = Some(Box::new(hook));
        Ok(())
    }

    /// Attach a per-pair hook to a map parser, invoked with the key and
    /// the element parser after each value; an `Err` aborts the parse.
    ///
    /// # Errors
    ///
    /// `UnknownNode`, or `ElementTarget` for a non-map parser.
    pub fn on_element(
        &mut self,
        id: NodeId,
        hook: impl FnMut(&str, NodeRef<'_>) -> HookResult + 'static,
    ) -> Result<(), SchemaError> {
        if !self.nodes.contains(id) {
            return Err(SchemaError::UnknownNode);
        }
        let Kind::Map(map) = &mut self.nodes.get_mut(id).kind else {
            return Err(SchemaError::ElementTarget);
        };
        map.on_element = Some(Box::new(hook));
        Ok(())
    }

    pub(crate) fn into_nodes(self, root: NodeId) -> Result<Nodes, SchemaError> {
        if !self.nodes.contains(root) {
            return Err(SchemaError::UnknownNode);
        }
        // The facade owns the root; a node with a parent cannot be it.
        if self.attached.contains(&root.0) {
            return Err(SchemaError::ChildReused);
        }
        Ok(self.nodes)
    }

    fn check_element(&mut self, element: NodeId, storing: bool) -> Result<(), SchemaError> {
        if !self.nodes.contains(element) {
            return Err(SchemaError::UnknownNode);
        }
        if storing && !self.is_value_producing(element) {
            return Err(SchemaError::StoringChild);
        }
        self.attach(element)
    }

    fn attach(&mut self, child: NodeId) -> Result<(), SchemaError> {
        if !self.attached.insert(child.0) {
            return Err(SchemaError::ChildReused);
        }
        Ok(())
    }

    fn is_value_producing(&self, id: NodeId) -> bool {
        match &self.nodes.get(id).kind {
            Kind::Leaf(_) => true,
            Kind::Ignore(_) => false,
            Kind::Array(array) => array.storing,
            Kind::Map(map) => map.storing,
            Kind::Object(object) => object.auto,
        }
    }

    fn checked_default(&self, child: NodeId, value: Value) -> Result<Value, SchemaError> {
        if !self.is_value_producing(child) {
            return Err(SchemaError::DefaultTarget);
        }
        match &self.nodes.get(child).kind {
            Kind::Leaf(leaf) => {
                if leaf.nullable && value.is_null() {
                    return Ok(value);
                }
                match (leaf.scalar, value) {
                    (ScalarKind::Int, v @ Value::Int(_))
                    | (ScalarKind::Bool, v @ Value::Bool(_))
                    | (ScalarKind::Double, v @ Value::Double(_))
                    | (ScalarKind::String, v @ Value::String(_)) => Ok(v),
                    #[allow(clippy::cast_precision_loss)]
                    (ScalarKind::Double, Value::Int(i)) => Ok(Value::Double(i as f64)),
                    _ => Err(SchemaError::DefaultType),
                }
            }
            Kind::Array(_) | Kind::Object(_) => {
                // Storing arrays and tuple objects both produce arrays.
                if matches!(value, Value::Array(_)) {
                    Ok(value)
                } else {
                    Err(SchemaError::DefaultType)
                }
            }
            Kind::Map(_) => {
                if matches!(value, Value::Object(_)) {
                    Ok(value)
                } else {
                    Err(SchemaError::DefaultType)
                }
            }
            Kind::Ignore(_) => Err(SchemaError::DefaultTarget),
        }
    }
}

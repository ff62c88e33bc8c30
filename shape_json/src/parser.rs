//! The top-level parser facade.

use sax_json::Tokenizer;

use crate::dispatcher::Dispatcher;
use crate::error::{Error, ErrorKind, Result};
use crate::node::{NodeId, NodeRef, Nodes};
use crate::schema::{Schema, SchemaError};
use crate::value::Value;

/// Options for configuring the parser behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Maximum JSON nesting depth.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            max_depth: sax_json::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Drives a schema tree over a byte stream.
///
/// Feed input with [`Parser::parse`] in chunks of any size, then call
/// [`Parser::finish`] after the last byte. Results are read from the
/// schema's nodes through [`Parser::root`] and [`Parser::node`], or
/// consumed by the hooks attached at schema build time. [`Parser::reset`]
/// restarts the same schema for another document.
pub struct Parser {
    tokenizer: Tokenizer,
    nodes: Nodes,
    root: NodeId,
    dispatcher: Dispatcher,
}

impl Parser {
    /// Wrap a schema with the default options.
    ///
    /// # Errors
    ///
    /// `SchemaError::UnknownNode` if `root` is not from `schema`.
    pub fn new(schema: Schema, root: NodeId) -> std::result::Result<Parser, SchemaError> {
        Parser::with_options(schema, root, Options::default())
    }

    /// Wrap a schema.
    ///
    /// # Errors
    ///
    /// `SchemaError::UnknownNode` if `root` is not from `schema`.
    pub fn with_options(
        schema: Schema,
        root: NodeId,
        options: Options,
    ) -> std::result::Result<Parser, SchemaError> {
        let nodes = schema.into_nodes(root)?;
        Ok(Parser {
            tokenizer: Tokenizer::with_max_depth(options.max_depth),
            nodes,
            root,
            dispatcher: Dispatcher::new(root),
        })
    }

    /// Feed one chunk of input. May be called repeatedly.
    ///
    /// # Errors
    ///
    /// Fails fast on the first tokenizer or schema error, with the byte
    /// index and, for nested failures, the document path. After an error
    /// the parser must be [`Parser::reset`] before further use.
    pub fn parse(&mut self, chunk: &[u8]) -> Result<()> {
        self.tokenizer.feed(chunk)?;
        self.drain()
    }

    /// Signal end of input.
    ///
    /// # Errors
    ///
    /// `Truncated` if structures are still open or the root never produced
    /// a value, plus any error of the final flushed token.
    pub fn finish(&mut self) -> Result<()> {
        self.tokenizer.finish()?;
        self.drain()?;
        if !self.dispatcher.is_done() || !self.nodes.get(self.root).set {
            return Err(Error::new(
                ErrorKind::Truncated,
                self.tokenizer.position(),
            ));
        }
        Ok(())
    }

    /// Restart for another document. Flags and storage are cleared,
    /// schema structure and hooks are kept.
    pub fn reset(&mut self) {
        self.tokenizer.reset();
        self.nodes.reset(self.root);
        self.dispatcher.reset();
    }

    /// View of the root parser node.
    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            nodes: &self.nodes,
            id: self.root,
        }
    }

    /// View of any node of this schema.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.nodes.contains(id).then_some(NodeRef {
            nodes: &self.nodes,
            id,
        })
    }

    /// Move a node's value out, clearing its set flag. Returns `None` when
    /// the node is unset or stores nothing.
    pub fn pop(&mut self, id: NodeId) -> Option<Value> {
        if !self.nodes.contains(id) {
            return None;
        }
        self.nodes.take_value(id)
    }

    fn drain(&mut self) -> Result<()> {
        while let Some((event, index)) = self.tokenizer.next_event() {
            self.dispatcher.dispatch(&mut self.nodes, &event, index)?;
        }
        Ok(())
    }
}

#![doc = include_str!("../README.md")]

/// Error types and handling for the parser.
pub mod error;
/// Parser node base, arena and read-only views.
pub mod node;
/// The top-level parser facade.
pub mod parser;
/// Schema composition: builder, members, options.
pub mod schema;
/// Dynamically typed parsed values.
pub mod value;

mod array;
mod dispatcher;
mod ignore;
mod leaf;
mod map;
mod object;

pub use error::{Error, ErrorKind, Result};
pub use node::{ElementHook, FinishHook, HookResult, NodeId, NodeRef, Validator};
pub use parser::{Options, Parser};
pub use schema::{Member, ObjectOptions, Schema, SchemaError, UnknownKeys};
pub use value::Value;

pub use sax_json;

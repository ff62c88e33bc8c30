#![doc = include_str!("../README.md")]

/// Error types and handling for the tokenizer.
pub mod error;
/// The SAX event vocabulary.
pub mod event;
/// The incremental tokenizer implementation.
pub mod tokenizer;

pub use error::Result;
pub use error::{Error, ErrorType};
pub use event::Event;
pub use tokenizer::{Tokenizer, DEFAULT_MAX_DEPTH};

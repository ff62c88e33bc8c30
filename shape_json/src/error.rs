//! The parse error surface: what failed, where in the byte stream, and
//! where in the document.

/// Convenient type alias for parser results.
pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong during a parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum ErrorKind {
    /// Malformed JSON syntax or encoding.
    #[error(transparent)]
    Tokenizer(sax_json::ErrorType),
    /// An event arrived with no active parser to receive it.
    #[error("unexpected token")]
    UnexpectedToken,
    /// The event type does not match the declared parser type.
    #[error("expected {expected}, found {found}")]
    SchemaMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// An object key outside the member table, with the error policy.
    #[error("unknown key \"{0}\"")]
    UnknownKey(String),
    /// A required member was absent at the end of its object.
    #[error("missing required member \"{0}\"")]
    MissingMember(String),
    /// A value validator rejected its value.
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    /// A finish or element callback rejected the parse.
    #[error("callback failed: {0}")]
    CallbackFailed(String),
    /// End of input with open structures or no complete document.
    #[error("truncated input")]
    Truncated,
    #[error("nesting deeper than {0} levels")]
    DepthExceeded(usize),
    /// A broken engine invariant. Should not happen.
    #[error("internal error: {0}")]
    Internal(String),
}

/// An error from the parser.
///
/// `index` is the byte offset of the event that triggered the failure;
/// `path` is a JSON-pointer to the place in the document, when the failure
/// happened below the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub index: usize,
    pub path: Option<String>,
}

impl Error {
    #[must_use]
    pub(crate) fn new(kind: ErrorKind, index: usize) -> Error {
        Error {
            kind,
            index,
            path: None,
        }
    }

    pub(crate) fn internal(index: usize, message: impl Into<String>) -> Error {
        Error::new(ErrorKind::Internal(message.into()), index)
    }

    /// Attach a document path, unless one is already present.
    #[must_use]
    pub(crate) fn with_path(mut self, path: String) -> Error {
        if self.path.is_none() && !path.is_empty() {
            self.path = Some(path);
        }
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at index {}", self.kind, self.index)?;
        if let Some(path) = &self.path {
            write!(f, " (at {path})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl From<sax_json::Error> for Error {
    fn from(e: sax_json::Error) -> Error {
        let kind = match e.error_type {
            sax_json::ErrorType::MaxDepthExceeded(limit) => ErrorKind::DepthExceeded(limit),
            sax_json::ErrorType::UnexpectedEof => ErrorKind::Truncated,
            other => ErrorKind::Tokenizer(other),
        };
        Error::new(kind, e.index)
    }
}

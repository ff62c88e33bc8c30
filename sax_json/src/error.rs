/// Convenient type alias for tokenizer results.
pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong while tokenizing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum ErrorType {
    /// A byte that cannot start or continue a token at this position.
    #[error("unexpected input byte 0x{0:02x}")]
    UnexpectedByte(u8),
    /// The input ended in the middle of a value or with open structures.
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid escape sequence \\{0}")]
    InvalidEscape(char),
    #[error("invalid unicode escape")]
    InvalidUnicodeEscape,
    #[error("unpaired surrogate in unicode escape")]
    LoneSurrogate,
    /// A bare word that is not `true`, `false` or `null`.
    #[error("invalid literal")]
    InvalidLiteral,
    #[error("invalid number")]
    InvalidNumber,
    #[error("invalid utf-8 in string")]
    InvalidUtf8,
    /// An unescaped control byte inside a string.
    #[error("control character 0x{0:02x} in string")]
    ControlCharacter(u8),
    /// More input after the top-level value was complete.
    #[error("unexpected data after the top-level value")]
    TrailingData,
    #[error("nesting deeper than {0} levels")]
    MaxDepthExceeded(usize),
}

/// An error from the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error_type} at index {index}")]
pub struct Error {
    /// The type of error that occurred.
    pub error_type: ErrorType,
    /// The byte index in the input where the error occurred.
    pub index: usize,
}

impl Error {
    #[must_use]
    pub fn new(error_type: ErrorType, index: usize) -> Error {
        Error { error_type, index }
    }
}

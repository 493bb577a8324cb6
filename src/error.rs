/*!
The stable error taxonomy shared by both parsing stages.

Every fallible public entry point returns `Result<T, Error>`. The variant
names match the stable error-code names callers match on (via [`Error::code`])
exactly, so there's no separate translation table to keep in sync.
*/

use std::{error, fmt};

/// Errors produced while indexing, building a tape from, or lazily reading a
/// JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The input or a requested allocation exceeded the parser's configured capacity.
    Capacity,
    /// A memory allocation failed.
    Memalloc,
    /// The tape is malformed: a missing colon, comma, closing brace/bracket,
    /// unexpected end of input, or trailing content after the root value.
    TapeError,
    /// Nesting exceeded the configured `max_depth`.
    DepthError,
    /// A string contained an invalid escape sequence or unpaired surrogate.
    StringError,
    /// `true` was expected but the following bytes didn't spell it out.
    TAtomError,
    /// `false` was expected but the following bytes didn't spell it out.
    FAtomError,
    /// `null` was expected but the following bytes didn't spell it out.
    NAtomError,
    /// A number literal violated the RFC 8259 grammar, or overflowed/underflowed.
    NumberError,
    /// The input contained invalid UTF-8.
    Utf8Error,
    /// The parser was used before being initialized with input.
    Uninitialized,
    /// The input was empty.
    Empty,
    /// An unescaped control character (`< 0x20`) appeared inside a string.
    UnescapedChars,
    /// A string was never terminated by a closing quote.
    UnclosedString,
    /// No backend is available for the current architecture.
    UnsupportedArchitecture,
    /// The value's JSON type doesn't match the accessor that was called.
    IncorrectType,
    /// A number was syntactically valid but out of range for the requested width.
    NumberOutOfRange,
    /// An array index was out of bounds.
    IndexOutOfBounds,
    /// `find_field` reached the end of an object without finding the key.
    NoSuchField,
    /// An I/O error occurred in a surrounding layer (reserved for front-end use).
    IoError,
    /// A JSON Pointer string was malformed.
    InvalidJsonPointer,
    /// A URI fragment JSON Pointer was malformed.
    InvalidUriFragment,
    /// An internal invariant was violated.
    UnexpectedError,
    /// The parser is already in use (re-entrant `iterate` call).
    ParserInUse,
    /// A value was read after the cursor had already advanced past it
    /// (development-build diagnostic; see [`crate::ondemand`]).
    OutOfOrderIteration,
    /// The input didn't carry the required trailing padding.
    InsufficientPadding,
    /// An array or object was never closed before the input ended.
    IncompleteArrayOrObject,
    /// The document's root value is a bare scalar, which some accessors reject.
    ScalarDocumentAsValue,
    /// A raw byte offset was outside the bounds of its buffer.
    OutOfBounds,
    /// Content followed the closing of the root value.
    TrailingContent,
    /// An integer literal has more significant digits than fit in a `u64`;
    /// use the raw token instead of a fixed-width accessor.
    BigintError,
}

impl Error {
    /// The stable, spec-defined name of this error code.
    pub const fn code(&self) -> &'static str {
        match self {
            Error::Capacity => "CAPACITY",
            Error::Memalloc => "MEMALLOC",
            Error::TapeError => "TAPE_ERROR",
            Error::DepthError => "DEPTH_ERROR",
            Error::StringError => "STRING_ERROR",
            Error::TAtomError => "T_ATOM_ERROR",
            Error::FAtomError => "F_ATOM_ERROR",
            Error::NAtomError => "N_ATOM_ERROR",
            Error::NumberError => "NUMBER_ERROR",
            Error::Utf8Error => "UTF8_ERROR",
            Error::Uninitialized => "UNINITIALIZED",
            Error::Empty => "EMPTY",
            Error::UnescapedChars => "UNESCAPED_CHARS",
            Error::UnclosedString => "UNCLOSED_STRING",
            Error::UnsupportedArchitecture => "UNSUPPORTED_ARCHITECTURE",
            Error::IncorrectType => "INCORRECT_TYPE",
            Error::NumberOutOfRange => "NUMBER_OUT_OF_RANGE",
            Error::IndexOutOfBounds => "INDEX_OUT_OF_BOUNDS",
            Error::NoSuchField => "NO_SUCH_FIELD",
            Error::IoError => "IO_ERROR",
            Error::InvalidJsonPointer => "INVALID_JSON_POINTER",
            Error::InvalidUriFragment => "INVALID_URI_FRAGMENT",
            Error::UnexpectedError => "UNEXPECTED_ERROR",
            Error::ParserInUse => "PARSER_IN_USE",
            Error::OutOfOrderIteration => "OUT_OF_ORDER_ITERATION",
            Error::InsufficientPadding => "INSUFFICIENT_PADDING",
            Error::IncompleteArrayOrObject => "INCOMPLETE_ARRAY_OR_OBJECT",
            Error::ScalarDocumentAsValue => "SCALAR_DOCUMENT_AS_VALUE",
            Error::OutOfBounds => "OUT_OF_BOUNDS",
            Error::TrailingContent => "TRAILING_CONTENT",
            Error::BigintError => "BIGINT_ERROR",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl error::Error for Error {}

pub(crate) type Result<T> = std::result::Result<T, Error>;

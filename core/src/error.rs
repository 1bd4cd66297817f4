//! Error types for identifier quoting and search-path parsing.

use thiserror::Error;

/// Errors produced while quoting identifiers or parsing search-path values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// An identifier was empty. PostgreSQL has no zero-length identifiers.
    #[error("empty identifier")]
    EmptyIdentifier,

    /// An identifier contained a NUL byte, the one byte PostgreSQL
    /// identifiers cannot carry.
    #[error("identifier contains a NUL byte")]
    NulByte,

    /// A search path had no elements where at least one was required.
    #[error("search path has no elements")]
    EmptyPath,

    /// A `SHOW search_path` response parsed to nothing.
    #[error("empty search path response")]
    Empty,

    /// A double-quoted element was never closed.
    #[error("unterminated quoted identifier in {0:?}")]
    UnterminatedQuote(String),

    /// An unexpected character appeared between or inside elements.
    #[error("unexpected character {found:?} in {input:?}")]
    UnexpectedChar {
        /// The offending character.
        found: char,
        /// The full input being parsed.
        input: String,
    },

    /// A value did not look like a PostgreSQL array literal.
    #[error("malformed array literal {0:?}")]
    MalformedArray(String),
}

/// Convenience alias for results with [`PathError`].
pub type Result<T> = std::result::Result<T, PathError>;

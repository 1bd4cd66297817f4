//! Error types for search-path session operations.
//!
//! Covers transport failures, catalog access problems, malformed server
//! responses, malformed caller input, and schema DDL conflicts surfaced
//! from server error codes. No operation retries internally; every error
//! propagates unchanged to the caller, with the single exception of scoped
//! restoration described on
//! [`Schemata::with_search_path`](crate::Schemata::with_search_path).

use pg_schemata_core::PathError;
use thiserror::Error;

/// Errors that can occur during search-path session operations.
#[derive(Debug, Error)]
pub enum SchemataError {
    /// Transport, authentication, or other connection-level failure.
    #[error("connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Catalog views are inaccessible, e.g. insufficient privilege or a
    /// missing system view.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// A server response did not parse as expected.
    #[error("parse error: {0}")]
    Parse(#[from] PathError),

    /// A query returned a result of an unexpected shape.
    #[error("unexpected result for {query:?}: {detail}")]
    UnexpectedResult {
        /// The query that produced the result.
        query: String,
        /// What was wrong with it.
        detail: String,
    },

    /// Malformed caller input; nothing was sent to the server.
    #[error("invalid input: {0}")]
    InvalidInput(PathError),

    /// The schema to create or rename to already exists.
    #[error("schema already exists: {0}")]
    AlreadyExists(String),

    /// The schema to rename does not exist.
    #[error("schema not found: {0}")]
    NotFound(String),
}

/// Convenience alias for results with [`SchemataError`].
pub type Result<T> = std::result::Result<T, SchemataError>;

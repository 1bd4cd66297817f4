//! Schema-name and search-path primitives for PostgreSQL tooling.
//!
//! This crate defines the domain model shared by search-path management
//! code:
//!
//! - [`SchemaName`] — a case-sensitive schema identifier, with the reserved
//!   `$user` token treated as an ordinary opaque name.
//! - [`SearchPath`] — an ordered list of schema names whose order defines
//!   name-resolution precedence, convertible from single names, sequences,
//!   or pre-formatted comma-separated strings.
//! - [`quote_ident`] — injection-safe identifier quoting (double quotes,
//!   embedded quotes doubled).
//! - [`SearchPath::parse`] — the quote-aware parser for `SHOW search_path`
//!   responses.
//! - [`parse_array_literal`] — parser for the text form of PostgreSQL array
//!   values, as returned by `current_schemas(false)`.
//!
//! Everything here is pure string logic; session operations live in the
//! companion `pg-schemata` crate.
//!
//! # Example
//!
//! ```
//! use pg_schemata_core::SearchPath;
//!
//! let path = SearchPath::from(vec!["bar\" ',", "baz"]);
//! let sql = path.to_sql().unwrap();
//! assert_eq!(sql, "\"bar\"\" ',\", \"baz\"");
//!
//! // What the server echoes back parses to the same names.
//! assert_eq!(SearchPath::parse(&sql).unwrap(), path);
//! ```

mod array;
mod error;
mod ident;
mod types;

pub use array::parse_array_literal;
pub use error::{PathError, Result};
pub use ident::quote_ident;
pub use types::{SchemaName, SearchPath};

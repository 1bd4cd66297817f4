//! Schema search-path management for a live PostgreSQL session.
//!
//! The server-side search path is session-mutable state; this crate models
//! it through explicit get/set operations against the live connection, with
//! no local cache, so there is nothing to go stale. [`Schemata`] provides:
//!
//! - **`schemata`** — list the schemas that exist right now.
//! - **`search_path` / `set_search_path`** — read and replace the declared
//!   session search path, with injection-safe identifier quoting.
//! - **`with_search_path` / `with_search_path_prepended`** — run a closure
//!   under a temporary search path, restoring the captured prior path on
//!   every exit path.
//! - **`current_schemata`** — the resolved view: schemas actually
//!   searchable, in effective order.
//! - **`create_schema` / `rename_schema`** — schema DDL with typed
//!   conflict errors.
//!
//! The manager is generic over the [`Executor`] seam. The default `client`
//! feature implements it for [`postgres::Client`].
//!
//! # Quick start
//!
//! ```no_run
//! use pg_schemata::Schemata;
//!
//! let mut db = Schemata::connect("host=localhost user=postgres").unwrap();
//!
//! db.set_search_path(vec!["bar", "baz"]).unwrap();
//!
//! db.with_search_path("reporting", |db| {
//!     // search_path is "reporting" here; restored afterward, error or not.
//!     db.current_schemata()
//! }).unwrap();
//! ```

#[cfg(feature = "client")]
mod client;
mod error;
mod executor;
mod manager;

pub use error::{Result, SchemataError};
pub use executor::Executor;
pub use manager::Schemata;

pub use pg_schemata_core::{PathError, SchemaName, SearchPath, parse_array_literal, quote_ident};

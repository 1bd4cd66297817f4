//! The SQL execution seam.
//!
//! [`Schemata`](crate::Schemata) is generic over this trait so the manager
//! can run against a real `postgres::Client` (the `client` feature) or any
//! other statement executor, including the in-memory fake the integration
//! tests use.

use crate::error::Result;

/// A synchronous SQL statement executor bound to one session.
///
/// Search-path state is per-session on the server, so an implementation
/// must issue all statements on a single logical connection, in order.
/// Implementations are responsible for mapping server error conditions to
/// the [`SchemataError`](crate::SchemataError) taxonomy (duplicate schema,
/// missing schema, insufficient privilege, transport failure).
pub trait Executor {
    /// Runs a statement, discarding any rows it may produce.
    fn execute(&mut self, sql: &str) -> Result<()>;

    /// Runs a query over the text protocol and returns its rows as text
    /// columns, in server order.
    fn query_rows(&mut self, sql: &str) -> Result<Vec<Vec<String>>>;
}

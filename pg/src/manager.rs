//! Search-path session operations.
//!
//! [`Schemata`] translates between the structured
//! [`SearchPath`]/[`SchemaName`] domain model and the textual SQL the
//! server understands. Every operation is a single synchronous round trip
//! (the scoped operations are three: capture, mutate, restore); nothing is
//! cached between calls, so the live session state is the single source of
//! truth.
//!
//! Statements on one session execute serially, and two callers racing on
//! the same connection can clobber each other's captured previous path.
//! Callers sharing a connection across tasks must serialize access
//! themselves.

use std::collections::BTreeSet;

use pg_schemata_core::{SchemaName, SearchPath, parse_array_literal};
use tracing::{debug, error};

use crate::error::{Result, SchemataError};
use crate::executor::Executor;

/// Search-path manager for one PostgreSQL session.
///
/// Owns an [`Executor`] and provides schema listing, search-path get/set,
/// scoped temporary search paths, and schema DDL.
///
/// # Examples
///
/// ```no_run
/// use pg_schemata::Schemata;
///
/// let mut db = Schemata::connect("host=localhost user=postgres").unwrap();
///
/// db.set_search_path("bar, baz").unwrap();
/// assert_eq!(db.search_path().unwrap().to_string(), "bar, baz");
///
/// let tables = db.with_search_path("reporting", |db| {
///     // Runs with search_path = "reporting"; the prior path is restored
///     // afterward even if this closure errors.
///     db.current_schemata()
/// }).unwrap();
/// # let _ = tables;
/// ```
pub struct Schemata<E> {
    executor: E,
}

impl<E> Schemata<E> {
    /// Wraps an executor.
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Returns a mutable reference to the underlying executor.
    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    /// Consumes the manager, returning the underlying executor.
    pub fn into_inner(self) -> E {
        self.executor
    }
}

impl<E: Executor> Schemata<E> {
    /// Lists all schemas that currently exist in the connected database.
    ///
    /// Queries `information_schema.schemata` fresh on every call; no
    /// ordering guarantee beyond the set's own.
    ///
    /// # Errors
    ///
    /// [`SchemataError::Connection`] if the query cannot run,
    /// [`SchemataError::CatalogUnavailable`] if the catalog view is
    /// inaccessible.
    pub fn schemata(&mut self) -> Result<BTreeSet<SchemaName>> {
        let rows = self.fetch("SELECT schema_name FROM information_schema.schemata")?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .map(SchemaName::new)
            .collect())
    }

    /// Returns the session's declared search path, in resolution order.
    ///
    /// This is the *declared* view: entries need not exist, and the
    /// `$user` token comes back verbatim. See
    /// [`current_schemata`](Self::current_schemata) for the resolved view.
    ///
    /// # Errors
    ///
    /// [`SchemataError::Parse`] if the `SHOW search_path` response is not a
    /// comma-separated identifier list.
    pub fn search_path(&mut self) -> Result<SearchPath> {
        let raw = self.fetch_scalar("SHOW search_path")?;
        Ok(SearchPath::parse(&raw)?)
    }

    /// Replaces the session's search path.
    ///
    /// Accepts a single name, an ordered sequence of names, or one
    /// pre-formatted comma-separated string (split on `,`, trimmed). Each
    /// element is individually quoted before interpolation, so names
    /// containing commas, quotes, or spaces survive unchanged.
    ///
    /// # Errors
    ///
    /// [`SchemataError::InvalidInput`] if the input is empty or contains an
    /// unquotable name; nothing is sent to the server in that case.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pg_schemata::Schemata;
    /// # let mut db = Schemata::connect("host=localhost").unwrap();
    /// db.set_search_path("bar").unwrap();
    /// db.set_search_path("bar, baz").unwrap();
    /// db.set_search_path(vec!["bar", "baz"]).unwrap();
    /// ```
    pub fn set_search_path(&mut self, path: impl Into<SearchPath>) -> Result<()> {
        let list = path.into().to_sql().map_err(SchemataError::InvalidInput)?;
        self.run(&format!("SET search_path = {list}"))
    }

    /// Runs `body` with the search path replaced by `path`, restoring the
    /// previously captured path afterward.
    ///
    /// Restoration happens on every `Result` exit path: after a normal
    /// return and before a body error propagates. The restore target is the
    /// path captured at entry, never a default, so nested calls compose:
    /// each level restores to its immediately-enclosing level. If `body`
    /// fails and the restore also fails, the body's error is returned and
    /// the restore failure is logged; if `body` succeeds but the restore
    /// fails, the restore error is returned. Restoration is not attempted
    /// when `body` panics.
    ///
    /// The body's error type only needs `From<SchemataError>`, so caller
    /// error types propagate through unchanged.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pg_schemata::Schemata;
    /// # let mut db = Schemata::connect("host=localhost").unwrap();
    /// let inside = db.with_search_path("bar", |db| db.search_path()).unwrap();
    /// assert_eq!(inside.to_string(), "bar");
    /// ```
    pub fn with_search_path<T, R, F>(
        &mut self,
        path: impl Into<SearchPath>,
        body: F,
    ) -> std::result::Result<T, R>
    where
        F: FnOnce(&mut Self) -> std::result::Result<T, R>,
        R: From<SchemataError>,
    {
        let target = path.into();
        self.scoped(move |_| target, body)
    }

    /// Like [`with_search_path`](Self::with_search_path), but prepends
    /// `path` to the captured search path instead of replacing it.
    ///
    /// With a prior path of `foo, public`, prepending `bar` runs `body`
    /// under `bar, foo, public`.
    pub fn with_search_path_prepended<T, R, F>(
        &mut self,
        path: impl Into<SearchPath>,
        body: F,
    ) -> std::result::Result<T, R>
    where
        F: FnOnce(&mut Self) -> std::result::Result<T, R>,
        R: From<SchemataError>,
    {
        let front = path.into();
        self.scoped(move |saved| saved.prepended(&front), body)
    }

    /// Returns the schemas that are actually searchable right now, in
    /// effective order.
    ///
    /// Runs `SELECT current_schemas(false)`: the *resolved* view, listing
    /// only schemas that exist, with `$user` resolved or dropped by the
    /// server.
    pub fn current_schemata(&mut self) -> Result<Vec<SchemaName>> {
        let raw = self.fetch_scalar("SELECT current_schemas(false)")?;
        Ok(parse_array_literal(&raw)?)
    }

    /// Creates a schema.
    ///
    /// # Errors
    ///
    /// [`SchemataError::AlreadyExists`] if a schema of that name exists,
    /// [`SchemataError::InvalidInput`] for an unquotable name.
    pub fn create_schema(&mut self, name: impl Into<SchemaName>) -> Result<()> {
        let quoted = name.into().quoted().map_err(SchemataError::InvalidInput)?;
        self.run(&format!("CREATE SCHEMA {quoted}"))
    }

    /// Renames a schema.
    ///
    /// # Errors
    ///
    /// [`SchemataError::NotFound`] if `old` does not exist,
    /// [`SchemataError::AlreadyExists`] if `new` collides, and
    /// [`SchemataError::InvalidInput`] for unquotable names.
    pub fn rename_schema(
        &mut self,
        old: impl Into<SchemaName>,
        new: impl Into<SchemaName>,
    ) -> Result<()> {
        let old = old.into().quoted().map_err(SchemataError::InvalidInput)?;
        let new = new.into().quoted().map_err(SchemataError::InvalidInput)?;
        self.run(&format!("ALTER SCHEMA {old} RENAME TO {new}"))
    }

    // Capture, mutate, run, restore. The restore target is always the
    // captured path.
    fn scoped<T, R, F>(
        &mut self,
        target: impl FnOnce(&SearchPath) -> SearchPath,
        body: F,
    ) -> std::result::Result<T, R>
    where
        F: FnOnce(&mut Self) -> std::result::Result<T, R>,
        R: From<SchemataError>,
    {
        let saved = self.search_path().map_err(R::from)?;
        let target = target(&saved);
        self.set_search_path(target).map_err(R::from)?;

        let outcome = body(self);
        let restored = self.set_search_path(saved);

        match (outcome, restored) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(restore)) => Err(R::from(restore)),
            (Err(original), Ok(())) => Err(original),
            (Err(original), Err(restore)) => {
                // The body's error wins; the restore failure must not mask it.
                error!(error = %restore, "failed to restore search path after body error");
                Err(original)
            }
        }
    }

    fn run(&mut self, sql: &str) -> Result<()> {
        debug!(sql, "executing statement");
        self.executor.execute(sql)
    }

    fn fetch(&mut self, sql: &str) -> Result<Vec<Vec<String>>> {
        debug!(sql, "running query");
        self.executor.query_rows(sql)
    }

    fn fetch_scalar(&mut self, sql: &str) -> Result<String> {
        let mut rows = self.fetch(sql)?;
        if rows.len() != 1 {
            return Err(SchemataError::UnexpectedResult {
                query: sql.to_owned(),
                detail: format!("expected one row, got {}", rows.len()),
            });
        }
        let mut row = rows.remove(0);
        if row.len() != 1 {
            return Err(SchemataError::UnexpectedResult {
                query: sql.to_owned(),
                detail: format!("expected one column, got {}", row.len()),
            });
        }
        Ok(row.remove(0))
    }
}

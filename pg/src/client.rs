//! [`Executor`] implementation for the `postgres` crate.
//!
//! Uses the simple-query (text) protocol so every result column arrives as
//! text, which is what the parsers in `pg-schemata-core` expect. Server
//! errors are classified by SQLSTATE into the [`SchemataError`] taxonomy;
//! anything unrecognized is a connection-level error.

use postgres::error::SqlState;
use postgres::{Client, NoTls, SimpleQueryMessage};

use crate::error::{Result, SchemataError};
use crate::executor::Executor;
use crate::manager::Schemata;

impl Executor for Client {
    fn execute(&mut self, sql: &str) -> Result<()> {
        self.batch_execute(sql).map_err(map_error)
    }

    fn query_rows(&mut self, sql: &str) -> Result<Vec<Vec<String>>> {
        let messages = self.simple_query(sql).map_err(map_error)?;
        let mut rows = Vec::new();
        for message in messages {
            if let SimpleQueryMessage::Row(row) = message {
                rows.push(
                    (0..row.len())
                        .map(|i| row.get(i).unwrap_or_default().to_owned())
                        .collect(),
                );
            }
        }
        Ok(rows)
    }
}

impl Schemata<Client> {
    /// Connects to the server described by `params` (libpq-style key/value
    /// string) without TLS and wraps the client.
    ///
    /// # Errors
    ///
    /// [`SchemataError::Connection`] if the connection cannot be
    /// established.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pg_schemata::Schemata;
    ///
    /// let mut db = Schemata::connect("host=localhost user=postgres").unwrap();
    /// assert!(db.schemata().unwrap().iter().any(|s| s == "public"));
    /// ```
    pub fn connect(params: &str) -> Result<Self> {
        let client = Client::connect(params, NoTls).map_err(map_error)?;
        Ok(Self::new(client))
    }
}

fn map_error(err: postgres::Error) -> SchemataError {
    let code = err.code().cloned();
    let message = err
        .as_db_error()
        .map(|db| db.message().to_owned())
        .unwrap_or_else(|| err.to_string());

    match code {
        Some(code) if code == SqlState::DUPLICATE_SCHEMA => SchemataError::AlreadyExists(message),
        Some(code) if code == SqlState::INVALID_SCHEMA_NAME => SchemataError::NotFound(message),
        Some(code)
            if code == SqlState::INSUFFICIENT_PRIVILEGE || code == SqlState::UNDEFINED_TABLE =>
        {
            SchemataError::CatalogUnavailable(message)
        }
        _ => SchemataError::Connection(Box::new(err)),
    }
}

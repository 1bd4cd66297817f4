//! PostgreSQL identifier quoting.
//!
//! Quoting is the one injection-sensitive piece of logic in this crate:
//! schema names are interpolated directly into `SET search_path`, `CREATE
//! SCHEMA`, and `ALTER SCHEMA` statements, so the quoted form must survive
//! any byte sequence a PostgreSQL identifier can legally contain (commas,
//! spaces, embedded double quotes).

use crate::error::{PathError, Result};

/// Quotes `name` as a PostgreSQL identifier.
///
/// The name is wrapped in double quotes with embedded double quotes doubled,
/// so the result round-trips through the server verbatim regardless of
/// commas, spaces, or quotes in the name. The `$user` placeholder may be
/// quoted like any other name; the server still treats it as the
/// current-role token inside `search_path`.
///
/// # Errors
///
/// Returns [`PathError::EmptyIdentifier`] for an empty name and
/// [`PathError::NulByte`] if the name contains a NUL byte.
///
/// # Examples
///
/// ```
/// use pg_schemata_core::quote_ident;
///
/// assert_eq!(quote_ident("public").unwrap(), "\"public\"");
/// assert_eq!(quote_ident("bar\" ',").unwrap(), "\"bar\"\" ',\"");
/// assert!(quote_ident("").is_err());
/// ```
pub fn quote_ident(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(PathError::EmptyIdentifier);
    }
    if name.contains('\0') {
        return Err(PathError::NulByte);
    }
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

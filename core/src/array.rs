//! Parsing of PostgreSQL array literals.
//!
//! `SELECT current_schemas(false)` comes back over the text protocol as an
//! array literal such as `{foo,public}`. Elements containing commas, quotes,
//! whitespace, or braces are double-quoted with backslash escapes for `"`
//! and `\`.

use crate::error::{PathError, Result};
use crate::types::SchemaName;

/// Parses the text form of a PostgreSQL `name[]` value into an ordered list.
///
/// `{}` yields an empty vector. Quoted elements may contain any character;
/// `\"` and `\\` are the escape forms the server emits.
///
/// # Errors
///
/// Returns [`PathError::MalformedArray`] if the input is not brace-wrapped,
/// [`PathError::UnterminatedQuote`] for an unclosed quoted element, and
/// [`PathError::UnexpectedChar`] for stray characters between elements.
///
/// # Examples
///
/// ```
/// use pg_schemata_core::parse_array_literal;
///
/// let names = parse_array_literal("{foo,public}").unwrap();
/// assert_eq!(names[0], "foo");
/// assert_eq!(names[1], "public");
/// assert!(parse_array_literal("{}").unwrap().is_empty());
/// ```
pub fn parse_array_literal(input: &str) -> Result<Vec<SchemaName>> {
    let trimmed = input.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| PathError::MalformedArray(input.to_string()))?;
    if inner.is_empty() {
        return Ok(Vec::new());
    }

    let mut elements = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        let mut element = String::new();
        if chars.next_if_eq(&'"').is_some() {
            loop {
                match chars.next() {
                    Some('\\') => match chars.next() {
                        Some(c) => element.push(c),
                        None => return Err(PathError::UnterminatedQuote(input.to_string())),
                    },
                    Some('"') => break,
                    Some(c) => element.push(c),
                    None => return Err(PathError::UnterminatedQuote(input.to_string())),
                }
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == ',' {
                    break;
                }
                element.push(c);
                chars.next();
            }
        }
        elements.push(SchemaName::new(element));
        match chars.next() {
            Some(',') => {}
            None => break,
            Some(c) => {
                return Err(PathError::UnexpectedChar {
                    found: c,
                    input: input.to_string(),
                });
            }
        }
    }
    Ok(elements)
}

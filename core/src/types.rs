//! Schema name and search path types.
//!
//! [`SchemaName`] is an exact-string identifier; [`SearchPath`] is an
//! ordered list of them, where order defines name-resolution precedence.
//! Both serialize transparently with [`serde`] as plain strings and string
//! lists.
//!
//! A path is never cached anywhere: it is parsed fresh from `SHOW
//! search_path` output and formatted fresh into `SET search_path`
//! statements, so the live session remains the single source of truth.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PathError, Result};
use crate::ident::quote_ident;

/// A PostgreSQL schema name.
///
/// Case-sensitive, compared by exact string equality after unquoting. The
/// reserved `$user` search-path token is represented as an ordinary, opaque
/// `SchemaName`; this crate never resolves it.
///
/// # Examples
///
/// ```
/// use pg_schemata_core::SchemaName;
///
/// let name = SchemaName::new("reporting");
/// assert_eq!(name.as_str(), "reporting");
/// assert_eq!(name.quoted().unwrap(), "\"reporting\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaName(String);

impl SchemaName {
    /// Creates a schema name from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the bare (unquoted) name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name, returning the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns the name quoted as a SQL identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EmptyIdentifier`] or [`PathError::NulByte`] for
    /// names no PostgreSQL identifier can carry.
    pub fn quoted(&self) -> Result<String> {
        quote_ident(&self.0)
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SchemaName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for SchemaName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for SchemaName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SchemaName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SchemaName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == **other
    }
}

/// An ordered schema search path.
///
/// Insertion order is significant: it is the order PostgreSQL searches for
/// unqualified object names. The `From` conversions build a path from any
/// input shape a caller might hold: a single name, a sequence of names, or
/// one pre-formatted comma-separated string.
///
/// Note the asymmetry between input and output parsing: the `From<&str>`
/// conversion is a plain split-on-comma for caller convenience (a name
/// containing a comma must be passed via the sequence forms), while
/// [`SearchPath::parse`] is the strict, quote-aware parser for `SHOW
/// search_path` responses.
///
/// # Examples
///
/// ```
/// use pg_schemata_core::SearchPath;
///
/// let a = SearchPath::from("bar, baz");
/// let b = SearchPath::from(vec!["bar", "baz"]);
/// assert_eq!(a, b);
/// assert_eq!(a.to_sql().unwrap(), "\"bar\", \"baz\"");
///
/// let parsed = SearchPath::parse("\"$user\", public").unwrap();
/// assert_eq!(parsed.names()[0], "$user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchPath(Vec<SchemaName>);

impl SearchPath {
    /// Creates a path from a list of names.
    pub fn new(names: Vec<SchemaName>) -> Self {
        Self(names)
    }

    /// Returns the names in resolution order.
    pub fn names(&self) -> &[SchemaName] {
        &self.0
    }

    /// Consumes the path, returning the names in resolution order.
    pub fn into_names(self) -> Vec<SchemaName> {
        self.0
    }

    /// Iterates over the names in resolution order.
    pub fn iter(&self) -> std::slice::Iter<'_, SchemaName> {
        self.0.iter()
    }

    /// Number of entries in the path.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new path consisting of `front` followed by `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pg_schemata_core::SearchPath;
    ///
    /// let base = SearchPath::from(vec!["foo", "public"]);
    /// let scoped = base.prepended(&SearchPath::from("bar"));
    /// assert_eq!(scoped, SearchPath::from(vec!["bar", "foo", "public"]));
    /// ```
    pub fn prepended(&self, front: &SearchPath) -> SearchPath {
        front.0.iter().cloned().chain(self.0.iter().cloned()).collect()
    }

    /// Formats the path as a SQL identifier list for `SET search_path`.
    ///
    /// Every element is individually quoted, so names containing commas,
    /// quotes, or spaces cannot escape their element.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EmptyPath`] for an empty path, or the quoting
    /// error of the first unquotable element.
    pub fn to_sql(&self) -> Result<String> {
        if self.0.is_empty() {
            return Err(PathError::EmptyPath);
        }
        let parts = self
            .0
            .iter()
            .map(SchemaName::quoted)
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join(", "))
    }

    /// Parses a `SHOW search_path` response.
    ///
    /// Elements are comma-separated; each is either a double-quoted
    /// identifier (`""` is a literal quote, commas and spaces are allowed
    /// inside) or an unquoted token, trimmed of surrounding whitespace. The
    /// `$user` token survives verbatim whether quoted or not.
    ///
    /// Reparsing the output of [`to_sql`](SearchPath::to_sql) yields the
    /// same names, though not necessarily byte-identical quoting.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Empty`] if the input holds no elements,
    /// [`PathError::UnterminatedQuote`] for an unclosed quoted element, and
    /// [`PathError::UnexpectedChar`] for anything that is not a
    /// comma-separated identifier list.
    pub fn parse(input: &str) -> Result<Self> {
        let mut names = Vec::new();
        let mut chars = input.chars().peekable();

        loop {
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            match chars.peek().copied() {
                None => break,
                Some('"') => {
                    chars.next();
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('"') => {
                                if chars.next_if_eq(&'"').is_some() {
                                    name.push('"');
                                } else {
                                    break;
                                }
                            }
                            Some(c) => name.push(c),
                            None => {
                                return Err(PathError::UnterminatedQuote(input.to_string()));
                            }
                        }
                    }
                    names.push(SchemaName::new(name));
                }
                Some(_) => {
                    let mut raw = String::new();
                    while let Some(&c) = chars.peek() {
                        if c == ',' {
                            break;
                        }
                        if c == '"' {
                            return Err(PathError::UnexpectedChar {
                                found: c,
                                input: input.to_string(),
                            });
                        }
                        raw.push(c);
                        chars.next();
                    }
                    let trimmed = raw.trim();
                    if trimmed.is_empty() {
                        return Err(PathError::UnexpectedChar {
                            found: ',',
                            input: input.to_string(),
                        });
                    }
                    names.push(SchemaName::new(trimmed));
                }
            }
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
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

        if names.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self(names))
    }
}

impl fmt::Display for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(name.as_str())?;
        }
        Ok(())
    }
}

impl From<SchemaName> for SearchPath {
    fn from(name: SchemaName) -> Self {
        Self(vec![name])
    }
}

impl From<&SchemaName> for SearchPath {
    fn from(name: &SchemaName) -> Self {
        Self(vec![name.clone()])
    }
}

/// Splits a pre-formatted comma-separated string on `,`, trimming each
/// element and discarding empty ones. Not quote-aware; names containing
/// commas must use the sequence conversions instead.
impl From<&str> for SearchPath {
    fn from(csv: &str) -> Self {
        csv.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(SchemaName::new)
            .collect()
    }
}

impl From<String> for SearchPath {
    fn from(csv: String) -> Self {
        Self::from(csv.as_str())
    }
}

impl From<Vec<SchemaName>> for SearchPath {
    fn from(names: Vec<SchemaName>) -> Self {
        Self(names)
    }
}

impl From<Vec<&str>> for SearchPath {
    fn from(names: Vec<&str>) -> Self {
        names.into_iter().map(SchemaName::new).collect()
    }
}

impl From<&[&str]> for SearchPath {
    fn from(names: &[&str]) -> Self {
        names.iter().copied().map(SchemaName::new).collect()
    }
}

impl From<Vec<String>> for SearchPath {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().map(SchemaName::from).collect()
    }
}

impl FromIterator<SchemaName> for SearchPath {
    fn from_iter<I: IntoIterator<Item = SchemaName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for SearchPath {
    type Item = SchemaName;
    type IntoIter = std::vec::IntoIter<SchemaName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SearchPath {
    type Item = &'a SchemaName;
    type IntoIter = std::slice::Iter<'a, SchemaName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

//! Integration tests for the pg-schemata crate.
//!
//! Runs the manager against an in-memory stand-in for a PostgreSQL session
//! that stores the raw `search_path` setting text, the set of existing
//! schemas, and the session role, and answers exactly the statement shapes
//! the manager emits.

use std::collections::BTreeSet;

use pg_schemata::{Executor, Result, SchemaName, Schemata, SchemataError, SearchPath};

/// In-memory PostgreSQL session double.
struct FakeSession {
    schemas: BTreeSet<String>,
    setting: String,
    role: String,
    /// When `Some(n)`, the nth upcoming `SET search_path` fails (0 = next).
    sets_until_failure: Option<u32>,
}

impl FakeSession {
    fn new() -> Self {
        Self::with_setting("\"$user\", public")
    }

    /// A session whose connection options configured the given search path.
    fn with_setting(setting: &str) -> Self {
        let schemas = ["public", "information_schema", "pg_catalog"]
            .into_iter()
            .map(str::to_owned)
            .collect();
        Self {
            schemas,
            setting: setting.to_owned(),
            role: "postgres".to_owned(),
            sets_until_failure: None,
        }
    }

    fn failing_after_sets(mut self, n: u32) -> Self {
        self.sets_until_failure = Some(n);
        self
    }

    /// What `current_schemas(false)` would return: path entries that
    /// resolve to existing schemas, `$user` mapped to the session role,
    /// in declared order.
    fn resolved(&self) -> Vec<String> {
        let Ok(path) = SearchPath::parse(&self.setting) else {
            return Vec::new();
        };
        path.iter()
            .map(|name| {
                if name.as_str() == "$user" {
                    self.role.clone()
                } else {
                    name.as_str().to_owned()
                }
            })
            .filter(|name| self.schemas.contains(name))
            .collect()
    }

    /// Renders elements the way the server prints a `name[]` value.
    fn array_literal(elements: &[String]) -> String {
        let rendered: Vec<String> = elements
            .iter()
            .map(|el| {
                let plain = !el.is_empty()
                    && el
                        .chars()
                        .all(|c| !c.is_whitespace() && !matches!(c, ',' | '"' | '\\' | '{' | '}'));
                if plain {
                    el.clone()
                } else {
                    format!("\"{}\"", el.replace('\\', "\\\\").replace('"', "\\\""))
                }
            })
            .collect();
        format!("{{{}}}", rendered.join(","))
    }

    fn parse_one_ident(text: &str) -> Result<String> {
        let path = SearchPath::parse(text)?;
        if path.len() != 1 {
            return Err(bad_statement(text));
        }
        Ok(path.names()[0].as_str().to_owned())
    }
}

fn bad_statement(sql: &str) -> SchemataError {
    SchemataError::Connection(format!("unsupported statement: {sql}").into())
}

impl Executor for FakeSession {
    fn execute(&mut self, sql: &str) -> Result<()> {
        if let Some(rest) = sql.strip_prefix("SET search_path = ") {
            if let Some(n) = &mut self.sets_until_failure {
                if *n == 0 {
                    return Err(SchemataError::Connection("injected SET failure".into()));
                }
                *n -= 1;
            }
            // The server stores the raw setting text and echoes it on SHOW.
            SearchPath::parse(rest)?;
            self.setting = rest.to_owned();
            Ok(())
        } else if let Some(rest) = sql.strip_prefix("CREATE SCHEMA ") {
            let name = Self::parse_one_ident(rest)?;
            if !self.schemas.insert(name.clone()) {
                return Err(SchemataError::AlreadyExists(name));
            }
            Ok(())
        } else if let Some(rest) = sql.strip_prefix("ALTER SCHEMA ") {
            let (old_part, new_part) =
                rest.split_once(" RENAME TO ").ok_or_else(|| bad_statement(sql))?;
            let old = Self::parse_one_ident(old_part)?;
            let new = Self::parse_one_ident(new_part)?;
            if !self.schemas.contains(&old) {
                return Err(SchemataError::NotFound(old));
            }
            if self.schemas.contains(&new) {
                return Err(SchemataError::AlreadyExists(new));
            }
            self.schemas.remove(&old);
            self.schemas.insert(new);
            Ok(())
        } else {
            Err(bad_statement(sql))
        }
    }

    fn query_rows(&mut self, sql: &str) -> Result<Vec<Vec<String>>> {
        match sql {
            "SHOW search_path" => Ok(vec![vec![self.setting.clone()]]),
            "SELECT schema_name FROM information_schema.schemata" => {
                Ok(self.schemas.iter().map(|name| vec![name.clone()]).collect())
            }
            "SELECT current_schemas(false)" => {
                Ok(vec![vec![Self::array_literal(&self.resolved())]])
            }
            _ => Err(bad_statement(sql)),
        }
    }
}

fn manager() -> Schemata<FakeSession> {
    Schemata::new(FakeSession::new())
}

fn manager_with(setting: &str) -> Schemata<FakeSession> {
    Schemata::new(FakeSession::with_setting(setting))
}

fn path_names(db: &mut Schemata<FakeSession>) -> Vec<String> {
    db.search_path()
        .unwrap()
        .into_names()
        .into_iter()
        .map(SchemaName::into_string)
        .collect()
}

#[derive(Debug)]
enum TestError {
    Contrived,
    Schemata(SchemataError),
}

impl From<SchemataError> for TestError {
    fn from(err: SchemataError) -> Self {
        Self::Schemata(err)
    }
}

#[test]
fn test_schemata_includes_public_but_not_path_only_names() {
    let mut db = manager_with("foo, public");
    let schemas = db.schemata().unwrap();
    assert!(schemas.iter().any(|s| s == "public"));
    // `foo` is on the search path but was never created.
    assert!(!schemas.iter().any(|s| s == "foo"));
}

#[test]
fn test_search_path_reflects_configured_session() {
    let mut db = manager_with("foo, public");
    assert_eq!(path_names(&mut db), ["foo", "public"]);
}

#[test]
fn test_search_path_default_session() {
    let mut db = manager();
    assert_eq!(path_names(&mut db), ["$user", "public"]);
}

#[test]
fn test_set_search_path_single_name() {
    let mut db = manager_with("foo, public");
    db.set_search_path("bar").unwrap();
    assert_eq!(path_names(&mut db), ["bar"]);
}

#[test]
fn test_set_search_path_formatted_string() {
    let mut db = manager();
    db.set_search_path("bar, baz").unwrap();
    assert_eq!(path_names(&mut db), ["bar", "baz"]);
}

#[test]
fn test_set_search_path_str_sequence() {
    let mut db = manager();
    db.set_search_path(vec!["bar", "baz"]).unwrap();
    assert_eq!(path_names(&mut db), ["bar", "baz"]);
}

#[test]
fn test_set_search_path_string_sequence() {
    let mut db = manager();
    db.set_search_path(vec!["bar".to_string(), "baz".to_string()])
        .unwrap();
    assert_eq!(path_names(&mut db), ["bar", "baz"]);
}

#[test]
fn test_set_search_path_schema_name() {
    let mut db = manager();
    db.set_search_path(SchemaName::new("bar")).unwrap();
    assert_eq!(path_names(&mut db), ["bar"]);
}

#[test]
fn test_set_search_path_quoting_round_trip() {
    let mut db = manager();
    db.set_search_path(vec!["bar\" ',", "baz"]).unwrap();
    assert_eq!(path_names(&mut db), ["bar\" ',", "baz"]);
}

#[test]
fn test_set_search_path_rejects_empty_input() {
    let mut db = manager_with("foo, public");
    assert!(matches!(
        db.set_search_path(""),
        Err(SchemataError::InvalidInput(_))
    ));
    assert!(matches!(
        db.set_search_path(Vec::<String>::new()),
        Err(SchemataError::InvalidInput(_))
    ));
    // Nothing was sent to the server.
    assert_eq!(path_names(&mut db), ["foo", "public"]);
}

#[test]
fn test_with_search_path_swaps_and_restores() {
    let mut db = manager_with("foo, public");
    let inside: Vec<String> = db
        .with_search_path("bar", |db| Ok::<_, SchemataError>(path_names(db)))
        .unwrap();
    assert_eq!(inside, ["bar"]);
    assert_eq!(path_names(&mut db), ["foo", "public"]);
}

#[test]
fn test_with_search_path_multiple_names() {
    let mut db = manager_with("foo, public");
    let inside = db
        .with_search_path(vec!["bar", "baz"], |db| {
            Ok::<_, SchemataError>(path_names(db))
        })
        .unwrap();
    assert_eq!(inside, ["bar", "baz"]);
    assert_eq!(path_names(&mut db), ["foo", "public"]);
}

#[test]
fn test_with_search_path_restores_after_body_error() {
    let mut db = manager_with("foo, public");
    let result: std::result::Result<(), TestError> = db.with_search_path("bar", |db| {
        assert_eq!(path_names(db), ["bar"]);
        Err(TestError::Contrived)
    });
    assert!(matches!(result, Err(TestError::Contrived)));
    assert_eq!(path_names(&mut db), ["foo", "public"]);
}

#[test]
fn test_with_search_path_prepended() {
    let mut db = manager_with("foo, public");
    let inside = db
        .with_search_path_prepended("bar", |db| Ok::<_, SchemataError>(path_names(db)))
        .unwrap();
    assert_eq!(inside, ["bar", "foo", "public"]);
    assert_eq!(path_names(&mut db), ["foo", "public"]);
}

#[test]
fn test_nested_scopes_restore_enclosing_level() {
    let mut db = manager_with("foo, public");
    db.with_search_path("bar", |db| {
        let inner = db.with_search_path("baz", |db| {
            Ok::<_, SchemataError>(path_names(db))
        })?;
        assert_eq!(inner, ["baz"]);
        // Back to the enclosing scope, not the outermost default.
        assert_eq!(path_names(db), ["bar"]);
        Ok::<_, SchemataError>(())
    })
    .unwrap();
    assert_eq!(path_names(&mut db), ["foo", "public"]);
}

#[test]
fn test_current_schemata_resolves_only_existing() {
    let mut db = manager();
    // $user resolves to a role with no matching schema; only public exists.
    let current = db.current_schemata().unwrap();
    assert_eq!(current, [SchemaName::new("public")]);
}

#[test]
fn test_current_schemata_with_hostile_schema_name() {
    let mut db = manager();
    db.create_schema("bar\" ',").unwrap();
    db.set_search_path(vec!["bar\" ',", "public"]).unwrap();
    let current = db.current_schemata().unwrap();
    assert_eq!(
        current,
        [SchemaName::new("bar\" ',"), SchemaName::new("public")]
    );
}

#[test]
fn test_create_schema_then_listed() {
    let mut db = manager_with("foo, public");
    db.create_schema("test_schema").unwrap();
    assert!(db.schemata().unwrap().iter().any(|s| s == "test_schema"));
    // Not on the path under its new name yet.
    assert_eq!(db.current_schemata().unwrap(), [SchemaName::new("public")]);
}

#[test]
fn test_create_duplicate_schema_fails() {
    let mut db = manager();
    db.create_schema("test_schema").unwrap();
    assert!(matches!(
        db.create_schema("test_schema"),
        Err(SchemataError::AlreadyExists(_))
    ));
}

#[test]
fn test_rename_schema_visible_in_current_schemata() {
    let mut db = manager_with("foo, public");
    db.create_schema("test_schema").unwrap();
    db.rename_schema("test_schema", "foo").unwrap();
    let current = db.current_schemata().unwrap();
    assert_eq!(current, [SchemaName::new("foo"), SchemaName::new("public")]);
}

#[test]
fn test_rename_missing_schema_not_found() {
    let mut db = manager();
    assert!(matches!(
        db.rename_schema("no_such_schema", "foo"),
        Err(SchemataError::NotFound(_))
    ));
}

#[test]
fn test_rename_to_existing_schema_conflicts() {
    let mut db = manager();
    db.create_schema("test_schema").unwrap();
    assert!(matches!(
        db.rename_schema("test_schema", "public"),
        Err(SchemataError::AlreadyExists(_))
    ));
}

#[test]
fn test_restore_failure_after_body_success_surfaces_restore_error() {
    // The first SET (entering the scope) succeeds; the restore SET fails.
    let mut db = Schemata::new(FakeSession::with_setting("foo, public").failing_after_sets(1));
    let result: std::result::Result<(), SchemataError> =
        db.with_search_path("bar", |_| Ok(()));
    assert!(matches!(result, Err(SchemataError::Connection(_))));
    // Restoration was attempted but could not take effect.
    assert_eq!(path_names(&mut db), ["bar"]);
}

#[test]
fn test_restore_failure_after_body_error_keeps_body_error() {
    let mut db = Schemata::new(FakeSession::with_setting("foo, public").failing_after_sets(1));
    let result: std::result::Result<(), TestError> =
        db.with_search_path("bar", |_| Err(TestError::Contrived));
    // The body's error wins; the restore failure is reported, not returned.
    assert!(matches!(result, Err(TestError::Contrived)));
}

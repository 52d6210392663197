//! # Resource Locator
//!
//! Turns a request path into the resource it addresses:
//!
//! ```text
//! /{db}                        database
//! /{db}/rest/{table}           table
//! /{db}/rest/{table}/{key}     row (key may contain '/')
//! /{db}/query/{query-text}     query
//! /{db}/syncgroup/{anything}   syncgroup (reserved)
//! ```

use super::errors::{GatewayError, GatewayResult};
use super::resource::{DatabaseRef, RowRef, TableRef};

/// Action keyword in the second path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Rest,
    Query,
    Syncgroup,
}

impl Action {
    /// Match an action keyword, case-insensitively
    pub fn parse(segment: &str) -> GatewayResult<Self> {
        match segment.to_lowercase().as_str() {
            "rest" => Ok(Action::Rest),
            "query" => Ok(Action::Query),
            "syncgroup" => Ok(Action::Syncgroup),
            _ => Err(GatewayError::UnknownAction(segment.to_string())),
        }
    }
}

/// What a request path resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Database(DatabaseRef),
    Table(TableRef),
    Row(RowRef),
    Query { database: DatabaseRef, query: String },
    Syncgroup { database: DatabaseRef, remainder: String },
}

impl Target {
    /// Database every target lives under
    pub fn database(&self) -> &DatabaseRef {
        match self {
            Target::Database(db) => db,
            Target::Table(table) => table.database(),
            Target::Row(row) => row.table().database(),
            Target::Query { database, .. } => database,
            Target::Syncgroup { database, .. } => database,
        }
    }
}

/// Resolve a raw (already percent-decoded) request path
pub fn locate(path: &str) -> GatewayResult<Target> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(GatewayError::MalformedRequest(
            "expected request of the form /[Database Name]/[Action Name]/...".to_string(),
        ));
    }

    let mut parts = trimmed.splitn(3, '/');
    // splitn always yields a first item; it is non-empty because the
    // leading separators were stripped.
    let database = DatabaseRef::new(parts.next().unwrap_or_default());

    let action = match parts.next() {
        None => return Ok(Target::Database(database)),
        Some(segment) => Action::parse(segment)?,
    };
    let remainder = parts.next().unwrap_or_default().to_string();

    match action {
        Action::Rest => locate_rest(database, &remainder),
        Action::Query => Ok(Target::Query {
            database,
            query: remainder,
        }),
        Action::Syncgroup => Ok(Target::Syncgroup {
            database,
            remainder,
        }),
    }
}

fn locate_rest(database: DatabaseRef, remainder: &str) -> GatewayResult<Target> {
    let (table_name, key) = match remainder.split_once('/') {
        None => (remainder, None),
        Some((table_name, key)) => (table_name, Some(key)),
    };

    if table_name.is_empty() {
        return Err(GatewayError::MalformedRequest(
            "expected a table name after /rest/".to_string(),
        ));
    }
    let table = database.table(table_name);

    match key {
        None => Ok(Target::Table(table)),
        Some("") => Err(GatewayError::MalformedRequest(
            "expected a row key after the table name".to_string(),
        )),
        Some(key) => Ok(Target::Row(table.row(key))),
    }
}

//! # Memory Query Engine
//!
//! The small statement subset understood by [`MemoryApp::exec`]:
//!
//! ```text
//! select <col>[, <col>...] from <table>
//!     [where k = "<literal>" | where k like "<prefix>%"]
//!     [limit <n>]
//! ```
//!
//! Keywords are case-insensitive. Columns are `k` (row key) and `v` (row
//! value); `*` expands to `k, v`.
//!
//! [`MemoryApp::exec`]: super::MemoryApp

use std::sync::OnceLock;

use regex::Regex;

use super::errors::{StoreError, StoreResult};
use super::value::Value;

/// Projected column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Key,
    Value,
}

impl Column {
    fn header(&self) -> &'static str {
        match self {
            Column::Key => "k",
            Column::Value => "v",
        }
    }
}

/// Restriction on row keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyFilter {
    Equals(String),
    Prefix(String),
}

impl KeyFilter {
    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyFilter::Equals(lit) => key == lit,
            KeyFilter::Prefix(prefix) => key.starts_with(prefix.as_str()),
        }
    }
}

/// A parsed select statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub columns: Vec<Column>,
    pub table: String,
    pub filter: Option<KeyFilter>,
    pub limit: Option<usize>,
}

fn statement_regex() -> StoreResult<&'static Regex> {
    static RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?is)^\s*select\s+(?P<cols>.+?)\s+from\s+(?P<table>[^\s"]+)(?:\s+where\s+k\s+(?P<op>=|like)\s+"(?P<lit>[^"]*)")?(?:\s+limit\s+(?P<limit>\d+))?\s*$"#,
        )
    })
    .as_ref()
    .map_err(|e| StoreError::internal(format!("statement pattern: {}", e)))
}

impl Statement {
    /// Parse a statement
    pub fn parse(query: &str) -> StoreResult<Self> {
        let caps = statement_regex()?
            .captures(query)
            .ok_or_else(|| StoreError::query(format!("cannot parse statement: {}", query)))?;

        // Anchors guarantee both groups participate in every match.
        let cols = caps.name("cols").map(|m| m.as_str()).unwrap_or_default();
        let table = caps.name("table").map(|m| m.as_str()).unwrap_or_default();

        let columns = parse_columns(cols)?;

        let filter = match (caps.name("op"), caps.name("lit")) {
            (Some(op), Some(lit)) => Some(parse_filter(op.as_str(), lit.as_str())),
            _ => None,
        };

        let limit = caps
            .name("limit")
            .map(|m| {
                m.as_str()
                    .parse::<usize>()
                    .map_err(|_| StoreError::query(format!("invalid limit: {}", m.as_str())))
            })
            .transpose()?;

        Ok(Self {
            columns,
            table: table.to_string(),
            filter,
            limit,
        })
    }

    /// Header row for this statement
    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header().to_string()).collect()
    }

    /// Whether a row key passes the where clause
    pub fn matches(&self, key: &str) -> bool {
        self.filter.as_ref().map_or(true, |f| f.matches(key))
    }

    /// Project a row onto the selected columns
    pub fn project(&self, key: &str, value: &str) -> Vec<Value> {
        self.columns
            .iter()
            .map(|c| match c {
                Column::Key => Value::from(key),
                Column::Value => Value::from(value),
            })
            .collect()
    }
}

fn parse_columns(cols: &str) -> StoreResult<Vec<Column>> {
    let mut columns = Vec::new();
    for part in cols.split(',') {
        match part.trim() {
            "*" => {
                columns.push(Column::Key);
                columns.push(Column::Value);
            }
            "k" => columns.push(Column::Key),
            "v" => columns.push(Column::Value),
            "" => return Err(StoreError::query("empty column in select list")),
            other => return Err(StoreError::query(format!("unknown column: {}", other))),
        }
    }
    Ok(columns)
}

fn parse_filter(op: &str, lit: &str) -> KeyFilter {
    if op.eq_ignore_ascii_case("like") {
        if let Some(prefix) = lit.strip_suffix('%') {
            return KeyFilter::Prefix(prefix.to_string());
        }
    }
    KeyFilter::Equals(lit.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_select() {
        let stmt = Statement::parse("select k,v from t1").unwrap();
        assert_eq!(stmt.columns, vec![Column::Key, Column::Value]);
        assert_eq!(stmt.table, "t1");
        assert_eq!(stmt.filter, None);
        assert_eq!(stmt.limit, None);
        assert_eq!(stmt.headers(), vec!["k", "v"]);
    }

    #[test]
    fn test_parse_keywords_case_insensitive() {
        let stmt = Statement::parse("SELECT v FROM t1 WHERE k LIKE \"user/%\" LIMIT 5").unwrap();
        assert_eq!(stmt.columns, vec![Column::Value]);
        assert_eq!(stmt.filter, Some(KeyFilter::Prefix("user/".to_string())));
        assert_eq!(stmt.limit, Some(5));
    }

    #[test]
    fn test_parse_star() {
        let stmt = Statement::parse("select * from t1 where k = \"k1\"").unwrap();
        assert_eq!(stmt.headers(), vec!["k", "v"]);
        assert!(stmt.matches("k1"));
        assert!(!stmt.matches("k10"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Statement::parse("drop table t1"), Err(StoreError::Query(_))));
        assert!(matches!(Statement::parse("select x from t1"), Err(StoreError::Query(_))));
        assert!(matches!(Statement::parse("select k,,v from t1"), Err(StoreError::Query(_))));
    }

    #[test]
    fn test_project() {
        let stmt = Statement::parse("select v, k from t1").unwrap();
        assert_eq!(
            stmt.project("k1", "v1"),
            vec![Value::from("v1"), Value::from("k1")]
        );
    }
}

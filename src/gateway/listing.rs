//! # Listing Formatter
//!
//! Collection GETs answer with a JSON array of resource URLs:
//! `"//{db}/{table}"` for tables and `"//{db}/{table}/{key}"` for rows.

use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::store::KeyStream;

use super::dispatch::store_failure;
use super::errors::{GatewayError, GatewayResult};
use super::resource::{DatabaseRef, TableRef};

/// Successful gateway reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// 200 with no body
    Empty,
    /// 200 with a serialized JSON document
    Json(String),
    /// 200 with a raw stored value
    Raw(String),
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Empty => ().into_response(),
            Reply::Json(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
            Reply::Raw(body) => {
                ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
            }
        }
    }
}

/// Serialize any value into a JSON reply
pub fn json_reply<T: serde::Serialize>(value: &T) -> GatewayResult<Reply> {
    serde_json::to_string(value)
        .map(Reply::Json)
        .map_err(|e| GatewayError::backend(format!("error generating JSON: {}", e)))
}

/// URL of a table
pub fn table_url(database: &DatabaseRef, table: &str) -> String {
    format!("//{}/{}", database.name(), table)
}

/// URL of a row
pub fn row_url(table: &TableRef, key: &str) -> String {
    format!("//{}/{}/{}", table.database().name(), table.name(), key)
}

/// Drain a key stream, failing on the first stream error. A mid-stream
/// error is a store failure like any other and is logged as one.
pub fn drain_keys(stream: KeyStream, what: &'static str) -> GatewayResult<Vec<String>> {
    stream.collect::<Result<Vec<_>, _>>().map_err(store_failure(what))
}

/// JSON array of table URLs
pub fn table_listing(database: &DatabaseRef, tables: &[String]) -> GatewayResult<Reply> {
    let urls: Vec<String> = tables.iter().map(|t| table_url(database, t)).collect();
    json_reply(&urls)
}

/// JSON array of row URLs
pub fn row_listing(table: &TableRef, keys: &[String]) -> GatewayResult<Reply> {
    let urls: Vec<String> = keys.iter().map(|k| row_url(table, k)).collect();
    json_reply(&urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn test_table_listing() {
        let db = DatabaseRef::new("d1");
        let reply = table_listing(&db, &["t1".to_string(), "t2".to_string()]).unwrap();
        assert_eq!(reply, Reply::Json(r#"["//d1/t1","//d1/t2"]"#.to_string()));
    }

    #[test]
    fn test_empty_listing_is_empty_array() {
        let table = DatabaseRef::new("d1").table("t1");
        assert_eq!(row_listing(&table, &[]).unwrap(), Reply::Json("[]".to_string()));
    }

    #[test]
    fn test_row_url() {
        let table = DatabaseRef::new("d1").table("t1");
        assert_eq!(row_url(&table, "a/b"), "//d1/t1/a/b");
    }

    #[test]
    fn test_drain_keys_surfaces_stream_errors() {
        let stream: KeyStream = Box::new(
            vec![Ok("k1".to_string()), Err(StoreError::internal("broken"))].into_iter(),
        );
        let err = drain_keys(stream, "table.Scan()").unwrap_err();
        assert!(matches!(err, GatewayError::Backend(_)));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_drain_keys_reports_like_other_store_failures() {
        let stream: KeyStream = Box::new(std::iter::once(Err(StoreError::internal("reset"))));
        let err = drain_keys(stream, "db.ListTables()").unwrap_err();

        let direct = store_failure("db.ListTables()")(StoreError::internal("reset"));
        assert_eq!(err, direct);
        assert!(err.to_string().starts_with("error in db.ListTables(): "));
    }

    #[test]
    fn test_reply_content_types() {
        let response = Reply::Json("[]".to_string()).into_response();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let response = Reply::Raw("v1".to_string()).into_response();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }
}

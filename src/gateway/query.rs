//! # Query Forwarder
//!
//! Hands the opaque query text to the store and materializes the result
//! stream as a JSON array of `{column: string}` objects.
//!
//! Every cell is rendered with its string form; typed values are not
//! preserved in the output.

use std::collections::BTreeMap;

use axum::http::Method;

use crate::observability::{log_event_with_fields, Event};
use crate::store::{App, QueryResult};

use super::dispatch::store_failure;
use super::errors::{GatewayError, GatewayResult};
use super::listing::{json_reply, Reply};
use super::resource::DatabaseRef;

/// One result row keyed by header name
pub type Record = BTreeMap<String, String>;

/// GET `/{db}/query/{query}`
pub fn forward_query(
    app: &dyn App,
    db: &DatabaseRef,
    query: &str,
    method: &Method,
) -> GatewayResult<Reply> {
    if *method != Method::GET {
        return Err(GatewayError::unsupported("unsupported HTTP method"));
    }

    let result = app.exec(db.name(), query).map_err(store_failure("db.Exec()"))?;
    let headers = result.headers.join(",");
    let records = materialize(result)?;

    let rows = records.len().to_string();
    log_event_with_fields(
        Event::QueryExecuted,
        &[
            ("database", db.name()),
            ("headers", headers.as_str()),
            ("rows", rows.as_str()),
        ],
    );

    json_reply(&records)
}

/// Drain the result stream into records. Cells beyond the header row are
/// dropped; a row shorter than the header row yields fewer entries.
pub fn materialize(result: QueryResult) -> GatewayResult<Vec<Record>> {
    let QueryResult { headers, rows } = result;
    let mut records = Vec::new();

    for row in rows {
        let values = row.map_err(store_failure("db.Exec() result stream"))?;
        let record: Record = headers
            .iter()
            .zip(values.iter())
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();
        records.push(record);
    }

    Ok(records)
}

/// Any verb on `/{db}/syncgroup/...`
pub fn handle_syncgroup(_db: &DatabaseRef, _remainder: &str) -> GatewayResult<Reply> {
    Err(GatewayError::NotImplemented(
        "syncgroup support not yet implemented".to_string(),
    ))
}

//! # Request Router
//!
//! Entry point for one request: locate the resource, then hand off to the
//! dispatcher, the query forwarder or the syncgroup stub.

use axum::http::Method;

use crate::store::App;

use super::dispatch::{handle_database, handle_rest_row, handle_rest_table};
use super::errors::GatewayResult;
use super::listing::Reply;
use super::locator::{locate, Target};
use super::query::{forward_query, handle_syncgroup};

/// Handle one request against the backing app. Blocks on store round-trips.
pub fn route(app: &dyn App, method: &Method, path: &str, body: &[u8]) -> GatewayResult<Reply> {
    match locate(path)? {
        Target::Database(db) => handle_database(app, &db, method),
        Target::Table(table) => handle_rest_table(app, &table, method),
        Target::Row(row) => handle_rest_row(app, &row, method, body),
        Target::Query { database, query } => forward_query(app, &database, &query, method),
        Target::Syncgroup {
            database,
            remainder,
        } => handle_syncgroup(&database, &remainder),
    }
}

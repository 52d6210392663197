//! # Existence-Gated CRUD Dispatcher
//!
//! Each resource level runs the same shape:
//! check existence → branch on (verb, existence) → act → map outcome.
//!
//! Every mutation is preceded by a fresh existence check so the gateway can
//! answer 404/409 itself. Check and act are two round-trips; a concurrent
//! writer between them is not detected.

use axum::http::Method;

use crate::observability::{log_event_with_fields, Event};
use crate::store::{App, StoreError};

use super::errors::{GatewayError, GatewayResult};
use super::listing::{drain_keys, row_listing, table_listing, Reply};
use super::resource::{DatabaseRef, RowRef, TableRef};

/// Map a failed store call to a 500, logging it
pub(crate) fn store_failure(op: &'static str) -> impl FnOnce(StoreError) -> GatewayError {
    move |err| {
        let detail = err.to_string();
        log_event_with_fields(Event::StoreFailure, &[("op", op), ("error", detail.as_str())]);
        GatewayError::backend(format!("error in {}: {}", op, detail))
    }
}

/// Database level: GET lists tables, POST creates
pub fn handle_database(app: &dyn App, db: &DatabaseRef, method: &Method) -> GatewayResult<Reply> {
    match *method {
        Method::GET => {
            let exists = db.exists(app).map_err(store_failure("db.Exists()"))?;
            if !exists {
                return Err(GatewayError::not_found("database doesn't exist"));
            }
            let stream = db.list_tables(app).map_err(store_failure("db.ListTables()"))?;
            let tables = drain_keys(stream, "db.ListTables()")?;
            table_listing(db, &tables)
        }
        Method::POST => {
            let exists = db.exists(app).map_err(store_failure("db.Exists()"))?;
            if exists {
                return Err(GatewayError::conflict("database already exists"));
            }
            db.create(app).map_err(store_failure("db.Create()"))?;
            Ok(Reply::Empty)
        }
        _ => Err(GatewayError::unsupported("unsupported method for database")),
    }
}

/// Table level: GET lists row keys, POST creates
pub fn handle_table(app: &dyn App, table: &TableRef, method: &Method) -> GatewayResult<Reply> {
    match *method {
        Method::GET => {
            let exists = table.exists(app).map_err(store_failure("table.Exists()"))?;
            if !exists {
                return Err(GatewayError::not_found("table doesn't exist"));
            }
            let stream = table.scan(app, "").map_err(store_failure("table.Scan()"))?;
            let keys = drain_keys(stream, "table.Scan()")?;
            row_listing(table, &keys)
        }
        Method::POST => {
            let exists = table.exists(app).map_err(store_failure("table.Exists()"))?;
            if exists {
                return Err(GatewayError::conflict("table already exists"));
            }
            table.create(app).map_err(store_failure("table.Create()"))?;
            Ok(Reply::Empty)
        }
        _ => Err(GatewayError::unsupported("unsupported method for table")),
    }
}

/// Row level: GET/PUT/DELETE need the row, POST needs it absent
pub fn handle_row(app: &dyn App, row: &RowRef, method: &Method, body: &[u8]) -> GatewayResult<Reply> {
    let must_exist = match *method {
        Method::GET | Method::PUT | Method::DELETE => true,
        Method::POST => false,
        _ => return Err(GatewayError::unsupported("unsupported method for row")),
    };

    let exists = row.exists(app).map_err(store_failure("row.Exists()"))?;
    match (must_exist, exists) {
        (true, false) => return Err(GatewayError::not_found("specified row does not exist")),
        (false, true) => return Err(GatewayError::conflict("specified row already exists")),
        _ => {}
    }

    match *method {
        Method::GET => {
            let value = row.get(app).map_err(store_failure("row.Get()"))?;
            Ok(Reply::Raw(value))
        }
        Method::DELETE => {
            row.delete(app).map_err(store_failure("row.Delete()"))?;
            Ok(Reply::Empty)
        }
        // PUT and POST
        _ => {
            let value = std::str::from_utf8(body)
                .map_err(|e| GatewayError::InvalidBody(format!("row values must be UTF-8: {}", e)))?;
            row.put(app, value).map_err(store_failure("row.Put()"))?;
            Ok(Reply::Empty)
        }
    }
}

/// REST sub-route. The owning database is checked once, then the table
/// (for row targets) before dispatching to the row level.
pub fn handle_rest_table(app: &dyn App, table: &TableRef, method: &Method) -> GatewayResult<Reply> {
    require_database(app, table.database())?;
    handle_table(app, table, method)
}

/// REST sub-route for a single row
pub fn handle_rest_row(
    app: &dyn App,
    row: &RowRef,
    method: &Method,
    body: &[u8],
) -> GatewayResult<Reply> {
    let table = row.table();
    require_database(app, table.database())?;

    let exists = table.exists(app).map_err(store_failure("table.Exists()"))?;
    if !exists {
        return Err(GatewayError::not_found("table doesn't exist"));
    }

    let method_name = method.as_str();
    let value_len = body.len().to_string();
    log_event_with_fields(
        Event::RowAccess,
        &[
            ("database", table.database().name()),
            ("table", table.name()),
            ("key", row.key()),
            ("method", method_name),
            ("body_bytes", value_len.as_str()),
        ],
    );

    handle_row(app, row, method, body)
}

fn require_database(app: &dyn App, db: &DatabaseRef) -> GatewayResult<()> {
    let exists = db.exists(app).map_err(store_failure("db.Exists()"))?;
    if !exists {
        return Err(GatewayError::not_found("database doesn't exist"));
    }
    Ok(())
}

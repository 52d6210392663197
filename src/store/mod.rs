//! # Backing Store
//!
//! The hierarchical store the gateway fronts: service → app → database →
//! table → row. The gateway only talks to it through the [`Service`] and
//! [`App`] traits.
//!
//! All calls are blocking round-trips. Nothing here is cached: every
//! `*_exists` call re-reads the store.

pub mod errors;
pub mod memory;
pub mod query;
pub mod value;

use std::sync::Arc;

pub use errors::{StoreError, StoreResult};
pub use memory::{MemoryApp, MemoryService};
pub use value::Value;

/// Name of the bundled in-process service
pub const MEMORY_SERVICE: &str = "memory";

/// Lazy, single-pass sequence of keys (table names or row keys)
pub type KeyStream = Box<dyn Iterator<Item = StoreResult<String>> + Send>;

/// Lazy, single-pass sequence of query result rows
pub type ResultStream = Box<dyn Iterator<Item = StoreResult<Vec<Value>>> + Send>;

/// Output of a query: the header row plus the result stream
pub struct QueryResult {
    pub headers: Vec<String>,
    pub rows: ResultStream,
}

impl std::fmt::Debug for QueryResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryResult")
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// A backing service hosting named applications
pub trait Service: Send + Sync {
    /// Handle to a named app. The handle is returned whether or not the
    /// app has been created.
    fn app(&self, name: &str) -> Arc<dyn App>;
}

/// Connection to one application inside a service
pub trait App: Send + Sync {
    /// App name
    fn name(&self) -> &str;

    /// Check whether the app itself exists
    fn exists(&self) -> StoreResult<bool>;

    /// Create the app
    fn create(&self) -> StoreResult<()>;

    fn database_exists(&self, db: &str) -> StoreResult<bool>;

    fn create_database(&self, db: &str) -> StoreResult<()>;

    /// Enumerate the tables of a database
    fn list_tables(&self, db: &str) -> StoreResult<KeyStream>;

    fn table_exists(&self, db: &str, table: &str) -> StoreResult<bool>;

    fn create_table(&self, db: &str, table: &str) -> StoreResult<()>;

    /// Enumerate row keys starting with `prefix` (empty = unbounded)
    fn scan(&self, db: &str, table: &str, prefix: &str) -> StoreResult<KeyStream>;

    fn row_exists(&self, db: &str, table: &str, key: &str) -> StoreResult<bool>;

    /// Read a row value
    fn get(&self, db: &str, table: &str, key: &str) -> StoreResult<String>;

    /// Create or overwrite a row value
    fn put(&self, db: &str, table: &str, key: &str, value: &str) -> StoreResult<()>;

    /// Delete a row
    fn delete(&self, db: &str, table: &str, key: &str) -> StoreResult<()>;

    /// Execute an opaque query against a database
    fn exec(&self, db: &str, query: &str) -> StoreResult<QueryResult>;
}

/// Connect to a backing service by name.
///
/// Only the bundled in-process service is available.
pub fn connect(service: &str) -> StoreResult<Arc<dyn Service>> {
    match service {
        "" | MEMORY_SERVICE => Ok(Arc::new(MemoryService::new())),
        other => Err(StoreError::no_exist(format!("service {}", other))),
    }
}

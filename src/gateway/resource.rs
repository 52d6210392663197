//! # Resource References
//!
//! Typed pointers into the backing hierarchy. They carry only names, are
//! built fresh for every request and never cache existence.

use crate::store::{App, KeyStream, StoreResult};

/// A database inside the connected app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseRef {
    name: String,
}

impl DatabaseRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table under this database
    pub fn table(&self, name: impl Into<String>) -> TableRef {
        TableRef {
            database: self.clone(),
            name: name.into(),
        }
    }

    pub fn exists(&self, app: &dyn App) -> StoreResult<bool> {
        app.database_exists(&self.name)
    }

    pub fn create(&self, app: &dyn App) -> StoreResult<()> {
        app.create_database(&self.name)
    }

    pub fn list_tables(&self, app: &dyn App) -> StoreResult<KeyStream> {
        app.list_tables(&self.name)
    }
}

/// A table inside a database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    database: DatabaseRef,
    name: String,
}

impl TableRef {
    pub fn database(&self) -> &DatabaseRef {
        &self.database
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Row under this table
    pub fn row(&self, key: impl Into<String>) -> RowRef {
        RowRef {
            table: self.clone(),
            key: key.into(),
        }
    }

    pub fn exists(&self, app: &dyn App) -> StoreResult<bool> {
        app.table_exists(self.database.name(), &self.name)
    }

    pub fn create(&self, app: &dyn App) -> StoreResult<()> {
        app.create_table(self.database.name(), &self.name)
    }

    /// Keys starting with `prefix`; the empty prefix scans the whole table
    pub fn scan(&self, app: &dyn App, prefix: &str) -> StoreResult<KeyStream> {
        app.scan(self.database.name(), &self.name, prefix)
    }
}

/// A single row inside a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRef {
    table: TableRef,
    key: String,
}

impl RowRef {
    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn exists(&self, app: &dyn App) -> StoreResult<bool> {
        app.row_exists(self.table.database().name(), self.table.name(), &self.key)
    }

    pub fn get(&self, app: &dyn App) -> StoreResult<String> {
        app.get(self.table.database().name(), self.table.name(), &self.key)
    }

    pub fn put(&self, app: &dyn App, value: &str) -> StoreResult<()> {
        app.put(self.table.database().name(), self.table.name(), &self.key, value)
    }

    pub fn delete(&self, app: &dyn App) -> StoreResult<()> {
        app.delete(self.table.database().name(), self.table.name(), &self.key)
    }
}

//! # In-Memory Backing Store
//!
//! Process-local implementation of [`Service`] and [`App`]. Every level is
//! an ordered map, so listings and scans come back in ascending key order.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::errors::{StoreError, StoreResult};
use super::query::Statement;
use super::{App, KeyStream, QueryResult, Service};

type Rows = BTreeMap<String, String>;

#[derive(Debug, Default)]
struct DatabaseData {
    tables: BTreeMap<String, Rows>,
}

#[derive(Debug, Default)]
struct AppData {
    databases: BTreeMap<String, DatabaseData>,
}

type Apps = Arc<RwLock<BTreeMap<String, AppData>>>;

/// In-memory service holding any number of apps
#[derive(Debug, Clone, Default)]
pub struct MemoryService {
    apps: Apps,
}

impl MemoryService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Service for MemoryService {
    fn app(&self, name: &str) -> Arc<dyn App> {
        Arc::new(MemoryApp {
            name: name.to_string(),
            apps: Arc::clone(&self.apps),
        })
    }
}

/// Handle to one app of a [`MemoryService`]
#[derive(Debug, Clone)]
pub struct MemoryApp {
    name: String,
    apps: Apps,
}

impl MemoryApp {
    /// Standalone app on its own private service, already created
    pub fn standalone(name: &str) -> Self {
        let mut apps = BTreeMap::new();
        apps.insert(name.to_string(), AppData::default());
        Self {
            name: name.to_string(),
            apps: Arc::new(RwLock::new(apps)),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<String, AppData>>> {
        self.apps
            .read()
            .map_err(|_| StoreError::internal("Lock poisoned"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<String, AppData>>> {
        self.apps
            .write()
            .map_err(|_| StoreError::internal("Lock poisoned"))
    }

    fn with_db<T>(&self, db: &str, f: impl FnOnce(&DatabaseData) -> StoreResult<T>) -> StoreResult<T> {
        let apps = self.read()?;
        let app = apps
            .get(&self.name)
            .ok_or_else(|| StoreError::no_exist(format!("app {}", self.name)))?;
        let data = app
            .databases
            .get(db)
            .ok_or_else(|| StoreError::no_exist(format!("database {}", db)))?;
        f(data)
    }

    fn with_db_mut<T>(
        &self,
        db: &str,
        f: impl FnOnce(&mut DatabaseData) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut apps = self.write()?;
        let app = apps
            .get_mut(&self.name)
            .ok_or_else(|| StoreError::no_exist(format!("app {}", self.name)))?;
        let data = app
            .databases
            .get_mut(db)
            .ok_or_else(|| StoreError::no_exist(format!("database {}", db)))?;
        f(data)
    }

    fn with_table<T>(&self, db: &str, table: &str, f: impl FnOnce(&Rows) -> StoreResult<T>) -> StoreResult<T> {
        self.with_db(db, |data| {
            let rows = data
                .tables
                .get(table)
                .ok_or_else(|| StoreError::no_exist(format!("table {}/{}", db, table)))?;
            f(rows)
        })
    }

    fn with_table_mut<T>(
        &self,
        db: &str,
        table: &str,
        f: impl FnOnce(&mut Rows) -> StoreResult<T>,
    ) -> StoreResult<T> {
        self.with_db_mut(db, |data| {
            let rows = data
                .tables
                .get_mut(table)
                .ok_or_else(|| StoreError::no_exist(format!("table {}/{}", db, table)))?;
            f(rows)
        })
    }
}

fn key_stream(keys: Vec<String>) -> KeyStream {
    Box::new(keys.into_iter().map(Ok))
}

impl App for MemoryApp {
    fn name(&self) -> &str {
        &self.name
    }

    fn exists(&self) -> StoreResult<bool> {
        Ok(self.read()?.contains_key(&self.name))
    }

    fn create(&self) -> StoreResult<()> {
        let mut apps = self.write()?;
        if apps.contains_key(&self.name) {
            return Err(StoreError::exist(format!("app {}", self.name)));
        }
        apps.insert(self.name.clone(), AppData::default());
        Ok(())
    }

    fn database_exists(&self, db: &str) -> StoreResult<bool> {
        let apps = self.read()?;
        let app = apps
            .get(&self.name)
            .ok_or_else(|| StoreError::no_exist(format!("app {}", self.name)))?;
        Ok(app.databases.contains_key(db))
    }

    fn create_database(&self, db: &str) -> StoreResult<()> {
        let mut apps = self.write()?;
        let app = apps
            .get_mut(&self.name)
            .ok_or_else(|| StoreError::no_exist(format!("app {}", self.name)))?;
        if app.databases.contains_key(db) {
            return Err(StoreError::exist(format!("database {}", db)));
        }
        app.databases.insert(db.to_string(), DatabaseData::default());
        Ok(())
    }

    fn list_tables(&self, db: &str) -> StoreResult<KeyStream> {
        self.with_db(db, |data| Ok(key_stream(data.tables.keys().cloned().collect())))
    }

    fn table_exists(&self, db: &str, table: &str) -> StoreResult<bool> {
        self.with_db(db, |data| Ok(data.tables.contains_key(table)))
    }

    fn create_table(&self, db: &str, table: &str) -> StoreResult<()> {
        self.with_db_mut(db, |data| {
            if data.tables.contains_key(table) {
                return Err(StoreError::exist(format!("table {}/{}", db, table)));
            }
            data.tables.insert(table.to_string(), Rows::new());
            Ok(())
        })
    }

    fn scan(&self, db: &str, table: &str, prefix: &str) -> StoreResult<KeyStream> {
        self.with_table(db, table, |rows| {
            let keys = rows
                .range(prefix.to_string()..)
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, _)| k.clone())
                .collect();
            Ok(key_stream(keys))
        })
    }

    fn row_exists(&self, db: &str, table: &str, key: &str) -> StoreResult<bool> {
        self.with_table(db, table, |rows| Ok(rows.contains_key(key)))
    }

    fn get(&self, db: &str, table: &str, key: &str) -> StoreResult<String> {
        self.with_table(db, table, |rows| {
            rows.get(key)
                .cloned()
                .ok_or_else(|| StoreError::no_exist(format!("row {}/{}/{}", db, table, key)))
        })
    }

    fn put(&self, db: &str, table: &str, key: &str, value: &str) -> StoreResult<()> {
        self.with_table_mut(db, table, |rows| {
            rows.insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    fn delete(&self, db: &str, table: &str, key: &str) -> StoreResult<()> {
        self.with_table_mut(db, table, |rows| {
            rows.remove(key);
            Ok(())
        })
    }

    fn exec(&self, db: &str, query: &str) -> StoreResult<QueryResult> {
        let stmt = Statement::parse(query)?;

        let rows = self.with_db(db, |data| {
            let rows = data
                .tables
                .get(&stmt.table)
                .ok_or_else(|| StoreError::query(format!("table {} does not exist", stmt.table)))?;
            Ok(rows
                .iter()
                .filter(|(k, _)| stmt.matches(k))
                .take(stmt.limit.unwrap_or(usize::MAX))
                .map(|(k, v)| stmt.project(k, v))
                .collect::<Vec<_>>())
        })?;

        Ok(QueryResult {
            headers: stmt.headers(),
            rows: Box::new(rows.into_iter().map(Ok)),
        })
    }
}

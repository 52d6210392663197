//! Shared helpers for the HTTP-level gateway tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use rowgate::http_server::{build_router, GatewayConfig, GatewayState};
use rowgate::store::{App, KeyStream, MemoryApp, QueryResult, StoreError, StoreResult};

/// A response with its body read to a string
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body is not JSON")
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }
}

/// Router over any app
pub fn router_for(app: Arc<dyn App>) -> Router {
    build_router(&GatewayConfig::default(), Arc::new(GatewayState::new(app)))
}

/// Router over a fresh in-memory app
pub fn memory_router() -> Router {
    router_for(Arc::new(MemoryApp::standalone("test_app")))
}

/// Send one request through the router
pub async fn send(router: &Router, method: Method, uri: &str, body: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_string()))
        .expect("valid request");

    let response = router.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");

    TestResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

// =============================================================================
// Mock Apps
// =============================================================================

/// Store operation a [`FailingApp`] breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    DatabaseExists,
    CreateDatabase,
    ListTables,
    TableExists,
    CreateTable,
    Scan,
    ScanStream,
    RowExists,
    Get,
    Put,
    Delete,
    Exec,
}

/// Wraps a memory app and fails exactly one operation
pub struct FailingApp {
    inner: MemoryApp,
    fail: FailOn,
}

impl FailingApp {
    pub fn new(inner: MemoryApp, fail: FailOn) -> Self {
        Self { inner, fail }
    }

    fn check(&self, op: FailOn) -> StoreResult<()> {
        if self.fail == op {
            Err(StoreError::internal(format!("injected failure in {:?}", op)))
        } else {
            Ok(())
        }
    }
}

impl App for FailingApp {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn exists(&self) -> StoreResult<bool> {
        self.inner.exists()
    }

    fn create(&self) -> StoreResult<()> {
        self.inner.create()
    }

    fn database_exists(&self, db: &str) -> StoreResult<bool> {
        self.check(FailOn::DatabaseExists)?;
        self.inner.database_exists(db)
    }

    fn create_database(&self, db: &str) -> StoreResult<()> {
        self.check(FailOn::CreateDatabase)?;
        self.inner.create_database(db)
    }

    fn list_tables(&self, db: &str) -> StoreResult<KeyStream> {
        self.check(FailOn::ListTables)?;
        self.inner.list_tables(db)
    }

    fn table_exists(&self, db: &str, table: &str) -> StoreResult<bool> {
        self.check(FailOn::TableExists)?;
        self.inner.table_exists(db, table)
    }

    fn create_table(&self, db: &str, table: &str) -> StoreResult<()> {
        self.check(FailOn::CreateTable)?;
        self.inner.create_table(db, table)
    }

    fn scan(&self, db: &str, table: &str, prefix: &str) -> StoreResult<KeyStream> {
        self.check(FailOn::Scan)?;
        let stream = self.inner.scan(db, table, prefix)?;
        if self.fail == FailOn::ScanStream {
            let broken = std::iter::once(Err(StoreError::internal("stream reset")));
            return Ok(Box::new(stream.chain(broken)));
        }
        Ok(stream)
    }

    fn row_exists(&self, db: &str, table: &str, key: &str) -> StoreResult<bool> {
        self.check(FailOn::RowExists)?;
        self.inner.row_exists(db, table, key)
    }

    fn get(&self, db: &str, table: &str, key: &str) -> StoreResult<String> {
        self.check(FailOn::Get)?;
        self.inner.get(db, table, key)
    }

    fn put(&self, db: &str, table: &str, key: &str, value: &str) -> StoreResult<()> {
        self.check(FailOn::Put)?;
        self.inner.put(db, table, key, value)
    }

    fn delete(&self, db: &str, table: &str, key: &str) -> StoreResult<()> {
        self.check(FailOn::Delete)?;
        self.inner.delete(db, table, key)
    }

    fn exec(&self, db: &str, query: &str) -> StoreResult<QueryResult> {
        self.check(FailOn::Exec)?;
        self.inner.exec(db, query)
    }
}

/// Wraps a memory app and counts mutating calls
pub struct CountingApp {
    inner: MemoryApp,
    mutations: AtomicUsize,
}

impl CountingApp {
    pub fn new(inner: MemoryApp) -> Self {
        Self {
            inner,
            mutations: AtomicUsize::new(0),
        }
    }

    pub fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    fn mutated(&self) {
        self.mutations.fetch_add(1, Ordering::SeqCst);
    }
}

impl App for CountingApp {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn exists(&self) -> StoreResult<bool> {
        self.inner.exists()
    }

    fn create(&self) -> StoreResult<()> {
        self.mutated();
        self.inner.create()
    }

    fn database_exists(&self, db: &str) -> StoreResult<bool> {
        self.inner.database_exists(db)
    }

    fn create_database(&self, db: &str) -> StoreResult<()> {
        self.mutated();
        self.inner.create_database(db)
    }

    fn list_tables(&self, db: &str) -> StoreResult<KeyStream> {
        self.inner.list_tables(db)
    }

    fn table_exists(&self, db: &str, table: &str) -> StoreResult<bool> {
        self.inner.table_exists(db, table)
    }

    fn create_table(&self, db: &str, table: &str) -> StoreResult<()> {
        self.mutated();
        self.inner.create_table(db, table)
    }

    fn scan(&self, db: &str, table: &str, prefix: &str) -> StoreResult<KeyStream> {
        self.inner.scan(db, table, prefix)
    }

    fn row_exists(&self, db: &str, table: &str, key: &str) -> StoreResult<bool> {
        self.inner.row_exists(db, table, key)
    }

    fn get(&self, db: &str, table: &str, key: &str) -> StoreResult<String> {
        self.inner.get(db, table, key)
    }

    fn put(&self, db: &str, table: &str, key: &str, value: &str) -> StoreResult<()> {
        self.mutated();
        self.inner.put(db, table, key, value)
    }

    fn delete(&self, db: &str, table: &str, key: &str) -> StoreResult<()> {
        self.mutated();
        self.inner.delete(db, table, key)
    }

    fn exec(&self, db: &str, query: &str) -> StoreResult<QueryResult> {
        self.inner.exec(db, query)
    }
}

/// Memory app with `d1`, table `t1` and row `k1` = `v1`
pub fn seeded_memory_app() -> MemoryApp {
    let app = MemoryApp::standalone("test_app");
    app.create_database("d1").unwrap();
    app.create_table("d1", "t1").unwrap();
    app.put("d1", "t1", "k1", "v1").unwrap();
    app
}

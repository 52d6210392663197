//! rowgate - REST gateway over a hierarchical app/database/table/row store
//!
//! Requests flow: HTTP server → resource locator → existence-gated
//! dispatcher or query forwarder → backing store.

pub mod cli;
pub mod gateway;
pub mod http_server;
pub mod observability;
pub mod store;

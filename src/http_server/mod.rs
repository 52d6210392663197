//! # HTTP Server Module
//!
//! Serves the gateway over plain HTTP with Axum. A single catch-all route
//! passes the percent-decoded path, the verb and the body to
//! [`crate::gateway::route`].

pub mod config;
pub mod server;

pub use config::GatewayConfig;
pub use server::{build_router, GatewayServer, GatewayState};

//! Observable gateway events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events in the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Backing app did not exist and was created
    AppCreated,
    /// Connected to an existing backing app
    AppConnected,
    /// Listener bound, serving requests
    ServeStart,
    /// Startup failed (FATAL)
    BootFailed,

    // Requests
    /// A request finished with a response
    RequestHandled,
    /// Row-level operation about to run
    RowAccess,
    /// Query forwarded and materialized
    QueryExecuted,
    /// A backing-store round-trip failed
    StoreFailure,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "ROWGATE_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::AppCreated => "APP_CREATED",
            Event::AppConnected => "APP_CONNECTED",
            Event::ServeStart => "ROWGATE_SERVING",
            Event::BootFailed => "ROWGATE_STARTUP_FAILED",
            Event::RequestHandled => "REQUEST_HANDLED",
            Event::RowAccess => "ROW_ACCESS",
            Event::QueryExecuted => "QUERY_COMPLETE",
            Event::StoreFailure => "STORE_FAILURE",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::BootFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

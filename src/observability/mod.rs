//! Observability for the gateway
//!
//! Structured JSON logging of lifecycle and request events.
//!
//! ```ignore
//! use rowgate::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::RequestHandled, &[("status", "200")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log an event with fields. Fatal events log at FATAL, store failures at
/// ERROR, everything else at INFO.
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    if event.is_fatal() {
        Logger::fatal(event.as_str(), fields);
    } else if event == Event::StoreFailure {
        Logger::error(event.as_str(), fields);
    } else {
        Logger::info(event.as_str(), fields);
    }
}

//! Observability for preflight
//!
//! # Principles
//!
//! - Structured logs (JSON), one line per event
//! - Deterministic key ordering
//! - Synchronous, no buffering, no background threads
//! - Events fire at subsystem boundaries only; the recursive validation
//!   core never logs

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event.
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields.
///
/// ERROR and FATAL events go to stderr, everything else to stdout.
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = event.severity();
    if severity >= Severity::Error {
        Logger::log_stderr(severity, event.as_str(), fields);
    } else {
        Logger::log(severity, event.as_str(), fields);
    }
}

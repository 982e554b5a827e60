//! Observable events
//!
//! Events are explicit and typed; free-form event strings are not accepted
//! at call sites.

use std::fmt;

use super::logger::Severity;

/// Observable events in preflight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A shape set was parsed and passed its integrity check
    ShapeSetLoaded,
    /// A validation pass rejected the supplied parameters
    ValidationRejected,
    /// A shape reference failed to resolve during traversal (FATAL)
    ShapeFault,
}

impl Event {
    /// Returns the event name as emitted in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ShapeSetLoaded => "SHAPE_SET_LOADED",
            Event::ValidationRejected => "PARAM_VALIDATION_REJECTED",
            Event::ShapeFault => "PARAM_SHAPE_FAULT",
        }
    }

    /// Returns the severity this event is logged at.
    pub fn severity(&self) -> Severity {
        match self {
            Event::ShapeSetLoaded => Severity::Info,
            Event::ValidationRejected => Severity::Warn,
            Event::ShapeFault => Severity::Fatal,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::ShapeSetLoaded.as_str(), "SHAPE_SET_LOADED");
        assert_eq!(Event::ValidationRejected.as_str(), "PARAM_VALIDATION_REJECTED");
        assert_eq!(Event::ShapeFault.as_str(), "PARAM_SHAPE_FAULT");
    }

    #[test]
    fn test_event_severities() {
        assert_eq!(Event::ShapeSetLoaded.severity(), Severity::Info);
        assert_eq!(Event::ValidationRejected.severity(), Severity::Warn);
        assert_eq!(Event::ShapeFault.severity(), Severity::Fatal);
    }
}

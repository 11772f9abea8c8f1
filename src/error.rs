//! Error types for the mediator.

use thiserror::Error;

/// Failure produced by a notification handler's own logic.
///
/// Handlers report domain failures with whatever error type they like; the
/// mediator only collects and surfaces them, so a boxed error is enough.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for all mediator operations.
#[derive(Debug, Error)]
pub enum MediatorError {
    /// No request handler bound for the resolved capability key.
    #[error("no handler registered for request type `{0}`")]
    HandlerNotFound(&'static str),

    /// A second request handler was registered for a capability key that
    /// already has one. Each request type takes exactly one handler.
    #[error("a handler for request type `{0}` is already registered")]
    DuplicateRequestHandler(&'static str),

    /// A resolved handler's invocation did not have the expected shape.
    ///
    /// This is a programming error in handler registration or signatures,
    /// not a runtime data issue.
    #[error("dispatch contract violated for `{message_type}`: {reason}")]
    ContractViolation {
        /// Request or notification type being dispatched.
        message_type: &'static str,
        /// What about the invocation was malformed.
        reason: &'static str,
    },

    /// One or more notification handlers failed during a publish.
    ///
    /// Every handler ran to completion before this was surfaced; no failure
    /// cancels a sibling.
    #[error(
        "{} of {total} notification handlers failed for `{notification}`: {}",
        .failures.len(),
        first_failure(.failures)
    )]
    PublishFailed {
        /// Notification type that was published.
        notification: &'static str,
        /// How many handlers were invoked.
        total: usize,
        /// Every observed failure, in collection order.
        failures: Vec<HandlerError>,
    },
}

fn first_failure(failures: &[HandlerError]) -> String {
    failures
        .first()
        .map(|err| err.to_string())
        .unwrap_or_default()
}

/// Result type alias using MediatorError.
pub type Result<T> = std::result::Result<T, MediatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_failed_display_names_type_and_first_failure() {
        let err = MediatorError::PublishFailed {
            notification: "AccountCreated",
            total: 3,
            failures: vec!["smtp gateway unavailable".into(), "sms quota exceeded".into()],
        };

        let rendered = err.to_string();
        assert!(rendered.contains("2 of 3"));
        assert!(rendered.contains("AccountCreated"));
        assert!(rendered.contains("smtp gateway unavailable"));
    }

    #[test]
    fn handler_not_found_display_names_request_type() {
        let err = MediatorError::HandlerNotFound("CloseAccount");
        assert!(err.to_string().contains("CloseAccount"));
    }
}

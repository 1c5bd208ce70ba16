//! Error types for message routing.
//!
//! [`RouteError`] is what the router reports to its caller. Handler failures
//! are wrapped transparently so the caller receives the handler's own
//! [`HandlerError`] unmodified.

use std::error::Error as StdError;

use thiserror::Error;

// =============================================================================
// Handler Errors
// =============================================================================

/// Errors raised by a handler while processing a message.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler rejected or failed to process the message.
    #[error("handler failed: {0}")]
    Failed(String),

    /// An untyped handler received a value it does not understand.
    #[error("unexpected message: expected '{expected}', got '{got}'")]
    UnexpectedMessage {
        /// Type name the handler expected.
        expected: &'static str,
        /// Description of what it got instead.
        got: &'static str,
    },

    /// Any other error raised by handler code.
    #[error("{0}")]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl HandlerError {
    /// Creates a [`HandlerError::Failed`] with the given reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    /// Wraps an arbitrary error raised by handler code.
    pub fn other<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Other(Box::new(err))
    }
}

// =============================================================================
// Route Errors
// =============================================================================

/// Errors reported by [`MessageRouter`](crate::MessageRouter) and
/// [`UntypedRouter`](crate::UntypedRouter).
#[derive(Debug, Error)]
pub enum RouteError {
    /// No rule is registered for the message's exact runtime type.
    #[error("no rule registered for message type '{message}'")]
    UnmappedMessageType {
        /// Name of the unmapped message type.
        message: &'static str,
    },

    /// Two rules were registered for the same message type.
    ///
    /// Only reported by strict construction; the default fold lets the later
    /// rule replace the earlier one.
    #[error("duplicate rule for message type '{message}'")]
    DuplicateRule {
        /// Name of the message type registered twice.
        message: &'static str,
    },

    /// A type-erased handler was called with a message of another type.
    #[error("message type mismatch: expected '{expected}', got '{got}'")]
    TypeMismatch {
        /// Type the handler was registered for.
        expected: &'static str,
        /// Type it actually received.
        got: &'static str,
    },

    /// A handler failed; the remaining handlers were not invoked.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl RouteError {
    /// Returns `true` if this error reports an unmapped message type.
    pub fn is_unmapped(&self) -> bool {
        matches!(self, Self::UnmappedMessageType { .. })
    }

    /// Returns the handler error, if a handler failed.
    pub fn handler_error(&self) -> Option<&HandlerError> {
        match self {
            Self::Handler(err) => Some(err),
            _ => None,
        }
    }

    /// Consumes the route error and returns the handler error, if any.
    pub fn into_handler_error(self) -> Option<HandlerError> {
        match self {
            Self::Handler(err) => Some(err),
            _ => None,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type returned by handlers.
pub type HandlerResult = Result<(), HandlerError>;

/// Result type returned by routers.
pub type RouteResult = Result<(), RouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_error_passes_through_route_error() {
        let err = RouteError::from(HandlerError::failed("boom"));
        assert_eq!(err.to_string(), "handler failed: boom");
        assert!(matches!(
            err.into_handler_error(),
            Some(HandlerError::Failed(reason)) if reason == "boom"
        ));
    }

    #[test]
    fn unmapped_error_is_distinguishable() {
        let err = RouteError::UnmappedMessageType { message: "Ping" };
        assert!(err.is_unmapped());
        assert!(err.handler_error().is_none());
        assert_eq!(err.to_string(), "no rule registered for message type 'Ping'");
    }

    #[test]
    fn other_keeps_source_message() {
        let io = std::io::Error::other("disk on fire");
        let err = HandlerError::other(io);
        assert_eq!(err.to_string(), "disk on fire");
    }
}
